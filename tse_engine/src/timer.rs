/// Frame timer.
///
/// Tracks wall-clock ("global") time since start and an unpaused time that
/// stops advancing while paused. Until the first tick the deltas and FPS
/// hold fixed start values, so code reading them on the first frame sees
/// something sane.

use std::time::{Duration, Instant};

/// Delta reported before the first tick, seconds
pub const INITIAL_DELTA: f64 = 30.0;

/// FPS reported before the first measurement
pub const INITIAL_FPS: f64 = 102.30;

#[derive(Debug, Clone)]
pub struct Timer {
    start: Instant,
    last: Instant,
    last_fps: Instant,
    paused_for: Duration,
    frame_counter: u32,
    paused: bool,
    /// Seconds since start
    pub global_time: f64,
    /// Seconds since the previous tick
    pub global_delta: f64,
    /// Seconds since start, excluding paused periods
    pub time: f64,
    /// Unpaused delta, 0 while paused
    pub delta: f64,
    pub fps: f64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    pub fn new() -> Self {
        Self::started_at(Instant::now())
    }

    /// Timer whose clock starts at `start`
    pub fn started_at(start: Instant) -> Self {
        Self {
            start,
            last: start,
            last_fps: start,
            paused_for: Duration::ZERO,
            frame_counter: 0,
            paused: false,
            global_time: 0.0,
            global_delta: INITIAL_DELTA,
            time: 0.0,
            delta: INITIAL_DELTA,
            fps: INITIAL_FPS,
        }
    }

    /// Advance to the current instant
    pub fn response(&mut self) {
        self.response_at(Instant::now());
    }

    /// Advance to `now`; instants earlier than the previous tick count as no
    /// elapsed time
    pub fn response_at(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last);
        self.global_time = now.saturating_duration_since(self.start).as_secs_f64();
        self.global_delta = elapsed.as_secs_f64();

        if self.paused {
            self.delta = 0.0;
            self.paused_for += elapsed;
        } else {
            self.delta = self.global_delta;
            self.time = now
                .saturating_duration_since(self.start)
                .saturating_sub(self.paused_for)
                .as_secs_f64();
        }

        self.frame_counter += 1;
        let since_fps = now.saturating_duration_since(self.last_fps);
        if since_fps > Duration::from_secs(1) {
            self.fps = self.frame_counter as f64 / since_fps.as_secs_f64();
            self.last_fps = now;
            self.frame_counter = 0;
        }
        self.last = now;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_pause(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
