/// Keyboard and mouse state.
///
/// Window events accumulate into pending state; `response` publishes it as
/// this frame's snapshot (clicks, mouse deltas, wheel) and starts a new
/// accumulation. Held keys and buttons persist across frames.

use rustc_hash::FxHashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// Wheel units per pixel of a pixel-precise scroll
const PIXELS_PER_WHEEL_LINE: f64 = 120.0;

#[derive(Debug, Default)]
pub struct Input {
    keys: FxHashSet<KeyCode>,
    clicked: FxHashSet<KeyCode>,
    pending_clicked: FxHashSet<KeyCode>,
    buttons: FxHashSet<MouseButton>,
    modifiers: ModifiersState,
    mouse: (f64, f64),
    mouse_delta: (f64, f64),
    pending_delta: (f64, f64),
    wheel: f64,
    pending_wheel: f64,
    has_cursor: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one window event; returns true when the event was consumed
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return false;
                };
                match event.state {
                    ElementState::Pressed if !event.repeat => self.key_down(code),
                    ElementState::Pressed => {}
                    ElementState::Released => self.key_up(code),
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::CursorMoved { position, .. } => self.mouse_moved(position.x, position.y),
            WindowEvent::MouseWheel { delta, .. } => match delta {
                MouseScrollDelta::LineDelta(_, y) => self.mouse_wheel(*y as f64),
                MouseScrollDelta::PixelDelta(p) => self.mouse_wheel(p.y / PIXELS_PER_WHEEL_LINE),
            },
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_button(*button, *state == ElementState::Pressed)
            }
            WindowEvent::Focused(false) => self.release_all(),
            _ => return false,
        }
        true
    }

    pub fn key_down(&mut self, code: KeyCode) {
        if self.keys.insert(code) {
            self.pending_clicked.insert(code);
        }
    }

    pub fn key_up(&mut self, code: KeyCode) {
        self.keys.remove(&code);
    }

    pub fn mouse_moved(&mut self, x: f64, y: f64) {
        if self.has_cursor {
            self.pending_delta.0 += x - self.mouse.0;
            self.pending_delta.1 += y - self.mouse.1;
        }
        self.mouse = (x, y);
        self.has_cursor = true;
    }

    pub fn mouse_wheel(&mut self, lines: f64) {
        self.pending_wheel += lines;
    }

    pub fn mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    /// Drop every held key and button (focus lost)
    pub fn release_all(&mut self) {
        self.keys.clear();
        self.buttons.clear();
        self.modifiers = ModifiersState::empty();
    }

    /// Publish the events accumulated since the previous call
    pub fn response(&mut self) {
        self.clicked = std::mem::take(&mut self.pending_clicked);
        self.mouse_delta = std::mem::take(&mut self.pending_delta);
        self.wheel = std::mem::take(&mut self.pending_wheel);
    }

    // ===== QUERIES =====

    pub fn is_down(&self, code: KeyCode) -> bool {
        self.keys.contains(&code)
    }

    /// Pressed during the last published frame
    pub fn is_clicked(&self, code: KeyCode) -> bool {
        self.clicked.contains(&code)
    }

    pub fn shift(&self) -> bool {
        self.modifiers.shift_key() || self.is_down(KeyCode::ShiftLeft) || self.is_down(KeyCode::ShiftRight)
    }

    pub fn control(&self) -> bool {
        self.modifiers.control_key() || self.is_down(KeyCode::ControlLeft) || self.is_down(KeyCode::ControlRight)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Cursor position in window pixels
    pub fn mouse(&self) -> (f64, f64) {
        self.mouse
    }

    pub fn mouse_delta(&self) -> (f64, f64) {
        self.mouse_delta
    }

    /// Wheel lines scrolled during the last frame, positive away from the user
    pub fn wheel(&self) -> f64 {
        self.wheel
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
