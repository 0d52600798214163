/// Animation context: renderer, timer, input and the ordered unit list.
///
/// One `frame` is: timer and input response, every unit's `response`,
/// `frame_start`, every unit's `render`, `frame_end`. Units run in the order
/// they were added.

use winit::event::WindowEvent;

use crate::error::Result;
use crate::render::{Render, TimeSync};
use crate::timer::Timer;
use crate::{engine_info, engine_debug};
use super::input::Input;
use super::unit::{FrameContext, Unit, UnitRegistry};

pub struct Animation {
    render: Render,
    timer: Timer,
    input: Input,
    units: Vec<Box<dyn Unit>>,
    registry: UnitRegistry,
    exit_requested: bool,
}

impl Animation {
    pub fn new(render: Render, registry: UnitRegistry) -> Self {
        Self {
            render,
            timer: Timer::new(),
            input: Input::new(),
            units: Vec::new(),
            registry,
            exit_requested: false,
        }
    }

    /// Initialize the renderer
    pub fn init(&mut self) -> Result<()> {
        self.render.init()
    }

    /// Build a registered unit and append it
    pub fn add_unit(&mut self, name: &str) -> Result<()> {
        let unit = self.registry.create(name, &mut self.render)?;
        self.units.push(unit);
        engine_debug!("tse::Animation", "Unit '{}' added", name);
        Ok(())
    }

    /// Append an already built unit
    pub fn push_unit(&mut self, unit: Box<dyn Unit>) {
        self.units.push(unit);
    }

    /// Run one frame
    pub fn frame(&mut self) -> Result<()> {
        self.timer.response();
        self.input.response();

        let mut ctx = FrameContext::new(&mut self.render, &mut self.timer, &self.input);
        for unit in &mut self.units {
            unit.response(&mut ctx);
        }
        let time = TimeSync::from(&*ctx.timer);
        ctx.render.frame_start(&time);
        for unit in &mut self.units {
            unit.render(&mut ctx);
        }
        let exit = ctx.exit_requested();
        self.exit_requested |= exit;
        self.render.frame_end()
    }

    /// Route a window event to input, resize and close handling
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::CloseRequested => self.exit_requested = true,
            _ => {
                self.input.handle_window_event(event);
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.render.resize(width, height);
    }

    /// Close every unit, then the renderer
    pub fn close(&mut self) {
        for mut unit in self.units.drain(..) {
            unit.close(&mut self.render);
        }
        self.render.close();
        engine_info!("tse::Animation", "Animation closed");
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn render(&self) -> &Render {
        &self.render
    }

    pub fn render_mut(&mut self) -> &mut Render {
        &mut self.render
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut Timer {
        &mut self.timer
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}

#[cfg(test)]
#[path = "animation_tests.rs"]
mod tests;
