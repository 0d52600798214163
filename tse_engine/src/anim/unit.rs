/// Animation units and their registry.
///
/// A unit is one piece of per-frame behavior: it reacts in `response`
/// (input, simulation) and issues draws in `render`. Units are built by name
/// through a `UnitRegistry` filled at startup.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::render::Render;
use crate::timer::Timer;
use super::input::Input;

/// What a unit sees during one frame
pub struct FrameContext<'a> {
    pub render: &'a mut Render,
    pub timer: &'a mut Timer,
    pub input: &'a Input,
    exit_requested: bool,
}

impl<'a> FrameContext<'a> {
    pub fn new(render: &'a mut Render, timer: &'a mut Timer, input: &'a Input) -> Self {
        Self { render, timer, input, exit_requested: false }
    }

    /// Ask the host loop to stop after this frame
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

pub trait Unit {
    /// Per-frame update, before the frame is cleared
    fn response(&mut self, _ctx: &mut FrameContext) {}

    /// Issue draws for this frame
    fn render(&mut self, _ctx: &mut FrameContext) {}

    /// Release resources the unit created
    fn close(&mut self, _render: &mut Render) {}
}

/// Builds a unit against an initialized renderer
pub type UnitFactory = fn(&mut Render) -> Result<Box<dyn Unit>>;

#[derive(Default)]
pub struct UnitRegistry {
    factories: FxHashMap<String, UnitFactory>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a factory under `name`
    pub fn register(&mut self, name: &str, factory: UnitFactory) -> &mut Self {
        self.factories.insert(name.to_string(), factory);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build the unit registered as `name`
    pub fn create(&self, name: &str, render: &mut Render) -> Result<Box<dyn Unit>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::InvalidResource(format!("unknown unit '{}'", name)))?;
        factory(render)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
