//! Animation module: the per-frame loop over units, with timer and input.

mod animation;
mod input;
mod unit;
pub mod units;

pub use animation::Animation;
pub use input::Input;
pub use unit::{FrameContext, Unit, UnitFactory, UnitRegistry};
