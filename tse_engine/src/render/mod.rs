//! Render module: frame orchestration over the resource managers.

mod config;
mod render;
mod sync;

pub use config::{RenderConfig, IGNORED_DEBUG_MESSAGE_IDS};
pub use render::Render;
pub use sync::{
    CameraSync, TimeSync, PrimitiveSync,
    CAMERA_SLOT, TIME_SLOT, PRIMITIVE_SLOT,
};
