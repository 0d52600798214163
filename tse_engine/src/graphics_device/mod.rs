/// Graphics device module - the device trait and the types it exchanges

pub mod graphics_device;
pub mod types;
pub mod var_type;
pub mod glsl_scan;

pub use graphics_device::*;
pub use types::*;
pub use var_type::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
