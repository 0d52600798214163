/*!
# TSE Engine

Core of a small real-time 3D renderer.

The crate is backend-agnostic: every GPU call goes through the
`GraphicsDevice` trait, and a backend crate (OpenGL in
`tse_engine_renderer_gl`) provides the implementation.

## Architecture

- **GraphicsDevice**: object-safe device trait (buffers, textures, programs, draws)
- **Resources**: explicit context owning the device and one manager per resource kind
- **Buffer / Texture / Shader / Material**: GPU resources, shaders hot-reload from disk
- **Primitive / Model / Font**: drawable geometry, OBJ and G3DM/G3DF loaders
- **Render**: frame orchestration, shared blocks, model pass ordering
- **Camera / Timer**: view state and frame timing
- **Animation**: unit list, input state and the per-frame loop
*/

// Internal modules
mod error;
pub mod log;
pub mod graphics_device;
pub mod resource;
pub mod camera;
pub mod render;
pub mod timer;
pub mod anim;

#[cfg(test)]
mod test_utils;

// Main tse namespace module
pub mod tse {
    // Error types
    pub use crate::error::{Error, Result};

    // Render system
    pub use crate::render::{Render, RenderConfig};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger, set_min_severity, min_severity};
        // Note: engine_* macros are exported at the crate root
    }

    // Device trait and the types it exchanges
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Frame orchestration sub-module
    pub mod render {
        pub use crate::render::*;
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    pub mod timer {
        pub use crate::timer::*;
    }

    // Units and the animation loop
    pub mod anim {
        pub use crate::anim::*;
    }
}

// Re-export math and windowing libraries at crate root
pub use glam;
pub use winit;
