/*!
# TSE Engine - OpenGL Backend

OpenGL 4.6 implementation of the `tse_engine` graphics device, built on
`glow`.

The host creates the window and the GL context (glutin, SDL, ...), then
hands the loaded `glow::Context` and a `GlSurface` for buffer swaps to
`GlDevice::new`. The device is moved into `tse_engine::tse::Render`.

## Features

- `gl-debug`: route KHR_debug output into the engine logger
*/

mod gl_device;
pub mod gl_format;

#[cfg(feature = "gl-debug")]
pub mod gl_debug;

pub use gl_device::{GlDevice, GlSurface};

/// Re-export so hosts load the context with the same glow version
pub use glow;

/// Create a renderer drawing through OpenGL
///
/// # Example
///
/// ```no_run
/// use tse_engine::tse::{Render, RenderConfig};
/// use tse_engine_renderer_gl::{create_render, GlSurface};
///
/// # fn host(gl: tse_engine_renderer_gl::glow::Context, surface: Box<dyn GlSurface>) -> tse_engine::tse::Result<()> {
/// let mut render = create_render(gl, surface, RenderConfig::default());
/// render.init()?;
/// # Ok(())
/// # }
/// ```
pub fn create_render(
    gl: glow::Context,
    surface: Box<dyn GlSurface>,
    config: tse_engine::tse::RenderConfig,
) -> tse_engine::tse::Render {
    let (width, height) = surface.size();
    let config = tse_engine::tse::RenderConfig {
        width: if width > 0 { width } else { config.width },
        height: if height > 0 { height } else { config.height },
        ..config
    };
    let device = GlDevice::new(gl, surface, &config);
    tse_engine::tse::Render::new(Box::new(device), config)
}
