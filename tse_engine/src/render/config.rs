/// Render configuration

use std::path::PathBuf;

/// Driver debug message ids that are noise (buffer placement hints, shader
/// recompiles on state change, ...) and never reach the logger
pub const IGNORED_DEBUG_MESSAGE_IDS: [u32; 4] = [131169, 131185, 131218, 131204];

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Folder holding one sub-folder per shader plus `includes/commondf.glsl`
    pub shader_root: PathBuf,
    pub clear_color: [f32; 4],
    pub clear_depth: f32,
    /// Watch shader folders and reload on change
    pub hot_reload: bool,
    /// Initial frame size in pixels
    pub width: u32,
    pub height: u32,
    /// Shader of the default material
    pub default_shader: String,
    /// Route driver debug output to the logger (GL backend, `gl-debug` feature)
    pub gl_debug: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shader_root: PathBuf::from("bin/shaders"),
            clear_color: [0.30, 0.47, 0.8, 1.0],
            clear_depth: 1.0,
            hot_reload: true,
            width: 30,
            height: 30,
            default_shader: "default".to_string(),
            gl_debug: cfg!(debug_assertions),
        }
    }
}
