/// Pure mappings between engine enums and OpenGL enums
///
/// Kept free of any context so they can be tested without a GPU.

use tse_engine::tse::device::{CullMode, DrawMode, PixelLayout, ShaderStage, VarType};

/// Shader object type for a stage
pub fn stage_to_gl(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::TessControl => glow::TESS_CONTROL_SHADER,
        ShaderStage::TessEvaluation => glow::TESS_EVALUATION_SHADER,
        ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        ShaderStage::Compute => glow::COMPUTE_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

pub fn draw_mode_to_gl(mode: DrawMode) -> u32 {
    match mode {
        DrawMode::Triangles => glow::TRIANGLES,
        DrawMode::TriangleStrip => glow::TRIANGLE_STRIP,
        DrawMode::Points => glow::POINTS,
        DrawMode::Lines => glow::LINES,
    }
}

/// Face passed to `cull_face`, None when culling is off
pub fn cull_face_to_gl(mode: CullMode) -> Option<u32> {
    match mode {
        CullMode::Disabled => None,
        CullMode::Front => Some(glow::FRONT),
        CullMode::Back => Some(glow::BACK),
    }
}

/// (sized internal format, upload format) for a pixel layout
///
/// Single-channel data goes to RED; LUMINANCE is not accepted by
/// `tex_storage_2d` targets in a core profile.
pub fn pixel_layout_to_gl(layout: PixelLayout) -> (u32, u32) {
    match layout {
        PixelLayout::Bgra8 => (glow::RGBA8, glow::BGRA),
        PixelLayout::Bgr8 => (glow::RGB8, glow::BGR),
        PixelLayout::R8 => (glow::R8, glow::RED),
    }
}

/// Bytes read from client memory for a level-0 upload, None on overflow
pub fn upload_size(width: u32, height: u32, layout: PixelLayout) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(layout.bytes_per_pixel())
}

/// GLSL spelling of a reflected GL type enum
pub fn gl_type_name(gl_type: u32) -> Option<&'static str> {
    let name = match gl_type {
        glow::BOOL => "bool",
        glow::BOOL_VEC2 => "bvec2",
        glow::BOOL_VEC3 => "bvec3",
        glow::BOOL_VEC4 => "bvec4",

        glow::SAMPLER_1D => "sampler1D",
        glow::SAMPLER_2D => "sampler2D",
        glow::SAMPLER_3D => "sampler3D",
        glow::SAMPLER_CUBE => "samplerCube",
        glow::SAMPLER_2D_SHADOW => "sampler2DShadow",
        glow::SAMPLER_2D_ARRAY => "sampler2DArray",
        glow::INT_SAMPLER_2D => "isampler2D",
        glow::UNSIGNED_INT_SAMPLER_2D => "usampler2D",

        glow::FLOAT => "float",
        glow::FLOAT_VEC2 => "vec2",
        glow::FLOAT_VEC3 => "vec3",
        glow::FLOAT_VEC4 => "vec4",
        glow::FLOAT_MAT2 => "mat2",
        glow::FLOAT_MAT3 => "mat3",
        glow::FLOAT_MAT4 => "mat4",
        glow::FLOAT_MAT2x3 => "mat2x3",
        glow::FLOAT_MAT2x4 => "mat2x4",
        glow::FLOAT_MAT3x2 => "mat3x2",
        glow::FLOAT_MAT3x4 => "mat3x4",
        glow::FLOAT_MAT4x2 => "mat4x2",
        glow::FLOAT_MAT4x3 => "mat4x3",

        glow::INT => "int",
        glow::INT_VEC2 => "ivec2",
        glow::INT_VEC3 => "ivec3",
        glow::INT_VEC4 => "ivec4",
        glow::UNSIGNED_INT => "uint",
        glow::UNSIGNED_INT_VEC2 => "uvec2",
        glow::UNSIGNED_INT_VEC3 => "uvec3",
        glow::UNSIGNED_INT_VEC4 => "uvec4",
        _ => return None,
    };
    Some(name)
}

/// Type table entry for a reflected GL type enum (UNKNOWN if unmapped)
pub fn gl_type_to_var_type(gl_type: u32) -> VarType {
    gl_type_name(gl_type)
        .map(VarType::from_glsl_name)
        .unwrap_or(VarType::UNKNOWN)
}

#[cfg(test)]
#[path = "gl_format_tests.rs"]
mod tests;
