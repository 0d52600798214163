/// Handle newtypes and plain enums shared by the device trait and its backends

use bitflags::bitflags;

use super::var_type::VarType;

// ============================================================================
// Handles
// ============================================================================

macro_rules! device_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub u32);

        impl $name {
            /// The "no object" handle
            pub const INVALID: Self = Self(0);

            /// True when the handle names a live device object
            pub fn is_valid(&self) -> bool {
                self.0 != 0
            }
        }
    };
}

device_handle!(
    /// Device buffer object (storage, vertex or index)
    BufferHandle
);
device_handle!(
    /// Device texture object
    TextureHandle
);
device_handle!(
    /// Vertex array object (attribute layout + element buffer binding)
    VertexArrayHandle
);
device_handle!(
    /// Compiled, not yet linked, shader stage object
    ShaderStageHandle
);
device_handle!(
    /// Linked shader program
    ProgramHandle
);

// ============================================================================
// Shader stages
// ============================================================================

/// Shader stage kinds, in assembly order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    TessControl,
    TessEvaluation,
    Geometry,
    Compute,
    Fragment,
}

impl ShaderStage {
    /// All stages, vertex first and fragment last
    pub const ALL: [ShaderStage; 6] = [
        ShaderStage::Vertex,
        ShaderStage::TessControl,
        ShaderStage::TessEvaluation,
        ShaderStage::Geometry,
        ShaderStage::Compute,
        ShaderStage::Fragment,
    ];

    /// Source file name inside a shader folder
    pub fn file_name(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vert.glsl",
            ShaderStage::TessControl => "ctrl.glsl",
            ShaderStage::TessEvaluation => "eval.glsl",
            ShaderStage::Geometry => "geom.glsl",
            ShaderStage::Compute => "comp.glsl",
            ShaderStage::Fragment => "frag.glsl",
        }
    }

    /// Preprocessor symbol defined while compiling this stage
    pub fn define(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VERTEX_SHADER",
            ShaderStage::TessControl => "TESS_CONTROL_SHADER",
            ShaderStage::TessEvaluation => "TESS_EVALUATION_SHADER",
            ShaderStage::Geometry => "GEOMETRY_SHADER",
            ShaderStage::Compute => "COMPUTE_SHADER",
            ShaderStage::Fragment => "FRAGMENT_SHADER",
        }
    }

    /// Vertex and fragment stages must be present in every shader folder
    pub fn is_required(&self) -> bool {
        matches!(self, ShaderStage::Vertex | ShaderStage::Fragment)
    }
}

// ============================================================================
// Fixed-function state
// ============================================================================

/// Primitive assembly mode of a draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawMode {
    Triangles,
    TriangleStrip,
    Points,
    Lines,
}

/// Face culling state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// Culling disabled (both faces rasterized)
    Disabled,
    /// Cull front faces (back faces visible)
    Front,
    /// Cull back faces (front faces visible)
    Back,
}

bitflags! {
    /// Render targets touched by a clear
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearFlags: u32 {
        const COLOR = 0b01;
        const DEPTH = 0b10;
    }
}

/// Channel layout of uploaded pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// 4 bytes per pixel, blue first
    Bgra8,
    /// 3 bytes per pixel, blue first
    Bgr8,
    /// 1 byte per pixel
    R8,
}

impl PixelLayout {
    /// Layout implied by a bytes-per-pixel count (4, 3, anything else)
    pub fn from_bytes_per_pixel(bpp: u32) -> Self {
        match bpp {
            4 => PixelLayout::Bgra8,
            3 => PixelLayout::Bgr8,
            _ => PixelLayout::R8,
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelLayout::Bgra8 => 4,
            PixelLayout::Bgr8 => 3,
            PixelLayout::R8 => 1,
        }
    }
}

/// Descriptor for a 2D texture allocation
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    /// Mip chain length (>= 1)
    pub mip_levels: u32,
}

/// Scalar kind fed to a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Float,
    Int,
}

/// One vertex attribute pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub components: u32,
    pub kind: AttributeKind,
    pub stride: u32,
    pub offset: u32,
}

// ============================================================================
// Reflection
// ============================================================================

/// Active attribute or uniform of a linked program
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectedVariable {
    pub name: String,
    pub var_type: VarType,
    /// Attribute/uniform location (-1 when the driver reports none)
    pub location: i32,
}

/// Active shader-storage block of a linked program
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectedBlock {
    pub name: String,
    pub index: u32,
    pub binding: u32,
}

/// Everything introspected from a program after link
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramReflection {
    pub attributes: Vec<ReflectedVariable>,
    pub uniforms: Vec<ReflectedVariable>,
    pub storage_blocks: Vec<ReflectedBlock>,
}
