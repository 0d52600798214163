/// GLSL variable type table used by program reflection
///
/// Every reflected attribute/uniform carries one of these entries, which gives
/// the component count and scalar kind needed to set up attribute pointers.

/// A GLSL type descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarType {
    /// GLSL spelling ("vec3", "mat4x3", "sampler2D", ...)
    pub name: &'static str,
    /// Scalar component count (16 for mat4)
    pub components: u32,
    /// Float-valued (vs integer/bool)
    pub is_float: bool,
    /// Matrix row count, 0 for non-matrix types
    pub matrix_rows: u32,
}

const fn entry(name: &'static str, components: u32, is_float: bool, matrix_rows: u32) -> VarType {
    VarType { name, components, is_float, matrix_rows }
}

/// Known GLSL types
pub const VAR_TYPES: &[VarType] = &[
    entry("bool", 1, false, 0),
    entry("bvec2", 2, false, 0),
    entry("bvec3", 3, false, 0),
    entry("bvec4", 4, false, 0),

    entry("sampler1D", 1, false, 0),
    entry("sampler2D", 1, false, 0),
    entry("sampler3D", 1, false, 0),
    entry("samplerCube", 1, false, 0),
    entry("sampler2DShadow", 1, false, 0),
    entry("sampler2DArray", 1, false, 0),
    entry("isampler2D", 1, false, 0),
    entry("usampler2D", 1, false, 0),

    entry("float", 1, true, 0),
    entry("vec2", 2, true, 0),
    entry("vec3", 3, true, 0),
    entry("vec4", 4, true, 0),
    entry("mat2", 4, true, 2),
    entry("mat3", 9, true, 3),
    entry("mat4", 16, true, 4),
    entry("mat2x3", 6, true, 2),
    entry("mat2x4", 8, true, 2),
    entry("mat3x2", 6, true, 3),
    entry("mat3x4", 12, true, 3),
    entry("mat4x2", 8, true, 4),
    entry("mat4x3", 12, true, 4),

    entry("int", 1, false, 0),
    entry("ivec2", 2, false, 0),
    entry("ivec3", 3, false, 0),
    entry("ivec4", 4, false, 0),
    entry("uint", 1, false, 0),
    entry("uvec2", 2, false, 0),
    entry("uvec3", 3, false, 0),
    entry("uvec4", 4, false, 0),
];

impl VarType {
    /// Placeholder for types missing from the table
    pub const UNKNOWN: VarType = entry("unknown", 0, false, 0);

    /// Look a type up by its GLSL spelling
    pub fn from_glsl_name(name: &str) -> VarType {
        VAR_TYPES
            .iter()
            .find(|t| t.name == name)
            .copied()
            .unwrap_or(VarType::UNKNOWN)
    }

    pub fn is_matrix(&self) -> bool {
        self.matrix_rows != 0
    }

    pub fn is_known(&self) -> bool {
        self.components != 0
    }
}

#[cfg(test)]
#[path = "var_type_tests.rs"]
mod tests;
