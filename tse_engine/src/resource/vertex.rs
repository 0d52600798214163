/// Vertex layouts usable by primitives
///
/// A layout declares which semantic fields it carries and where; primitives
/// bind only those fields, matched by name against the shader's inputs
/// (`InPosition`, `InTexCoord`, ...).

use std::mem::offset_of;
use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// Semantic of a vertex field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexSemantic {
    Position,
    TexCoord,
    Normal,
    Color,
    Tangent,
    Bitangent,
}

impl VertexSemantic {
    /// Shader input name the field binds to
    pub fn attribute_name(&self) -> &'static str {
        match self {
            VertexSemantic::Position => "InPosition",
            VertexSemantic::TexCoord => "InTexCoord",
            VertexSemantic::Normal => "InNormal",
            VertexSemantic::Color => "InColor",
            VertexSemantic::Tangent => "InTangent",
            VertexSemantic::Bitangent => "InBitangent",
        }
    }
}

/// A plain-data vertex layout
pub trait Vertex: Pod {
    /// Every field as (semantic, byte offset)
    const SEMANTICS: &'static [(VertexSemantic, usize)];

    /// Position used for bounding boxes, when the layout has one
    fn position(&self) -> Option<Vec3> {
        None
    }
}

/// Standard vertex: position, texcoord, normal, color (48 bytes)
///
/// Also the on-disk vertex record of model and font containers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct VertexStd {
    pub position: Vec3,
    pub texcoord: Vec2,
    pub normal: Vec3,
    pub color: Vec4,
}

impl VertexStd {
    pub fn new(position: Vec3, texcoord: Vec2, normal: Vec3, color: Vec4) -> Self {
        Self { position, texcoord, normal, color }
    }
}

/// Transform positions as points and normals by the inverse transpose
pub fn transform_vertices(vertices: &mut [VertexStd], transform: &Mat4) {
    let linear = Mat3::from_mat4(*transform);
    let normal_matrix = if linear.determinant() == 0.0 { linear } else { linear.inverse().transpose() };
    for v in vertices {
        v.position = transform.transform_point3(v.position);
        v.normal = normal_matrix * v.normal;
    }
}

impl Vertex for VertexStd {
    const SEMANTICS: &'static [(VertexSemantic, usize)] = &[
        (VertexSemantic::Position, offset_of!(VertexStd, position)),
        (VertexSemantic::TexCoord, offset_of!(VertexStd, texcoord)),
        (VertexSemantic::Normal, offset_of!(VertexStd, normal)),
        (VertexSemantic::Color, offset_of!(VertexStd, color)),
    ];

    fn position(&self) -> Option<Vec3> {
        Some(self.position)
    }
}

/// Position-only vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct VertexPos {
    pub position: Vec3,
}

impl Vertex for VertexPos {
    const SEMANTICS: &'static [(VertexSemantic, usize)] = &[
        (VertexSemantic::Position, 0),
    ];

    fn position(&self) -> Option<Vec3> {
        Some(self.position)
    }
}

/// Size in bytes of a `VertexStd` record
pub const VERTEX_STD_SIZE: usize = std::mem::size_of::<VertexStd>();

const _: () = assert!(VERTEX_STD_SIZE == 48);

#[cfg(test)]
#[path = "vertex_tests.rs"]
mod tests;
