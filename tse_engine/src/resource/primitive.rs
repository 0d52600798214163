/// Drawable vertex/index buffer pair.
///
/// A Primitive owns a vertex array with its vertex and (optional) index
/// buffers, a local transform, a bounding box and a material reference.
/// Attribute pointers are bound in a separate `finalize_layout` step against
/// the shader that will draw it; the binding remembers the shader name and
/// generation, so a hot-reloaded shader makes the layout stale and it is
/// bound again on the next draw.

use glam::{Mat4, Vec3};

use crate::error::Result;
use crate::engine_debug;
use crate::graphics_device::{
    AttributeKind, BufferHandle, DrawMode, GraphicsDevice, VertexArrayHandle, VertexAttribute,
};
use super::resource_manager::Resource;
use super::shader::Shader;
use super::vertex::{Vertex, VertexSemantic};

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    TriMesh,
    Points,
    Strip,
    Lines,
}

impl Topology {
    pub fn draw_mode(&self) -> DrawMode {
        match self {
            Topology::TriMesh => DrawMode::Triangles,
            Topology::Strip => DrawMode::TriangleStrip,
            Topology::Points => DrawMode::Points,
            Topology::Lines => DrawMode::Lines,
        }
    }
}

/// Axis-aligned bounds of a vertex stream, (0, 0) when empty
pub fn bounds_of<V: Vertex>(vertices: &[V]) -> (Vec3, Vec3) {
    let mut positions = vertices.iter().filter_map(|v| v.position());
    let Some(first) = positions.next() else {
        return (Vec3::ZERO, Vec3::ZERO);
    };
    positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p)))
}

/// Drop every triangle with a corner outside `0..vertex_count`
///
/// A trailing partial triangle is kept only when its indices are in range.
/// Returns the number of triangles removed.
pub fn retain_valid_triangles(indices: &mut Vec<i32>, vertex_count: usize) -> usize {
    let in_range = |i: &i32| usize::try_from(*i).is_ok_and(|i| i < vertex_count);
    let before = indices.len();
    let kept: Vec<i32> = indices
        .chunks(3)
        .filter(|triangle| triangle.iter().all(in_range))
        .flatten()
        .copied()
        .collect();
    *indices = kept;
    (before - indices.len()).div_ceil(3)
}

pub struct Primitive {
    topology: Topology,
    vertex_array: VertexArrayHandle,
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
    element_count: u32,
    /// Local transform, applied before the draw-time world transform
    pub transform: Mat4,
    material: Option<String>,
    min: Vec3,
    max: Vec3,
    attributes: Vec<(VertexSemantic, u32)>,
    stride: u32,
    /// (shader name, shader generation) the attribute pointers were bound against
    bound_layout: Option<(String, u64)>,
}

impl Primitive {
    /// Upload vertices (and indices when non-empty)
    ///
    /// Element count is the index count when indices are given, the vertex
    /// count otherwise.
    pub fn create<V: Vertex>(
        device: &mut dyn GraphicsDevice,
        material: Option<String>,
        topology: Topology,
        vertices: &[V],
        indices: &[i32],
    ) -> Result<Self> {
        let (min, max) = bounds_of(vertices);
        let vertex_array = device.create_vertex_array()?;

        let vertex_buffer = if vertices.is_empty() {
            BufferHandle::INVALID
        } else {
            device.create_vertex_buffer(vertex_array, bytemuck::cast_slice(vertices))?
        };
        let (index_buffer, element_count) = if indices.is_empty() {
            (BufferHandle::INVALID, vertices.len() as u32)
        } else {
            (device.create_index_buffer(vertex_array, indices)?, indices.len() as u32)
        };

        Ok(Self {
            topology,
            vertex_array,
            vertex_buffer,
            index_buffer,
            element_count,
            transform: Mat4::IDENTITY,
            material,
            min,
            max,
            attributes: V::SEMANTICS.iter().map(|&(s, offset)| (s, offset as u32)).collect(),
            stride: std::mem::size_of::<V>() as u32,
            bound_layout: None,
        })
    }

    /// Vertex array with no backing vertex store, drawn as `count` elements
    ///
    /// Used for procedural draws where the shader derives everything from
    /// the vertex id.
    pub fn create_empty(device: &mut dyn GraphicsDevice, topology: Topology, count: u32) -> Result<Self> {
        Ok(Self {
            topology,
            vertex_array: device.create_vertex_array()?,
            vertex_buffer: BufferHandle::INVALID,
            index_buffer: BufferHandle::INVALID,
            element_count: count,
            transform: Mat4::IDENTITY,
            material: None,
            min: Vec3::ZERO,
            max: Vec3::ZERO,
            attributes: Vec::new(),
            stride: 0,
            bound_layout: None,
        })
    }

    /// True when attribute pointers must be (re)bound for `shader`
    pub fn needs_layout(&self, shader: &Shader) -> bool {
        match &self.bound_layout {
            Some((name, generation)) => name != shader.name() || *generation != shader.generation(),
            None => true,
        }
    }

    /// Bind every mapped field to the shader input of the same semantic
    ///
    /// Does nothing (and stays pending) while the shader is invalid. Fields
    /// the shader does not consume are skipped. Returns true when the layout
    /// is bound for this shader generation.
    pub fn finalize_layout(&mut self, device: &mut dyn GraphicsDevice, shader: &Shader) -> bool {
        if !shader.is_valid() {
            return false;
        }
        if !self.needs_layout(shader) {
            return true;
        }

        if self.vertex_buffer.is_valid() {
            for &(semantic, offset) in &self.attributes {
                let Some(input) = shader.attribute(semantic.attribute_name()) else {
                    continue;
                };
                if input.location < 0 {
                    continue;
                }
                device.set_vertex_attribute(
                    self.vertex_array,
                    self.vertex_buffer,
                    VertexAttribute {
                        location: input.location as u32,
                        components: input.var_type.components,
                        kind: if input.var_type.is_float { AttributeKind::Float } else { AttributeKind::Int },
                        stride: self.stride,
                        offset,
                    },
                );
            }
        }

        engine_debug!("tse::Primitive",
            "Layout bound against '{}' (generation {})", shader.name(), shader.generation());
        self.bound_layout = Some((shader.name().to_string(), shader.generation()));
        true
    }

    /// Issue the draw call (indexed when an index buffer exists)
    pub fn draw(&self, device: &mut dyn GraphicsDevice) {
        let mode = self.topology.draw_mode();
        if self.index_buffer.is_valid() {
            device.draw_elements(self.vertex_array, mode, self.element_count);
        } else {
            device.draw_arrays(self.vertex_array, mode, self.element_count);
        }
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn element_count(&self) -> u32 {
        self.element_count
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_valid()
    }

    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.vertex_array
    }

    pub fn material(&self) -> Option<&str> {
        self.material.as_deref()
    }

    /// Change the material; the layout is re-bound on the next draw if the
    /// new material uses another shader
    pub fn set_material(&mut self, material: Option<String>) {
        self.material = material;
    }

    pub fn min(&self) -> Vec3 {
        self.min
    }

    pub fn max(&self) -> Vec3 {
        self.max
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Mapped fields as (semantic, byte offset)
    pub fn attributes(&self) -> &[(VertexSemantic, u32)] {
        &self.attributes
    }
}

impl Resource for Primitive {
    fn name(&self) -> &str {
        "primitive"
    }

    fn free(&mut self, device: &mut dyn GraphicsDevice) {
        if self.vertex_buffer.is_valid() {
            device.delete_buffer(self.vertex_buffer);
        }
        if self.index_buffer.is_valid() {
            device.delete_buffer(self.index_buffer);
        }
        if self.vertex_array.is_valid() {
            device.delete_vertex_array(self.vertex_array);
        }
        self.vertex_buffer = BufferHandle::INVALID;
        self.index_buffer = BufferHandle::INVALID;
        self.vertex_array = VertexArrayHandle::INVALID;
        self.bound_layout = None;
    }
}

#[cfg(test)]
#[path = "primitive_tests.rs"]
mod tests;
