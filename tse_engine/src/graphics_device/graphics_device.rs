/// GraphicsDevice trait - the GL-shaped command surface every resource draws through
///
/// The render context owns exactly one device and passes it explicitly to
/// resources, which never keep a back-reference to it. All calls happen on the
/// frame thread.

use crate::error::Result;
use super::types::*;

/// Low-level graphics device
///
/// Implemented by the OpenGL backend (`tse_engine_renderer_gl`) and by the
/// recording mock used in unit tests.
pub trait GraphicsDevice {
    // ===== STATE =====

    /// One-time state setup: depth test, primitive restart (all-bits index), alpha blending
    fn init_state(&mut self) -> Result<()>;

    /// Color used by `clear(ClearFlags::COLOR)`
    fn set_clear_color(&mut self, color: [f32; 4], depth: f32);

    fn clear(&mut self, flags: ClearFlags);

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    fn set_cull_mode(&mut self, mode: CullMode);

    /// Block until queued commands are executed
    fn finish(&mut self);

    /// Swap back and front buffers
    fn present(&mut self) -> Result<()>;

    // ===== BUFFERS =====

    /// Allocate a storage buffer of `size` bytes, optionally with initial contents
    fn create_storage_buffer(&mut self, size: usize, data: Option<&[u8]>) -> Result<BufferHandle>;

    /// Overwrite `data.len()` bytes at `offset` (caller guarantees bounds)
    fn update_buffer(&mut self, buffer: BufferHandle, offset: usize, data: &[u8]);

    /// Bind a storage buffer to an indexed binding point
    fn bind_storage_buffer(&mut self, buffer: BufferHandle, slot: u32);

    fn delete_buffer(&mut self, buffer: BufferHandle);

    // ===== VERTEX ARRAYS =====

    fn create_vertex_array(&mut self) -> Result<VertexArrayHandle>;

    /// Upload static vertex bytes attached to `vertex_array`
    fn create_vertex_buffer(&mut self, vertex_array: VertexArrayHandle, data: &[u8]) -> Result<BufferHandle>;

    /// Upload 32-bit indices as the element buffer of `vertex_array`
    fn create_index_buffer(&mut self, vertex_array: VertexArrayHandle, indices: &[i32]) -> Result<BufferHandle>;

    /// Point an attribute location at a region of `vertex_buffer`
    fn set_vertex_attribute(
        &mut self,
        vertex_array: VertexArrayHandle,
        vertex_buffer: BufferHandle,
        attribute: VertexAttribute,
    );

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    // ===== DRAWS =====

    fn draw_arrays(&mut self, vertex_array: VertexArrayHandle, mode: DrawMode, count: u32);

    /// Indexed draw with 32-bit indices
    fn draw_elements(&mut self, vertex_array: VertexArrayHandle, mode: DrawMode, count: u32);

    // ===== TEXTURES =====

    /// Allocate a 2D texture, upload `pixels` when given, then build the mip chain
    fn create_texture(&mut self, desc: &TextureDesc, pixels: Option<&[u8]>) -> Result<TextureHandle>;

    /// Activate texture unit `unit` and bind `texture` to it
    fn bind_texture(&mut self, unit: u32, texture: TextureHandle);

    fn delete_texture(&mut self, texture: TextureHandle);

    // ===== PROGRAMS =====

    /// Compile one stage. Errors carry the compiler info log.
    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderStageHandle>;

    /// Link compiled stages into a program. Errors carry the linker info log.
    fn link_program(&mut self, stages: &[ShaderStageHandle]) -> Result<ProgramHandle>;

    fn reflect_program(&mut self, program: ProgramHandle) -> ProgramReflection;

    /// Make `program` current (INVALID unbinds)
    fn use_program(&mut self, program: ProgramHandle);

    fn delete_stage(&mut self, stage: ShaderStageHandle);

    fn delete_program(&mut self, program: ProgramHandle);
}
