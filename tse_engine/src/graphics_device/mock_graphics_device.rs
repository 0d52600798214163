/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Every call is recorded as a short command string in a shared state object,
/// so tests can keep a handle on the state after the device has been moved
/// into a `Render`. Buffers keep their bytes, and programs are "reflected" by
/// scanning the GLSL declarations of their stages in source order.

use std::sync::{Arc, Mutex};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::graphics_device::glsl_scan::{scan_declarations, DeclarationKind};
use crate::graphics_device::{
    GraphicsDevice, BufferHandle, TextureHandle, VertexArrayHandle, ShaderStageHandle,
    ProgramHandle, ShaderStage, DrawMode, CullMode, ClearFlags, TextureDesc,
    VertexAttribute, ProgramReflection, ReflectedVariable, ReflectedBlock, VarType,
};

// ============================================================================
// Mock state
// ============================================================================

/// Everything the mock device has seen
#[derive(Debug, Default)]
pub struct MockState {
    pub commands: Vec<String>,
    pub buffers: FxHashMap<u32, Vec<u8>>,
    pub textures: FxHashMap<u32, TextureDesc>,
    pub stages: FxHashMap<u32, (ShaderStage, String)>,
    pub programs: FxHashMap<u32, Vec<u32>>,
    pub attributes: Vec<(VertexArrayHandle, VertexAttribute)>,
    pub current_program: u32,
    pub cull_mode: Option<CullMode>,
    /// Writes that would have landed past the end of a buffer
    pub overflowing_writes: u32,
    next_id: u32,
}

impl MockState {
    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Number of recorded commands starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.commands.iter().filter(|c| c.starts_with(prefix)).count()
    }

    /// Recorded commands starting with `prefix`, in order
    pub fn filtered(&self, prefix: &str) -> Vec<String> {
        self.commands.iter().filter(|c| c.starts_with(prefix)).cloned().collect()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

// ============================================================================
// Mock device
// ============================================================================

pub struct MockGraphicsDevice {
    pub state: Arc<Mutex<MockState>>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Shared handle on the recorded state
    pub fn state(&self) -> Arc<Mutex<MockState>> {
        self.state.clone()
    }

    fn record(&self, command: String) {
        self.state.lock().unwrap().commands.push(command);
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn init_state(&mut self) -> Result<()> {
        self.record("init_state".to_string());
        Ok(())
    }

    fn set_clear_color(&mut self, color: [f32; 4], depth: f32) {
        self.record(format!("set_clear_color({:?},{})", color, depth));
    }

    fn clear(&mut self, flags: ClearFlags) {
        self.record(format!("clear({:?})", flags));
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.record(format!("set_viewport({},{},{},{})", x, y, width, height));
    }

    fn set_cull_mode(&mut self, mode: CullMode) {
        let mut state = self.state.lock().unwrap();
        state.cull_mode = Some(mode);
        state.commands.push(format!("cull({:?})", mode));
    }

    fn finish(&mut self) {
        self.record("finish".to_string());
    }

    fn present(&mut self) -> Result<()> {
        self.record("present".to_string());
        Ok(())
    }

    fn create_storage_buffer(&mut self, size: usize, data: Option<&[u8]>) -> Result<BufferHandle> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        let mut bytes = vec![0u8; size];
        if let Some(data) = data {
            let n = data.len().min(size);
            bytes[..n].copy_from_slice(&data[..n]);
        }
        state.buffers.insert(id, bytes);
        state.commands.push(format!("create_storage_buffer({},{})", id, size));
        Ok(BufferHandle(id))
    }

    fn update_buffer(&mut self, buffer: BufferHandle, offset: usize, data: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.commands.push(format!("update_buffer({},{},{})", buffer.0, offset, data.len()));
        let fits = match state.buffers.get_mut(&buffer.0) {
            Some(bytes) if offset + data.len() <= bytes.len() => {
                bytes[offset..offset + data.len()].copy_from_slice(data);
                true
            }
            _ => false,
        };
        if !fits {
            state.overflowing_writes += 1;
        }
    }

    fn bind_storage_buffer(&mut self, buffer: BufferHandle, slot: u32) {
        self.record(format!("bind_storage_buffer({},{})", buffer.0, slot));
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        let mut state = self.state.lock().unwrap();
        state.buffers.remove(&buffer.0);
        state.commands.push(format!("delete_buffer({})", buffer.0));
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayHandle> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.commands.push(format!("create_vertex_array({})", id));
        Ok(VertexArrayHandle(id))
    }

    fn create_vertex_buffer(&mut self, vertex_array: VertexArrayHandle, data: &[u8]) -> Result<BufferHandle> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.buffers.insert(id, data.to_vec());
        state.commands.push(format!("create_vertex_buffer({},{},{})", vertex_array.0, id, data.len()));
        Ok(BufferHandle(id))
    }

    fn create_index_buffer(&mut self, vertex_array: VertexArrayHandle, indices: &[i32]) -> Result<BufferHandle> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.buffers.insert(id, bytemuck::cast_slice(indices).to_vec());
        state.commands.push(format!("create_index_buffer({},{},{})", vertex_array.0, id, indices.len()));
        Ok(BufferHandle(id))
    }

    fn set_vertex_attribute(
        &mut self,
        vertex_array: VertexArrayHandle,
        _vertex_buffer: BufferHandle,
        attribute: VertexAttribute,
    ) {
        let mut state = self.state.lock().unwrap();
        state.attributes.push((vertex_array, attribute));
        state.commands.push(format!(
            "set_vertex_attribute({},{},{},{})",
            vertex_array.0, attribute.location, attribute.components, attribute.offset
        ));
    }

    fn delete_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.record(format!("delete_vertex_array({})", vertex_array.0));
    }

    fn draw_arrays(&mut self, vertex_array: VertexArrayHandle, mode: DrawMode, count: u32) {
        self.record(format!("draw_arrays({},{:?},{})", vertex_array.0, mode, count));
    }

    fn draw_elements(&mut self, vertex_array: VertexArrayHandle, mode: DrawMode, count: u32) {
        self.record(format!("draw_elements({},{:?},{})", vertex_array.0, mode, count));
    }

    fn create_texture(&mut self, desc: &TextureDesc, pixels: Option<&[u8]>) -> Result<TextureHandle> {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.textures.insert(id, desc.clone());
        state.commands.push(format!(
            "create_texture({},{}x{},{:?},mips={},pixels={})",
            id, desc.width, desc.height, desc.layout, desc.mip_levels, pixels.is_some()
        ));
        state.commands.push(format!("generate_mipmap({})", id));
        Ok(TextureHandle(id))
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureHandle) {
        self.record(format!("bind_texture({},{})", unit, texture.0));
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        let mut state = self.state.lock().unwrap();
        state.textures.remove(&texture.0);
        state.commands.push(format!("delete_texture({})", texture.0));
    }

    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderStageHandle> {
        let mut state = self.state.lock().unwrap();
        state.commands.push(format!("compile_stage({:?})", stage));
        if source.contains("#error") {
            return Err(Error::ShaderError(format!("{:?}: 0(1) : error: #error directive", stage)));
        }
        let id = state.next_id();
        state.stages.insert(id, (stage, source.to_string()));
        Ok(ShaderStageHandle(id))
    }

    fn link_program(&mut self, stages: &[ShaderStageHandle]) -> Result<ProgramHandle> {
        let mut state = self.state.lock().unwrap();
        if stages.is_empty() {
            return Err(Error::ShaderError("no stages attached".to_string()));
        }
        let id = state.next_id();
        state.programs.insert(id, stages.iter().map(|s| s.0).collect());
        state.commands.push(format!("link_program({})", id));
        Ok(ProgramHandle(id))
    }

    fn reflect_program(&mut self, program: ProgramHandle) -> ProgramReflection {
        let state = self.state.lock().unwrap();
        let mut reflection = ProgramReflection::default();
        let Some(stage_ids) = state.programs.get(&program.0) else {
            return reflection;
        };

        for stage_id in stage_ids {
            let Some((stage, source)) = state.stages.get(stage_id) else {
                continue;
            };
            for decl in scan_declarations(source) {
                match decl.kind {
                    DeclarationKind::Input if *stage == ShaderStage::Vertex => {
                        let location = decl
                            .layout_value
                            .map(|v| v as i32)
                            .unwrap_or(reflection.attributes.len() as i32);
                        reflection.attributes.push(ReflectedVariable {
                            name: decl.name,
                            var_type: VarType::from_glsl_name(&decl.type_name),
                            location,
                        });
                    }
                    DeclarationKind::Uniform => {
                        if reflection.uniforms.iter().any(|u| u.name == decl.name) {
                            continue;
                        }
                        let location = reflection.uniforms.len() as i32;
                        reflection.uniforms.push(ReflectedVariable {
                            name: decl.name,
                            var_type: VarType::from_glsl_name(&decl.type_name),
                            location,
                        });
                    }
                    DeclarationKind::StorageBlock => {
                        if reflection.storage_blocks.iter().any(|b| b.name == decl.name) {
                            continue;
                        }
                        let index = reflection.storage_blocks.len() as u32;
                        reflection.storage_blocks.push(ReflectedBlock {
                            name: decl.name,
                            index,
                            binding: decl.layout_value.unwrap_or(0),
                        });
                    }
                    _ => {}
                }
            }
        }
        reflection
    }

    fn use_program(&mut self, program: ProgramHandle) {
        let mut state = self.state.lock().unwrap();
        state.current_program = program.0;
        state.commands.push(format!("use_program({})", program.0));
    }

    fn delete_stage(&mut self, stage: ShaderStageHandle) {
        let mut state = self.state.lock().unwrap();
        state.stages.remove(&stage.0);
        state.commands.push(format!("delete_stage({})", stage.0));
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        let mut state = self.state.lock().unwrap();
        state.programs.remove(&program.0);
        state.commands.push(format!("delete_program({})", program.0));
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
