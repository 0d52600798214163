/// GlDevice - OpenGL 4.6 implementation of the GraphicsDevice trait
///
/// Wraps a current `glow::Context`. Presentation and the drawable size come
/// from a host-supplied `GlSurface` (glutin, SDL, ...), so this crate stays
/// independent of the windowing layer.

use std::num::NonZeroU32;

use glow::HasContext;
use rustc_hash::FxHashMap;
use tse_engine::tse::{Error, Result, RenderConfig};
use tse_engine::tse::device::{
    AttributeKind, BufferHandle, ClearFlags, CullMode, DrawMode, GraphicsDevice, ProgramHandle,
    ProgramReflection, ReflectedBlock, ReflectedVariable, ShaderStage, ShaderStageHandle,
    TextureDesc, TextureHandle, VertexArrayHandle, VertexAttribute,
};
use tse_engine::tse::device::glsl_scan::{scan_declarations, DeclarationKind};
use tse_engine::{engine_debug, engine_err, engine_info, engine_warn};

use crate::gl_format::{
    cull_face_to_gl, draw_mode_to_gl, gl_type_to_var_type, pixel_layout_to_gl, stage_to_gl, upload_size,
};

/// Window-system side of a GL context
pub trait GlSurface {
    /// Swap back and front buffers
    fn swap_buffers(&self) -> Result<()>;

    /// Drawable size in pixels
    fn size(&self) -> (u32, u32);
}

/// OpenGL device
pub struct GlDevice {
    gl: glow::Context,
    surface: Box<dyn GlSurface>,
    /// Storage block names declared by each compiled stage
    stage_blocks: FxHashMap<u32, Vec<(String, Option<u32>)>>,
    /// Storage block names of each linked program, merged from its stages
    program_blocks: FxHashMap<u32, Vec<(String, Option<u32>)>>,
}

// ===== HANDLE CONVERSION =====

fn raw<T>(id: u32, wrap: fn(NonZeroU32) -> T) -> Option<T> {
    NonZeroU32::new(id).map(wrap)
}

fn buffer(handle: BufferHandle) -> Option<glow::NativeBuffer> {
    raw(handle.0, glow::NativeBuffer)
}

fn vertex_array(handle: VertexArrayHandle) -> Option<glow::NativeVertexArray> {
    raw(handle.0, glow::NativeVertexArray)
}

fn texture(handle: TextureHandle) -> Option<glow::NativeTexture> {
    raw(handle.0, glow::NativeTexture)
}

fn stage(handle: ShaderStageHandle) -> Option<glow::NativeShader> {
    raw(handle.0, glow::NativeShader)
}

fn program(handle: ProgramHandle) -> Option<glow::NativeProgram> {
    raw(handle.0, glow::NativeProgram)
}

impl GlDevice {
    /// Wrap a context that is current on this thread
    pub fn new(gl: glow::Context, surface: Box<dyn GlSurface>, config: &RenderConfig) -> Self {
        #[allow(unused_mut)]
        let mut gl = gl;

        #[cfg(feature = "gl-debug")]
        if config.gl_debug {
            crate::gl_debug::install(&mut gl);
        }
        #[cfg(not(feature = "gl-debug"))]
        if config.gl_debug {
            engine_debug!("tse::gl::Device", "gl_debug requested but the gl-debug feature is off");
        }

        unsafe {
            engine_info!(
                "tse::gl::Device",
                "OpenGL {} on {} ({})",
                gl.get_parameter_string(glow::VERSION),
                gl.get_parameter_string(glow::RENDERER),
                gl.get_parameter_string(glow::VENDOR)
            );
        }

        Self {
            gl,
            surface,
            stage_blocks: FxHashMap::default(),
            program_blocks: FxHashMap::default(),
        }
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn surface(&self) -> &dyn GlSurface {
        self.surface.as_ref()
    }

    fn reflect_blocks(&self, native: glow::NativeProgram, id: u32) -> Vec<ReflectedBlock> {
        let Some(blocks) = self.program_blocks.get(&id) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for (name, layout_binding) in blocks {
            let Some(index) = (unsafe { self.gl.get_shader_storage_block_index(native, name) }) else {
                continue;
            };
            // Blocks without an explicit binding get their block index
            let binding = match layout_binding {
                Some(binding) => *binding,
                None => {
                    unsafe { self.gl.shader_storage_block_binding(native, index, index) };
                    index
                }
            };
            out.push(ReflectedBlock { name: name.clone(), index, binding });
        }
        out
    }
}

impl GraphicsDevice for GlDevice {
    // ===== STATE =====

    fn init_state(&mut self) -> Result<()> {
        unsafe {
            self.gl.enable(glow::DEPTH_TEST);
            self.gl.enable(glow::PRIMITIVE_RESTART_FIXED_INDEX);
            self.gl.enable(glow::BLEND);
            self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            self.gl.disable(glow::CULL_FACE);

            let error = self.gl.get_error();
            if error != glow::NO_ERROR {
                return Err(Error::InitializationFailed(format!("GL error 0x{:x} during state setup", error)));
            }
        }
        let (width, height) = self.surface.size();
        engine_debug!("tse::gl::Device", "State initialized, drawable {}x{}", width, height);
        Ok(())
    }

    fn set_clear_color(&mut self, color: [f32; 4], depth: f32) {
        unsafe {
            self.gl.clear_color(color[0], color[1], color[2], color[3]);
            self.gl.clear_depth_f32(depth);
        }
    }

    fn clear(&mut self, flags: ClearFlags) {
        let mut mask = 0;
        if flags.contains(ClearFlags::COLOR) {
            mask |= glow::COLOR_BUFFER_BIT;
        }
        if flags.contains(ClearFlags::DEPTH) {
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        unsafe { self.gl.clear(mask) };
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        unsafe { self.gl.viewport(x, y, width as i32, height as i32) };
    }

    fn set_cull_mode(&mut self, mode: CullMode) {
        unsafe {
            match cull_face_to_gl(mode) {
                Some(face) => {
                    self.gl.enable(glow::CULL_FACE);
                    self.gl.cull_face(face);
                }
                None => self.gl.disable(glow::CULL_FACE),
            }
        }
    }

    fn finish(&mut self) {
        unsafe { self.gl.finish() };
    }

    fn present(&mut self) -> Result<()> {
        self.surface.swap_buffers()
    }

    // ===== BUFFERS =====

    fn create_storage_buffer(&mut self, size: usize, data: Option<&[u8]>) -> Result<BufferHandle> {
        unsafe {
            let native = self
                .gl
                .create_buffer()
                .map_err(|e| engine_err!("tse::gl::Device", "Storage buffer creation failed: {}", e))?;
            self.gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, Some(native));
            match data {
                Some(bytes) if bytes.len() >= size => {
                    self.gl.buffer_data_u8_slice(glow::SHADER_STORAGE_BUFFER, &bytes[..size], glow::DYNAMIC_COPY);
                }
                Some(bytes) => {
                    self.gl.buffer_data_size(glow::SHADER_STORAGE_BUFFER, size as i32, glow::DYNAMIC_COPY);
                    self.gl.buffer_sub_data_u8_slice(glow::SHADER_STORAGE_BUFFER, 0, bytes);
                }
                None => self.gl.buffer_data_size(glow::SHADER_STORAGE_BUFFER, size as i32, glow::DYNAMIC_COPY),
            }
            self.gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, None);
            Ok(BufferHandle(native.0.get()))
        }
    }

    fn update_buffer(&mut self, handle: BufferHandle, offset: usize, data: &[u8]) {
        let Some(native) = buffer(handle) else {
            return;
        };
        unsafe {
            self.gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, Some(native));
            self.gl.buffer_sub_data_u8_slice(glow::SHADER_STORAGE_BUFFER, offset as i32, data);
            self.gl.bind_buffer(glow::SHADER_STORAGE_BUFFER, None);
        }
    }

    fn bind_storage_buffer(&mut self, handle: BufferHandle, slot: u32) {
        unsafe { self.gl.bind_buffer_base(glow::SHADER_STORAGE_BUFFER, slot, buffer(handle)) };
    }

    fn delete_buffer(&mut self, handle: BufferHandle) {
        if let Some(native) = buffer(handle) {
            unsafe { self.gl.delete_buffer(native) };
        }
    }

    // ===== VERTEX ARRAYS =====

    fn create_vertex_array(&mut self) -> Result<VertexArrayHandle> {
        let native = unsafe { self.gl.create_vertex_array() }
            .map_err(|e| engine_err!("tse::gl::Device", "Vertex array creation failed: {}", e))?;
        Ok(VertexArrayHandle(native.0.get()))
    }

    fn create_vertex_buffer(&mut self, array: VertexArrayHandle, data: &[u8]) -> Result<BufferHandle> {
        unsafe {
            let native = self
                .gl
                .create_buffer()
                .map_err(|e| engine_err!("tse::gl::Device", "Vertex buffer creation failed: {}", e))?;
            self.gl.bind_vertex_array(vertex_array(array));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(native));
            self.gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            Ok(BufferHandle(native.0.get()))
        }
    }

    fn create_index_buffer(&mut self, array: VertexArrayHandle, indices: &[i32]) -> Result<BufferHandle> {
        unsafe {
            let native = self
                .gl
                .create_buffer()
                .map_err(|e| engine_err!("tse::gl::Device", "Index buffer creation failed: {}", e))?;
            // The element binding is vertex array state, keep it bound on unbind
            self.gl.bind_vertex_array(vertex_array(array));
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(native));
            self.gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(indices), glow::STATIC_DRAW);
            self.gl.bind_vertex_array(None);
            Ok(BufferHandle(native.0.get()))
        }
    }

    fn set_vertex_attribute(&mut self, array: VertexArrayHandle, vertex_buffer: BufferHandle, attribute: VertexAttribute) {
        unsafe {
            self.gl.bind_vertex_array(vertex_array(array));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, buffer(vertex_buffer));
            match attribute.kind {
                AttributeKind::Float => self.gl.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components as i32,
                    glow::FLOAT,
                    false,
                    attribute.stride as i32,
                    attribute.offset as i32,
                ),
                AttributeKind::Int => self.gl.vertex_attrib_pointer_i32(
                    attribute.location,
                    attribute.components as i32,
                    glow::INT,
                    attribute.stride as i32,
                    attribute.offset as i32,
                ),
            }
            self.gl.enable_vertex_attrib_array(attribute.location);
            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn delete_vertex_array(&mut self, array: VertexArrayHandle) {
        if let Some(native) = vertex_array(array) {
            unsafe { self.gl.delete_vertex_array(native) };
        }
    }

    // ===== DRAWS =====

    fn draw_arrays(&mut self, array: VertexArrayHandle, mode: DrawMode, count: u32) {
        unsafe {
            self.gl.bind_vertex_array(vertex_array(array));
            self.gl.draw_arrays(draw_mode_to_gl(mode), 0, count as i32);
            self.gl.bind_vertex_array(None);
        }
    }

    fn draw_elements(&mut self, array: VertexArrayHandle, mode: DrawMode, count: u32) {
        unsafe {
            self.gl.bind_vertex_array(vertex_array(array));
            self.gl.draw_elements(draw_mode_to_gl(mode), count as i32, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }

    // ===== TEXTURES =====

    fn create_texture(&mut self, desc: &TextureDesc, pixels: Option<&[u8]>) -> Result<TextureHandle> {
        let (internal, format) = pixel_layout_to_gl(desc.layout);
        unsafe {
            let native = self
                .gl
                .create_texture()
                .map_err(|e| engine_err!("tse::gl::Device", "Texture creation failed: {}", e))?;
            self.gl.bind_texture(glow::TEXTURE_2D, Some(native));
            self.gl.tex_storage_2d(
                glow::TEXTURE_2D,
                desc.mip_levels.max(1) as i32,
                internal,
                desc.width as i32,
                desc.height as i32,
            );
            if let Some(pixels) = pixels {
                let expected = upload_size(desc.width, desc.height, desc.layout).filter(|&n| n <= pixels.len());
                let Some(expected) = expected else {
                    self.gl.bind_texture(glow::TEXTURE_2D, None);
                    self.gl.delete_texture(native);
                    return Err(Error::InvalidResource(format!(
                        "texture upload of {}x{} needs more than {} bytes",
                        desc.width,
                        desc.height,
                        pixels.len()
                    )));
                };
                self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
                self.gl.tex_sub_image_2d(
                    glow::TEXTURE_2D,
                    0,
                    0,
                    0,
                    desc.width as i32,
                    desc.height as i32,
                    format,
                    glow::UNSIGNED_BYTE,
                    glow::PixelUnpackData::Slice(&pixels[..expected]),
                );
            }
            // the mip chain is built even for storage-only textures
            self.gl.generate_mipmap(glow::TEXTURE_2D);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            self.gl.bind_texture(glow::TEXTURE_2D, None);
            Ok(TextureHandle(native.0.get()))
        }
    }

    fn bind_texture(&mut self, unit: u32, handle: TextureHandle) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, texture(handle));
        }
    }

    fn delete_texture(&mut self, handle: TextureHandle) {
        if let Some(native) = texture(handle) {
            unsafe { self.gl.delete_texture(native) };
        }
    }

    // ===== PROGRAMS =====

    fn compile_stage(&mut self, kind: ShaderStage, source: &str) -> Result<ShaderStageHandle> {
        unsafe {
            let native = self
                .gl
                .create_shader(stage_to_gl(kind))
                .map_err(|e| engine_err!("tse::gl::Device", "Shader object creation failed: {}", e))?;
            self.gl.shader_source(native, source);
            self.gl.compile_shader(native);
            if !self.gl.get_shader_compile_status(native) {
                let log = self.gl.get_shader_info_log(native);
                self.gl.delete_shader(native);
                return Err(Error::ShaderError(format!("{:?} stage: {}", kind, log.trim_end())));
            }
            let blocks = scan_declarations(source)
                .into_iter()
                .filter(|d| d.kind == DeclarationKind::StorageBlock)
                .map(|d| (d.name, d.layout_value))
                .collect();
            let id = native.0.get();
            self.stage_blocks.insert(id, blocks);
            Ok(ShaderStageHandle(id))
        }
    }

    fn link_program(&mut self, stages: &[ShaderStageHandle]) -> Result<ProgramHandle> {
        unsafe {
            let native = self
                .gl
                .create_program()
                .map_err(|e| engine_err!("tse::gl::Device", "Program creation failed: {}", e))?;
            for handle in stages.iter().copied().filter_map(stage) {
                self.gl.attach_shader(native, handle);
            }
            self.gl.link_program(native);
            for handle in stages.iter().copied().filter_map(stage) {
                self.gl.detach_shader(native, handle);
            }
            if !self.gl.get_program_link_status(native) {
                let log = self.gl.get_program_info_log(native);
                self.gl.delete_program(native);
                return Err(Error::ShaderError(format!("link: {}", log.trim_end())));
            }

            let mut blocks: Vec<(String, Option<u32>)> = Vec::new();
            for handle in stages {
                for block in self.stage_blocks.get(&handle.0).into_iter().flatten() {
                    if !blocks.iter().any(|(name, _)| *name == block.0) {
                        blocks.push(block.clone());
                    }
                }
            }
            let id = native.0.get();
            self.program_blocks.insert(id, blocks);
            Ok(ProgramHandle(id))
        }
    }

    fn reflect_program(&mut self, handle: ProgramHandle) -> ProgramReflection {
        let Some(native) = program(handle) else {
            return ProgramReflection::default();
        };
        let mut reflection = ProgramReflection::default();
        unsafe {
            for index in 0..self.gl.get_active_attributes(native) {
                let Some(attribute) = self.gl.get_active_attribute(native, index) else {
                    continue;
                };
                let location = self
                    .gl
                    .get_attrib_location(native, &attribute.name)
                    .map_or(-1, |l| l as i32);
                reflection.attributes.push(ReflectedVariable {
                    var_type: gl_type_to_var_type(attribute.atype),
                    name: attribute.name,
                    location,
                });
            }
            for index in 0..self.gl.get_active_uniforms(native) {
                let Some(uniform) = self.gl.get_active_uniform(native, index) else {
                    continue;
                };
                let location = self
                    .gl
                    .get_uniform_location(native, &uniform.name)
                    .map_or(-1, |l| l.0 as i32);
                reflection.uniforms.push(ReflectedVariable {
                    var_type: gl_type_to_var_type(uniform.utype),
                    name: uniform.name,
                    location,
                });
            }
        }
        reflection.storage_blocks = self.reflect_blocks(native, handle.0);

        let unknown = reflection
            .attributes
            .iter()
            .chain(&reflection.uniforms)
            .filter(|v| !v.var_type.is_known())
            .count();
        if unknown > 0 {
            engine_warn!("tse::gl::Device", "Program {}: {} variable(s) of unmapped type", handle.0, unknown);
        }
        reflection
    }

    fn use_program(&mut self, handle: ProgramHandle) {
        unsafe { self.gl.use_program(program(handle)) };
    }

    fn delete_stage(&mut self, handle: ShaderStageHandle) {
        self.stage_blocks.remove(&handle.0);
        if let Some(native) = stage(handle) {
            unsafe { self.gl.delete_shader(native) };
        }
    }

    fn delete_program(&mut self, handle: ProgramHandle) {
        self.program_blocks.remove(&handle.0);
        if let Some(native) = program(handle) {
            unsafe { self.gl.delete_program(native) };
        }
    }
}
