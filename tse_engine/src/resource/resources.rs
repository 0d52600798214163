/// Device plus the six resource managers.
///
/// This is the explicit context every loader and the renderer work through.
/// Cross-resource references (material → shader/textures, primitive →
/// material) are names resolved here at draw time, so deleting a resource
/// only makes its references stop resolving.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::graphics_device::GraphicsDevice;
use crate::engine_info;
use super::buffer::Buffer;
use super::font::Font;
use super::material::{Material, MaterialDesc, DEFAULT_NAME};
use super::primitive::{Primitive, Topology};
use super::resource_manager::ResourceManager;
use super::shader::Shader;
use super::texture::Texture;
use super::vertex::Vertex;

pub type BufferManager = ResourceManager<Buffer, u32>;
pub type TextureManager = ResourceManager<Texture, String>;
pub type ShaderManager = ResourceManager<Shader, String>;
pub type MaterialManager = ResourceManager<Material, String>;
pub type PrimitiveManager = ResourceManager<Primitive, u32>;
pub type FontManager = ResourceManager<Font, u32>;

pub struct Resources {
    device: Box<dyn GraphicsDevice>,
    pub buffers: BufferManager,
    pub textures: TextureManager,
    pub shaders: ShaderManager,
    pub materials: MaterialManager,
    pub primitives: PrimitiveManager,
    pub fonts: FontManager,
    shader_root: PathBuf,
    hot_reload: bool,
}

impl Resources {
    pub fn new(device: Box<dyn GraphicsDevice>, shader_root: impl Into<PathBuf>, hot_reload: bool) -> Self {
        Self {
            device,
            buffers: ResourceManager::new("tse::BufferManager"),
            textures: ResourceManager::new("tse::TextureManager"),
            shaders: ResourceManager::new("tse::ShaderManager"),
            materials: ResourceManager::new("tse::MaterialManager"),
            primitives: ResourceManager::new("tse::PrimitiveManager"),
            fonts: ResourceManager::new("tse::FontManager"),
            shader_root: shader_root.into(),
            hot_reload,
        }
    }

    pub fn device(&mut self) -> &mut dyn GraphicsDevice {
        self.device.as_mut()
    }

    pub fn shader_root(&self) -> &Path {
        &self.shader_root
    }

    pub fn hot_reload(&self) -> bool {
        self.hot_reload
    }

    // ===== BUFFERS =====

    pub fn buffer_create(&mut self, slot: u32, size: usize, data: Option<&[u8]>) -> Result<u32> {
        let buffer = Buffer::create(self.device.as_mut(), slot, size, data)?;
        Ok(self.buffers.add(self.device.as_mut(), buffer))
    }

    /// Overwrite part of a buffer; returns the byte count written
    pub fn buffer_update(&mut self, id: u32, data: &[u8], start: i64, size: i64) -> usize {
        match self.buffers.find_mut(&id) {
            Some(buffer) => buffer.update(self.device.as_mut(), data, start, size),
            None => 0,
        }
    }

    /// Bind a buffer at its slot
    pub fn buffer_apply(&mut self, id: u32) {
        if let Some(buffer) = self.buffers.find(&id) {
            buffer.apply(self.device.as_mut());
        }
    }

    pub fn buffer_delete(&mut self, id: u32) -> bool {
        self.buffers.delete(self.device.as_mut(), &id)
    }

    // ===== TEXTURES =====

    pub fn texture_create(
        &mut self,
        name: &str,
        width: u32,
        height: u32,
        bytes_per_pixel: u32,
        pixels: Option<&[u8]>,
        generate_mips: bool,
    ) -> Result<String> {
        let texture = Texture::create(
            self.device.as_mut(), name, width, height, bytes_per_pixel, pixels, generate_mips,
        )?;
        Ok(self.textures.add(self.device.as_mut(), texture))
    }

    /// Decode an image file; a failed decode still registers an invalid texture
    pub fn texture_load(&mut self, path: &Path) -> String {
        let texture = Texture::from_file(self.device.as_mut(), path);
        self.textures.add(self.device.as_mut(), texture)
    }

    pub fn texture_delete(&mut self, name: &str) -> bool {
        self.textures.delete(self.device.as_mut(), &name.to_string())
    }

    // ===== SHADERS =====

    /// Return the shader `name`, loading it from `<shader_root>/<name>` first
    /// if it is not registered yet
    pub fn shader_create(&mut self, name: &str) -> String {
        let key = name.to_string();
        if self.shaders.contains(&key) {
            return key;
        }
        let mut shader = Shader::new(name, &self.shader_root, self.hot_reload);
        shader.load(self.device.as_mut());
        self.shaders.add(self.device.as_mut(), shader)
    }

    /// Reload every shader whose folder changed; returns the reload count
    pub fn shader_update_all(&mut self) -> usize {
        self.shaders.update_all(self.device.as_mut())
    }

    pub fn shader_delete(&mut self, name: &str) -> bool {
        self.shaders.delete(self.device.as_mut(), &name.to_string())
    }

    // ===== MATERIALS =====

    /// Create (or replace) a material; a named shader is loaded on demand
    pub fn material_create(&mut self, desc: MaterialDesc) -> Result<String> {
        if let Some(shader) = &desc.shader {
            self.shader_create(shader);
        }
        let material = Material::from_desc(self.device.as_mut(), desc)?;
        Ok(self.materials.add(self.device.as_mut(), material))
    }

    /// Set a texture slot and re-upload the material block
    pub fn material_set_texture(&mut self, name: &str, slot: usize, texture: Option<String>) -> Result<()> {
        if let Some(material) = self.materials.find_mut(&name.to_string()) {
            material.set_texture(slot, texture);
            material.update(self.device.as_mut())?;
        }
        Ok(())
    }

    /// Re-upload a material block after its public fields changed
    pub fn material_update(&mut self, name: &str) -> Result<()> {
        if let Some(material) = self.materials.find_mut(&name.to_string()) {
            material.update(self.device.as_mut())?;
        }
        Ok(())
    }

    pub fn material_delete(&mut self, name: &str) -> bool {
        self.materials.delete(self.device.as_mut(), &name.to_string())
    }

    /// Material a primitive draws with: its own when it resolves, else "default"
    pub fn material_for(&self, primitive: &Primitive) -> Option<&Material> {
        primitive
            .material()
            .and_then(|name| self.materials.find(&name.to_string()))
            .or_else(|| self.materials.find(&DEFAULT_NAME.to_string()))
    }

    // ===== PRIMITIVES =====

    pub fn primitive_create<V: Vertex>(
        &mut self,
        material: Option<String>,
        topology: Topology,
        vertices: &[V],
        indices: &[i32],
    ) -> Result<u32> {
        let primitive = Primitive::create(self.device.as_mut(), material, topology, vertices, indices)?;
        Ok(self.primitives.add(self.device.as_mut(), primitive))
    }

    pub fn primitive_create_empty(&mut self, topology: Topology, count: u32) -> Result<u32> {
        let primitive = Primitive::create_empty(self.device.as_mut(), topology, count)?;
        Ok(self.primitives.add(self.device.as_mut(), primitive))
    }

    pub fn primitive_delete(&mut self, id: u32) -> bool {
        self.primitives.delete(self.device.as_mut(), &id)
    }

    /// Whether a primitive belongs to the opaque model pass
    ///
    /// Unknown primitives and primitives without a resolvable material count
    /// as opaque, like the default material.
    pub fn primitive_is_opaque(&self, id: u32) -> bool {
        self.primitives
            .find(&id)
            .and_then(|p| self.material_for(p))
            .map_or(true, |m| m.is_opaque())
    }

    /// Apply a primitive's material and bind its vertex layout
    ///
    /// Returns false when no shader resolves, in which case nothing should
    /// be drawn.
    pub fn bind_primitive(&mut self, id: u32) -> bool {
        let Some(primitive) = self.primitives.find(&id) else {
            return false;
        };
        let material = primitive
            .material()
            .and_then(|name| self.materials.find(&name.to_string()))
            .or_else(|| self.materials.find(&DEFAULT_NAME.to_string()));

        let shader = match material {
            Some(material) => material.apply(self.device.as_mut(), &self.shaders, &self.textures),
            None => {
                let shader = self.shaders.find(&DEFAULT_NAME.to_string());
                if let Some(shader) = shader {
                    shader.apply(self.device.as_mut());
                }
                shader
            }
        };
        let Some(shader) = shader else {
            return false;
        };

        match self.primitives.find_mut(&id) {
            Some(primitive) => {
                if primitive.needs_layout(shader) {
                    primitive.finalize_layout(self.device.as_mut(), shader);
                }
                true
            }
            None => false,
        }
    }

    /// Issue the draw call of a bound primitive
    pub fn draw_bound_primitive(&mut self, id: u32) {
        if let Some(primitive) = self.primitives.find(&id) {
            primitive.draw(self.device.as_mut());
        }
    }

    // ===== FONTS =====

    pub fn font_add(&mut self, font: Font) -> u32 {
        self.fonts.add(self.device.as_mut(), font)
    }

    /// Delete a font together with its glyph primitives
    pub fn font_delete(&mut self, id: u32) -> bool {
        let glyphs = match self.fonts.find(&id) {
            Some(font) => font.glyphs().to_vec(),
            None => return false,
        };
        for glyph in glyphs {
            self.primitives.delete(self.device.as_mut(), &glyph);
        }
        self.fonts.delete(self.device.as_mut(), &id)
    }

    // ===== LIFETIME =====

    /// Release every resource, dependents first
    pub fn clear(&mut self) {
        let device = self.device.as_mut();
        self.fonts.clear(device);
        self.primitives.clear(device);
        self.materials.clear(device);
        self.textures.clear(device);
        self.shaders.clear(device);
        self.buffers.clear(device);
    }

    /// Total live resources across all managers
    pub fn total_count(&self) -> usize {
        self.buffers.len()
            + self.textures.len()
            + self.shaders.len()
            + self.materials.len()
            + self.primitives.len()
            + self.fonts.len()
    }
}

impl Drop for Resources {
    fn drop(&mut self) {
        if self.total_count() > 0 {
            engine_info!("tse::Resources", "Releasing {} resource(s) on drop", self.total_count());
            self.clear();
        }
    }
}

#[cfg(test)]
#[path = "resources_tests.rs"]
mod tests;
