/// Resource-level material type.
///
/// A Material bundles Phong-style shading coefficients, an optional shader
/// reference, up to 8 texture slots and a storage buffer mirroring those
/// values for the shader (binding slot 3).
///
/// References are names resolved through the managers at apply time, so a
/// deleted shader or texture simply stops resolving.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

use crate::error::Result;
use crate::graphics_device::GraphicsDevice;
use super::buffer::Buffer;
use super::resource_manager::{Resource, ResourceManager};
use super::shader::Shader;
use super::texture::Texture;

/// Binding slot of the material block
pub const MATERIAL_SLOT: u32 = 3;

/// Number of texture slots per material
pub const MAX_TEXTURES: usize = 8;

/// Name of the fallback shader and material
pub const DEFAULT_NAME: &str = "default";

// ===== GPU BLOCK =====

/// Material block as laid out in shaders
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialSync {
    pub ka: Vec4,
    /// xyz = Kd, w = transparency
    pub kd_trans: Vec4,
    /// xyz = Ks, w = shininess
    pub ks_ph: Vec4,
    /// 1 where the texture slot is occupied
    pub tex_flags: [i32; MAX_TEXTURES],
}

// ===== MATERIAL DESC =====

/// Descriptor for creating a Material
#[derive(Debug, Clone)]
pub struct MaterialDesc {
    pub name: String,
    pub ka: Vec3,
    pub kd: Vec3,
    pub ks: Vec3,
    pub ph: f32,
    pub trans: f32,
    /// None falls back to the "default" shader
    pub shader: Option<String>,
    /// Texture names per slot; slots past the list stay empty
    pub textures: Vec<Option<String>>,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            ka: Vec3::splat(0.1),
            kd: Vec3::splat(0.9),
            ks: Vec3::ZERO,
            ph: 30.0,
            trans: 1.0,
            shader: None,
            textures: Vec::new(),
        }
    }
}

// ===== MATERIAL =====

pub struct Material {
    name: String,
    pub ka: Vec3,
    pub kd: Vec3,
    pub ks: Vec3,
    pub ph: f32,
    pub trans: f32,
    shader: Option<String>,
    textures: [Option<String>; MAX_TEXTURES],
    buffer: Option<Buffer>,
}

impl Material {
    pub fn from_desc(device: &mut dyn GraphicsDevice, desc: MaterialDesc) -> Result<Self> {
        let mut textures: [Option<String>; MAX_TEXTURES] = Default::default();
        for (slot, texture) in textures.iter_mut().zip(desc.textures) {
            *slot = texture;
        }

        let mut material = Self {
            name: desc.name,
            ka: desc.ka,
            kd: desc.kd,
            ks: desc.ks,
            ph: desc.ph,
            trans: desc.trans,
            shader: desc.shader,
            textures,
            buffer: None,
        };
        material.update(device)?;
        Ok(material)
    }

    /// Block contents for the current fields
    pub fn sync_block(&self) -> MaterialSync {
        let mut tex_flags = [0i32; MAX_TEXTURES];
        for (flag, slot) in tex_flags.iter_mut().zip(&self.textures) {
            *flag = slot.is_some() as i32;
        }
        MaterialSync {
            ka: self.ka.extend(0.0),
            kd_trans: self.kd.extend(self.trans),
            ks_ph: self.ks.extend(self.ph),
            tex_flags,
        }
    }

    /// Rebuild the material buffer after any field change
    pub fn update(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let block = self.sync_block();
        let bytes = bytemuck::bytes_of(&block);
        match &mut self.buffer {
            Some(buffer) => buffer.recreate(device, MATERIAL_SLOT, bytes.len(), Some(bytes))?,
            None => self.buffer = Some(Buffer::create_for(device, MATERIAL_SLOT, Some(&block))?),
        }
        Ok(())
    }

    /// Resolve the shader used to draw with this material
    ///
    /// Falls back to the "default" shader when the reference is empty or no
    /// longer resolves.
    pub fn resolve_shader<'a>(&self, shaders: &'a ResourceManager<Shader, String>) -> Option<&'a Shader> {
        self.shader
            .as_ref()
            .and_then(|name| shaders.find(name))
            .or_else(|| shaders.find(&DEFAULT_NAME.to_string()))
    }

    /// Bind shader, material block and textures
    ///
    /// Returns the shader that was applied, or None (nothing bound) when no
    /// shader resolves.
    pub fn apply<'a>(
        &self,
        device: &mut dyn GraphicsDevice,
        shaders: &'a ResourceManager<Shader, String>,
        textures: &ResourceManager<Texture, String>,
    ) -> Option<&'a Shader> {
        let shader = self.resolve_shader(shaders)?;
        shader.apply(device);

        if let Some(buffer) = &self.buffer {
            buffer.apply(device);
        }
        for (unit, slot) in self.textures.iter().enumerate() {
            if let Some(texture) = slot.as_ref().and_then(|name| textures.find(name)) {
                texture.apply(device, unit as u32);
            }
        }
        Some(shader)
    }

    /// Set (or clear) a texture slot; call `update` afterwards
    pub fn set_texture(&mut self, slot: usize, texture: Option<String>) {
        if let Some(entry) = self.textures.get_mut(slot) {
            *entry = texture;
        }
    }

    pub fn set_shader(&mut self, shader: Option<String>) {
        self.shader = shader;
    }

    pub fn shader(&self) -> Option<&str> {
        self.shader.as_deref()
    }

    pub fn texture(&self, slot: usize) -> Option<&str> {
        self.textures.get(slot).and_then(|t| t.as_deref())
    }

    pub fn textures(&self) -> &[Option<String>; MAX_TEXTURES] {
        &self.textures
    }

    /// Fully opaque materials are drawn in the first model pass
    pub fn is_opaque(&self) -> bool {
        self.trans == 1.0
    }

    pub fn buffer(&self) -> Option<&Buffer> {
        self.buffer.as_ref()
    }
}

impl Resource for Material {
    fn name(&self) -> &str {
        &self.name
    }

    fn free(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(buffer) = &mut self.buffer {
            buffer.free(device);
        }
        self.buffer = None;
    }
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
