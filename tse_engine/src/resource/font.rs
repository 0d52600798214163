/// Bitmap font loaded from a G3DF container.
///
/// Layout (little-endian): "G3DF", u32 line height, u32 base height,
/// 256 × f32 advance widths, 256 × 4 vertex records (one quad strip per
/// character code), u32 width, u32 height, width × height × 4 pixel bytes.
///
/// Each glyph becomes a 4-vertex strip primitive sharing one material named
/// after the file, which samples the atlas in texture slot 0 through the
/// "font" shader.

use std::path::Path;

use glam::{Mat4, Vec3};

use crate::error::{Error, Result};
use crate::graphics_device::GraphicsDevice;
use crate::engine_info;
use super::asset_reader::AssetReader;
use super::material::MaterialDesc;
use super::primitive::Topology;
use super::resource_manager::Resource;
use super::resources::Resources;
use super::vertex::VertexStd;

const MAGIC: &[u8; 4] = b"G3DF";

/// Number of character codes
pub const GLYPH_COUNT: usize = 256;

/// Shader used by font materials
pub const FONT_SHADER: &str = "font";

/// Decoded G3DF contents
pub struct FontData {
    pub line_height: u32,
    pub base_height: u32,
    pub advances: Vec<f32>,
    pub vertices: Vec<VertexStd>,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Decode a G3DF container
pub fn parse_container(data: &[u8]) -> Result<FontData> {
    let mut reader = AssetReader::new(data);
    reader.expect_magic(MAGIC)?;
    let line_height = reader.u32()?;
    let base_height = reader.u32()?;
    let advances = reader.pod_vec::<f32>(GLYPH_COUNT)?;
    let vertices = reader.pod_vec::<VertexStd>(GLYPH_COUNT * 4)?;
    let width = reader.u32()?;
    let height = reader.u32()?;
    let size = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or(Error::OutOfMemory)?;
    let pixels = reader.bytes(size)?.to_vec();
    Ok(FontData { line_height, base_height, advances, vertices, width, height, pixels })
}

/// One glyph draw produced by text layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub code: u8,
    pub transform: Mat4,
}

pub struct Font {
    name: String,
    line_height: u32,
    base_height: u32,
    advances: Vec<f32>,
    material: String,
    glyphs: Vec<u32>,
}

impl Font {
    /// Load a font file and register it in the font manager
    pub fn load(res: &mut Resources, path: &Path) -> Result<u32> {
        let bytes = std::fs::read(path)?;
        let data = parse_container(&bytes)?;
        let name = path.to_string_lossy().into_owned();

        let texture = res.texture_create(&name, data.width, data.height, 4, Some(&data.pixels), true)?;
        let material = res.material_create(MaterialDesc {
            name: name.clone(),
            shader: Some(FONT_SHADER.to_string()),
            textures: vec![Some(texture)],
            ..Default::default()
        })?;

        let mut glyphs = Vec::with_capacity(GLYPH_COUNT);
        for quad in data.vertices.chunks_exact(4) {
            glyphs.push(res.primitive_create(Some(material.clone()), Topology::Strip, quad, &[])?);
        }

        let font = Font {
            name: name.clone(),
            line_height: data.line_height,
            base_height: data.base_height,
            advances: data.advances,
            material,
            glyphs,
        };
        let id = res.font_add(font);
        engine_info!("tse::Font", "Font loaded: {}", name);
        Ok(id)
    }

    /// Place every glyph of `text`, starting at `pos`
    ///
    /// Each glyph is scaled by `size` in X and Y and translated to the pen
    /// position; the pen then advances by the glyph's width times `size`. A
    /// newline returns the pen to the starting X and moves it down by `size`.
    pub fn layout(&self, text: &str, pos: Vec3, size: f32) -> Vec<GlyphPlacement> {
        let mut pen = pos;
        let mut placements = Vec::with_capacity(text.len());
        for code in text.bytes() {
            if code == b'\n' {
                pen.x = pos.x;
                pen.y -= size;
                continue;
            }
            placements.push(GlyphPlacement {
                code,
                transform: Mat4::from_translation(pen) * Mat4::from_scale(Vec3::new(size, size, 1.0)),
            });
            pen.x += self.advance(code) * size;
        }
        placements
    }

    pub fn advance(&self, code: u8) -> f32 {
        self.advances.get(code as usize).copied().unwrap_or(0.0)
    }

    pub fn line_height(&self) -> u32 {
        self.line_height
    }

    pub fn base_height(&self) -> u32 {
        self.base_height
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    /// Primitive key of a character code
    pub fn glyph(&self, code: u8) -> Option<u32> {
        self.glyphs.get(code as usize).copied()
    }

    pub fn glyphs(&self) -> &[u32] {
        &self.glyphs
    }
}

impl Resource for Font {
    fn name(&self) -> &str {
        &self.name
    }

    // Glyph primitives live in the primitive manager; Resources::font_delete
    // releases them.
    fn free(&mut self, _device: &mut dyn GraphicsDevice) {}
}

#[cfg(test)]
#[path = "font_tests.rs"]
mod tests;
