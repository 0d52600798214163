/// 2D GPU texture resource.
///
/// Built either from raw pixel bytes (1, 3 or 4 bytes per pixel) or from an
/// image file decoded to BGRA. Dimensions never change after creation; to
/// resize, create a new texture under the same name.

use std::path::Path;

use crate::error::Result;
use crate::engine_warn;
use crate::graphics_device::{GraphicsDevice, PixelLayout, TextureDesc, TextureHandle};
use super::image_loader;
use super::resource_manager::Resource;

pub struct Texture {
    name: String,
    handle: TextureHandle,
    width: u32,
    height: u32,
    mip_levels: u32,
}

/// Mip chain length: ceil(log2(max(w, h))) when mips are wanted, at least 1
pub fn mip_level_count(width: u32, height: u32, generate_mips: bool) -> u32 {
    let largest = width.max(height);
    if !generate_mips || largest <= 1 {
        return 1;
    }
    // ceil(log2(n)) for n >= 2
    32 - (largest - 1).leading_zeros()
}

impl Texture {
    /// Allocate a texture and optionally upload pixels
    ///
    /// `bytes_per_pixel` selects the upload layout: 4 → BGRA, 3 → BGR,
    /// anything else → single channel. Mips are generated after the upload
    /// even when no pixels are given.
    pub fn create(
        device: &mut dyn GraphicsDevice,
        name: &str,
        width: u32,
        height: u32,
        bytes_per_pixel: u32,
        pixels: Option<&[u8]>,
        generate_mips: bool,
    ) -> Result<Self> {
        let layout = PixelLayout::from_bytes_per_pixel(bytes_per_pixel);
        let desc = TextureDesc {
            width,
            height,
            layout,
            mip_levels: mip_level_count(width, height, generate_mips),
        };

        let expected = width as usize * height as usize * layout.bytes_per_pixel();
        let pixels = match pixels {
            Some(p) if p.len() < expected => {
                engine_warn!("tse::Texture",
                    "Texture '{}': {} pixel bytes given, {} expected, uploading none",
                    name, p.len(), expected);
                None
            }
            other => other.map(|p| &p[..expected]),
        };

        let handle = device.create_texture(&desc, pixels)?;
        Ok(Self {
            name: name.to_string(),
            handle,
            width,
            height,
            mip_levels: desc.mip_levels,
        })
    }

    /// Decode an image file and upload it as BGRA with mips
    ///
    /// A decode failure is logged and yields an invalid (0-handle) texture
    /// named after the path, which binds as "no texture".
    pub fn from_file(device: &mut dyn GraphicsDevice, path: &Path) -> Self {
        let name = path.to_string_lossy().into_owned();
        let created = image_loader::load_bgra(path).and_then(|image| {
            Self::create(device, &name, image.width, image.height, 4, Some(&image.pixels), true)
        });

        match created {
            Ok(texture) => texture,
            Err(e) => {
                engine_warn!("tse::Texture", "Texture '{}' not loaded: {}", name, e);
                Self::invalid(&name)
            }
        }
    }

    /// An unallocated texture
    pub fn invalid(name: &str) -> Self {
        Self {
            name: name.to_string(),
            handle: TextureHandle::INVALID,
            width: 0,
            height: 0,
            mip_levels: 0,
        }
    }

    /// Bind to texture unit `unit`
    pub fn apply(&self, device: &mut dyn GraphicsDevice, unit: u32) {
        if self.handle.is_valid() {
            device.bind_texture(unit, self.handle);
        }
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }

    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }
}

impl Resource for Texture {
    fn name(&self) -> &str {
        &self.name
    }

    fn free(&mut self, device: &mut dyn GraphicsDevice) {
        if self.handle.is_valid() {
            device.delete_texture(self.handle);
        }
        self.handle = TextureHandle::INVALID;
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
