/// Image decoding for textures
///
/// Decodes any format supported by the `image` crate into tightly packed
/// 4-byte BGRA pixels, the channel order textures upload from.

use std::path::Path;

use crate::error::{Error, Result};

/// Decoded pixels plus dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// width * height * 4 bytes, BGRA, rows top to bottom
    pub pixels: Vec<u8>,
}

/// Decode an image file into BGRA8
pub fn load_bgra(path: &Path) -> Result<DecodedImage> {
    let img = image::open(path)
        .map_err(|e| Error::AssetError(format!("cannot decode '{}': {}", path.display(), e)))?;
    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixels = rgba.into_raw();
    rgba_to_bgra(&mut pixels);
    Ok(DecodedImage { width, height, pixels })
}

/// Swap red and blue channels in place
pub fn rgba_to_bgra(pixels: &mut [u8]) {
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
}

#[cfg(test)]
#[path = "image_loader_tests.rs"]
mod tests;
