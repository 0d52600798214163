use super::*;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::resource::image_loader::rgba_to_bgra;

// ============================================================================
// Mip count tests
// ============================================================================

#[test]
fn test_mip_count_power_of_two() {
    assert_eq!(mip_level_count(256, 256, true), 8);
    assert_eq!(mip_level_count(2, 1, true), 1);
}

#[test]
fn test_mip_count_rounds_up() {
    assert_eq!(mip_level_count(300, 20, true), 9);
    assert_eq!(mip_level_count(3, 3, true), 2);
}

#[test]
fn test_mip_count_disabled_or_single_texel() {
    assert_eq!(mip_level_count(512, 512, false), 1);
    assert_eq!(mip_level_count(1, 1, true), 1);
    assert_eq!(mip_level_count(0, 0, true), 1);
}

// ============================================================================
// Creation tests
// ============================================================================

#[test]
fn test_create_bgra_with_pixels() {
    let mut device = MockGraphicsDevice::new();
    let pixels = vec![255u8; 4 * 4 * 4];
    let texture = Texture::create(&mut device, "checker", 4, 4, 4, Some(&pixels), true).unwrap();

    assert!(texture.is_valid());
    assert_eq!(texture.width(), 4);
    assert_eq!(texture.mip_levels(), 2);

    let state = device.state();
    let state = state.lock().unwrap();
    let desc = &state.textures[&texture.handle().0];
    assert_eq!(desc.layout, PixelLayout::Bgra8);
    assert_eq!(state.count("generate_mipmap"), 1);
}

#[test]
fn test_create_layout_from_bytes_per_pixel() {
    let mut device = MockGraphicsDevice::new();
    let bgr = Texture::create(&mut device, "bgr", 2, 2, 3, None, false).unwrap();
    let mono = Texture::create(&mut device, "mono", 2, 2, 2, None, false).unwrap();

    let state = device.state();
    let state = state.lock().unwrap();
    assert_eq!(state.textures[&bgr.handle().0].layout, PixelLayout::Bgr8);
    assert_eq!(state.textures[&mono.handle().0].layout, PixelLayout::R8);
}

#[test]
fn test_create_without_pixels_still_generates_mips() {
    let mut device = MockGraphicsDevice::new();
    Texture::create(&mut device, "target", 64, 32, 4, None, true).unwrap();

    let state = device.state();
    let state = state.lock().unwrap();
    assert!(state.commands.iter().any(|c| c.contains("pixels=false")));
    assert_eq!(state.count("generate_mipmap"), 1);
}

#[test]
fn test_create_short_pixel_buffer_uploads_nothing() {
    let mut device = MockGraphicsDevice::new();
    Texture::create(&mut device, "short", 4, 4, 4, Some(&[0u8; 10]), false).unwrap();
    assert!(device.state().lock().unwrap().commands.iter().any(|c| c.contains("pixels=false")));
}

#[test]
fn test_from_missing_file_is_invalid() {
    let mut device = MockGraphicsDevice::new();
    let texture = Texture::from_file(&mut device, Path::new("no/such/image.png"));

    assert!(!texture.is_valid());
    assert_eq!(texture.name(), "no/such/image.png");
    texture.apply(&mut device, 0);
    assert_eq!(device.state().lock().unwrap().count("bind_texture"), 0);
}

#[test]
fn test_free_releases_handle() {
    let mut device = MockGraphicsDevice::new();
    let mut texture = Texture::create(&mut device, "t", 1, 1, 4, None, false).unwrap();
    texture.free(&mut device);
    texture.free(&mut device);

    assert!(!texture.is_valid());
    assert_eq!(device.state().lock().unwrap().count("delete_texture"), 1);
}

#[test]
fn test_rgba_to_bgra_swizzle() {
    let mut px = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    rgba_to_bgra(&mut px);
    assert_eq!(px, vec![3, 2, 1, 4, 7, 6, 5, 8]);
}
