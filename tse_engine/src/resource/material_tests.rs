use super::*;
use crate::graphics_device::mock_graphics_device::MockGraphicsDevice;
use crate::test_utils::TempDir;

// ============================================================================
// Helpers
// ============================================================================

fn desc_with_textures(textures: Vec<Option<String>>) -> MaterialDesc {
    MaterialDesc {
        name: "brick".to_string(),
        textures,
        ..Default::default()
    }
}

/// Decode the bytes the mock stored for the material buffer
fn stored_block(device: &MockGraphicsDevice, material: &Material) -> MaterialSync {
    let handle = material.buffer().unwrap().handle();
    let state = device.state();
    let state = state.lock().unwrap();
    bytemuck::pod_read_unaligned::<MaterialSync>(&state.buffers[&handle.0])
}

fn shader_manager_with(device: &mut MockGraphicsDevice, root: &TempDir, names: &[&str]) -> ResourceManager<Shader, String> {
    let mut shaders = ResourceManager::new("tse::ShaderManager");
    for name in names {
        root.write(&format!("{}/vert.glsl", name), "in vec3 InPosition;\nvoid main() {}\n");
        root.write(&format!("{}/frag.glsl", name), "void main() {}\n");
        let mut shader = Shader::new(name, root.path(), false);
        shader.load(device);
        shaders.add(device, shader);
    }
    shaders
}

// ============================================================================
// Creation tests
// ============================================================================

#[test]
fn test_default_coefficients() {
    let desc = MaterialDesc::default();
    assert_eq!(desc.ka, Vec3::splat(0.1));
    assert_eq!(desc.kd, Vec3::splat(0.9));
    assert_eq!(desc.ks, Vec3::ZERO);
    assert_eq!(desc.ph, 30.0);
    assert_eq!(desc.trans, 1.0);
}

#[test]
fn test_block_layout_size() {
    assert_eq!(std::mem::size_of::<MaterialSync>(), 80);
}

#[test]
fn test_create_uploads_block_at_slot_3() {
    let mut device = MockGraphicsDevice::new();
    let material = Material::from_desc(&mut device, MaterialDesc {
        kd: Vec3::new(0.2, 0.4, 0.6),
        trans: 0.5,
        ks: Vec3::ONE,
        ph: 64.0,
        ..desc_with_textures(vec![])
    }).unwrap();

    let buffer = material.buffer().unwrap();
    assert_eq!(buffer.slot(), MATERIAL_SLOT);

    let block = stored_block(&device, &material);
    assert_eq!(block.kd_trans, Vec4::new(0.2, 0.4, 0.6, 0.5));
    assert_eq!(block.ks_ph, Vec4::new(1.0, 1.0, 1.0, 64.0));
}

// ============================================================================
// Texture flag tests
// ============================================================================

#[test]
fn test_texture_flags_match_occupied_slots_after_create() {
    let mut device = MockGraphicsDevice::new();
    let material = Material::from_desc(&mut device, desc_with_textures(vec![
        Some("diffuse".to_string()),
        None,
        Some("normal".to_string()),
    ])).unwrap();

    let block = stored_block(&device, &material);
    assert_eq!(block.tex_flags, [1, 0, 1, 0, 0, 0, 0, 0]);
}

#[test]
fn test_texture_flags_follow_update() {
    let mut device = MockGraphicsDevice::new();
    let mut material = Material::from_desc(&mut device, desc_with_textures(vec![Some("a".to_string())])).unwrap();

    material.set_texture(0, None);
    material.set_texture(7, Some("last".to_string()));
    material.set_texture(8, Some("ignored".to_string()));
    material.update(&mut device).unwrap();

    let block = stored_block(&device, &material);
    assert_eq!(block.tex_flags, [0, 0, 0, 0, 0, 0, 0, 1]);
    for (slot, name) in material.textures().iter().enumerate() {
        assert_eq!(name.is_some(), block.tex_flags[slot] == 1);
    }
}

#[test]
fn test_extra_textures_beyond_eight_are_dropped() {
    let mut device = MockGraphicsDevice::new();
    let textures = (0..10).map(|i| Some(format!("t{}", i))).collect();
    let material = Material::from_desc(&mut device, desc_with_textures(textures)).unwrap();

    assert_eq!(material.texture(7), Some("t7"));
    assert_eq!(stored_block(&device, &material).tex_flags, [1; 8]);
}

#[test]
fn test_update_frees_stale_buffer() {
    let mut device = MockGraphicsDevice::new();
    let mut material = Material::from_desc(&mut device, MaterialDesc::default()).unwrap();
    let old = material.buffer().unwrap().handle();

    material.trans = 0.25;
    material.update(&mut device).unwrap();

    let state = device.state();
    let state = state.lock().unwrap();
    assert_eq!(state.count(&format!("delete_buffer({})", old.0)), 1);
    assert!(!state.buffers.contains_key(&old.0));
}

// ============================================================================
// Apply tests
// ============================================================================

#[test]
fn test_apply_falls_back_to_default_shader() {
    let root = TempDir::new("mtl_default");
    let mut device = MockGraphicsDevice::new();
    let shaders = shader_manager_with(&mut device, &root, &["default"]);
    let textures = ResourceManager::new("tse::TextureManager");

    let material = Material::from_desc(&mut device, MaterialDesc {
        shader: Some("deleted".to_string()),
        ..MaterialDesc::default()
    }).unwrap();

    let applied = material.apply(&mut device, &shaders, &textures).unwrap();
    assert_eq!(applied.name(), "default");
}

#[test]
fn test_apply_without_any_shader_is_noop() {
    let mut device = MockGraphicsDevice::new();
    let shaders = ResourceManager::new("tse::ShaderManager");
    let textures = ResourceManager::new("tse::TextureManager");
    let material = Material::from_desc(&mut device, MaterialDesc::default()).unwrap();
    device.state().lock().unwrap().clear_commands();

    assert!(material.apply(&mut device, &shaders, &textures).is_none());
    assert!(device.state().lock().unwrap().commands.is_empty());
}

#[test]
fn test_apply_binds_shader_block_and_textures() {
    let root = TempDir::new("mtl_apply");
    let mut device = MockGraphicsDevice::new();
    let shaders = shader_manager_with(&mut device, &root, &["default", "phong"]);
    let mut textures = ResourceManager::new("tse::TextureManager");
    let diffuse = Texture::create(&mut device, "diffuse", 2, 2, 4, None, false).unwrap();
    let diffuse_handle = diffuse.handle();
    textures.add(&mut device, diffuse);

    let material = Material::from_desc(&mut device, MaterialDesc {
        shader: Some("phong".to_string()),
        textures: vec![None, Some("diffuse".to_string()), Some("missing".to_string())],
        ..MaterialDesc::default()
    }).unwrap();
    device.state().lock().unwrap().clear_commands();

    let applied = material.apply(&mut device, &shaders, &textures).unwrap();
    assert_eq!(applied.name(), "phong");

    let state = device.state();
    let state = state.lock().unwrap();
    assert_eq!(state.count("use_program"), 1);
    assert_eq!(state.filtered("bind_storage_buffer"),
        vec![format!("bind_storage_buffer({},3)", material.buffer().unwrap().handle().0)]);
    assert_eq!(state.filtered("bind_texture"), vec![format!("bind_texture(1,{})", diffuse_handle.0)]);
}

#[test]
fn test_set_shader_missing_falls_back_to_default() {
    let root = TempDir::new("mat_set_shader");
    let mut device = MockGraphicsDevice::new();
    let shaders = shader_manager_with(&mut device, &root, &["default", "phong"]);
    let mut material = Material::from_desc(&mut device, desc_with_textures(Vec::new())).unwrap();

    material.set_shader(Some("phong".to_string()));
    assert_eq!(material.resolve_shader(&shaders).unwrap().name(), "phong");

    material.set_shader(Some("gone".to_string()));
    assert_eq!(material.resolve_shader(&shaders).unwrap().name(), "default");
}
