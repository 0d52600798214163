use super::*;
use std::sync::{Arc, Mutex};
use glam::Vec4;
use crate::graphics_device::mock_graphics_device::{MockGraphicsDevice, MockState};
use crate::resource::vertex::VertexPos;
use crate::resource::Topology;
use crate::test_utils::TempDir;

// ============================================================================
// Helpers
// ============================================================================

const VERT: &str = "in vec3 InPosition;\nvoid main() {}\n";
const FRAG: &str = "void main() {}\n";

fn config(dir: &TempDir) -> RenderConfig {
    dir.write("default/vert.glsl", VERT);
    dir.write("default/frag.glsl", FRAG);
    RenderConfig {
        shader_root: dir.path().to_path_buf(),
        hot_reload: false,
        width: 800,
        height: 600,
        ..Default::default()
    }
}

fn ready_render(dir: &TempDir) -> (Render, Arc<Mutex<MockState>>) {
    let device = MockGraphicsDevice::new();
    let state = device.state();
    let mut render = Render::new(Box::new(device), config(dir));
    render.init().unwrap();
    state.lock().unwrap().clear_commands();
    (render, state)
}

fn triangle(render: &mut Render, material: Option<String>) -> u32 {
    let vertices = [
        VertexPos { position: Vec3::ZERO },
        VertexPos { position: Vec3::X },
        VertexPos { position: Vec3::Y },
    ];
    render.resources_mut().primitive_create(material, Topology::TriMesh, &vertices, &[0, 1, 2]).unwrap()
}

fn stored<T: bytemuck::Pod>(state: &Arc<Mutex<MockState>>, render: &Render, key: u32) -> T {
    let handle = render.resources().buffers.find(&key).unwrap().handle();
    bytemuck::pod_read_unaligned(&state.lock().unwrap().buffers[&handle.0][..std::mem::size_of::<T>()])
}

/// Draw commands in order, as "vao" ids, plus cull changes
fn draw_sequence(state: &Arc<Mutex<MockState>>) -> Vec<String> {
    state
        .lock()
        .unwrap()
        .commands
        .iter()
        .filter(|c| c.starts_with("draw_") || c.starts_with("cull("))
        .cloned()
        .collect()
}

// ============================================================================
// Init / close
// ============================================================================

#[test]
fn test_init_creates_shared_blocks_and_defaults() {
    let dir = TempDir::new("rnd_init");
    let device = MockGraphicsDevice::new();
    let state = device.state();
    let mut render = Render::new(Box::new(device), config(&dir));
    assert!(!render.is_ready());

    render.init().unwrap();

    assert!(render.is_ready());
    let res = render.resources();
    assert!(res.shaders.find(&"default".to_string()).unwrap().is_valid());
    assert_eq!(res.materials.find(&DEFAULT_NAME.to_string()).unwrap().shader(), Some("default"));

    let sync = render.sync.as_ref().unwrap();
    assert_eq!(res.buffers.find(&sync.camera).unwrap().slot(), CAMERA_SLOT);
    assert_eq!(res.buffers.find(&sync.time).unwrap().size(), 16);
    assert_eq!(res.buffers.find(&sync.primitive).unwrap().slot(), PRIMITIVE_SLOT);

    let state = state.lock().unwrap();
    assert_eq!(state.commands[0], "init_state");
    assert_eq!(state.commands[1], "set_clear_color([0.3, 0.47, 0.8, 1.0],1)");
    assert_eq!(state.commands[2], "set_viewport(0,0,800,600)");
}

#[test]
fn test_close_and_drop_release_resources() {
    let dir = TempDir::new("rnd_close");
    let (mut render, state) = ready_render(&dir);
    triangle(&mut render, None);

    render.close();
    assert!(!render.is_ready());
    assert_eq!(render.resources().total_count(), 0);
    assert!(state.lock().unwrap().buffers.is_empty());

    let (render, state) = ready_render(&dir);
    drop(render);
    assert!(state.lock().unwrap().buffers.is_empty());
}

#[test]
fn test_calls_before_init_do_nothing() {
    let dir = TempDir::new("rnd_early");
    let device = MockGraphicsDevice::new();
    let state = device.state();
    let mut render = Render::new(Box::new(device), config(&dir));

    render.frame_start(&TimeSync::default());
    render.draw_primitive(1, &Mat4::IDENTITY);
    render.draw_text(1, "hi", Vec3::ZERO, 1.0);
    render.frame_end().unwrap();

    assert!(state.lock().unwrap().commands.is_empty());
}

// ============================================================================
// Frame
// ============================================================================

#[test]
fn test_frame_uploads_camera_and_time() {
    let dir = TempDir::new("rnd_frame");
    let (mut render, state) = ready_render(&dir);
    render.camera_mut().set_loc_at_up(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
    let time = TimeSync { global_time: 4.0, global_delta: 0.5, time: 3.0, delta: 0.25 };

    render.frame_start(&time);
    render.frame_end().unwrap();

    let (camera_key, time_key) = {
        let sync = render.sync.as_ref().unwrap();
        (sync.camera, sync.time)
    };
    let camera: CameraSync = stored(&state, &render, camera_key);
    assert_eq!(camera, CameraSync::from(render.camera()));
    assert_eq!(camera.loc_frame_w, Vec4::new(1.0, 2.0, 3.0, 800.0));
    assert_eq!(stored::<TimeSync>(&state, &render, time_key), time);

    let state = state.lock().unwrap();
    assert_eq!(state.commands[0], "clear(ClearFlags(COLOR | DEPTH))");
    assert_eq!(state.commands[state.commands.len() - 2..], ["finish".to_string(), "present".to_string()]);
}

#[test]
fn test_frame_start_reloads_changed_shaders() {
    let dir = TempDir::new("rnd_reload");
    let (mut render, state) = ready_render(&dir);

    render
        .resources()
        .shaders
        .find(&"default".to_string())
        .unwrap()
        .watcher()
        .mark_changed();
    render.frame_start(&TimeSync::default());

    assert_eq!(state.lock().unwrap().count("link_program"), 1);
    assert_eq!(render.resources().shaders.find(&"default".to_string()).unwrap().generation(), 2);
}

#[test]
fn test_resize_updates_camera_and_viewport() {
    let dir = TempDir::new("rnd_resize");
    let (mut render, state) = ready_render(&dir);

    render.resize(1024, 256);

    assert_eq!((render.camera().frame_w(), render.camera().frame_h()), (1024, 256));
    assert_eq!(state.lock().unwrap().filtered("set_viewport"), vec!["set_viewport(0,0,1024,256)"]);
}

// ============================================================================
// Draw
// ============================================================================

#[test]
fn test_draw_primitive_uploads_transforms() {
    let dir = TempDir::new("rnd_draw");
    let (mut render, state) = ready_render(&dir);
    let id = triangle(&mut render, None);
    let local = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));
    render.resources_mut().primitives.find_mut(&id).unwrap().transform = local;
    let world = Mat4::from_scale(Vec3::splat(2.0));

    render.draw_primitive(id, &world);

    let primitive_key = render.sync.as_ref().unwrap().primitive;
    let block: PrimitiveSync = stored(&state, &render, primitive_key);
    assert_eq!(block.w, world * local);
    assert_eq!(block.wvp, *render.camera().vp() * (world * local));
    assert_eq!(block.w_inv_trans, (world * local).inverse().transpose());
    assert_eq!(state.lock().unwrap().count("draw_elements"), 1);
}

#[test]
fn test_model_passes_order_translucent_twice() {
    let dir = TempDir::new("rnd_model");
    let (mut render, state) = ready_render(&dir);
    render
        .resources_mut()
        .material_create(MaterialDesc { name: "glass".to_string(), trans: 0.5, ..Default::default() })
        .unwrap();

    let dir_model = TempDir::new("rnd_model_file");
    let mut data = b"G3DM".to_vec();
    for n in [2i32, 0, 0] {
        data.extend_from_slice(&n.to_le_bytes());
    }
    for _ in 0..2 {
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&(-1i32).to_le_bytes());
        data.extend_from_slice(&[0u8; 48]);
    }
    let path = dir_model.write_bytes("pair.g3dm", &data);
    let model = Model::from_file(render.resources_mut(), &path, Mat4::IDENTITY, Vec3::ZERO);
    let (opaque, glass) = (model.primitives()[0], model.primitives()[1]);
    render.resources_mut().primitives.find_mut(&glass).unwrap().set_material(Some("glass".to_string()));
    let vao = |id: u32| render.resources().primitives.find(&id).unwrap().vertex_array().0;
    let (opaque_vao, glass_vao) = (vao(opaque), vao(glass));
    state.lock().unwrap().clear_commands();

    render.draw_model(&model, &Mat4::IDENTITY);

    assert_eq!(
        draw_sequence(&state),
        vec![
            format!("draw_arrays({},Triangles,1)", opaque_vao),
            "cull(Front)".to_string(),
            format!("draw_arrays({},Triangles,1)", glass_vao),
            "cull(Back)".to_string(),
            format!("draw_arrays({},Triangles,1)", glass_vao),
            "cull(Disabled)".to_string(),
        ]
    );
}

#[test]
fn test_model_passes_restore_cull_mode() {
    let dir = TempDir::new("rnd_model_cull");
    let (mut render, state) = ready_render(&dir);
    let prim = triangle(&mut render, None);

    render.set_cull_mode(CullMode::Back);
    state.lock().unwrap().clear_commands();
    render.draw_model(&Model::default(), &Mat4::IDENTITY);
    render.draw_primitive(prim, &Mat4::IDENTITY);

    let sequence = draw_sequence(&state);
    assert_eq!(&sequence[..3], &["cull(Front)", "cull(Back)", "cull(Back)"]);
    assert!(sequence[3].starts_with("draw_elements"));
    assert_eq!(render.cull_mode(), CullMode::Back);
}

#[test]
fn test_draw_text_skips_newlines() {
    let dir = TempDir::new("rnd_text");
    dir.write("font/vert.glsl", VERT);
    dir.write("font/frag.glsl", FRAG);
    let (mut render, state) = ready_render(&dir);

    let mut data = b"G3DF".to_vec();
    data.extend_from_slice(&16u32.to_le_bytes());
    data.extend_from_slice(&12u32.to_le_bytes());
    data.extend(std::iter::repeat(0u8).take(256 * 4 + 256 * 4 * 48));
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&[255u8; 4]);
    let path = dir.write_bytes("tiny.g3df", &data);
    let font = render.load_font(&path).unwrap();
    state.lock().unwrap().clear_commands();

    render.draw_text(font, "ab\nc", Vec3::ZERO, 1.0);
    assert_eq!(state.lock().unwrap().count("draw_arrays"), 3);

    assert!(render.delete_font(font));
    assert!(render.resources().fonts.is_empty());
}

#[test]
fn test_screen_space_overrides_projection() {
    let dir = TempDir::new("rnd_screen");
    let (mut render, state) = ready_render(&dir);
    let id = triangle(&mut render, None);
    let primitive_key = render.sync.as_ref().unwrap().primitive;

    render.with_screen_space(|r| r.draw_primitive(id, &Mat4::IDENTITY));
    let block: PrimitiveSync = stored(&state, &render, primitive_key);
    assert_eq!(block.wvp, Mat4::orthographic_rh_gl(0.0, 800.0, -600.0, 0.0, -1.0, 1.0));

    render.draw_primitive(id, &Mat4::IDENTITY);
    let block: PrimitiveSync = stored(&state, &render, primitive_key);
    assert_eq!(block.wvp, *render.camera().vp());
}
