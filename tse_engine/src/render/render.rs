/// Frame orchestrator.
///
/// Owns the resource context and the camera. A frame is
/// `frame_start` → any number of draws → `frame_end`; the per-frame camera
/// and time blocks are uploaded in `frame_start`, the per-draw primitive
/// block right before each draw call.

use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::error::Result;
use crate::graphics_device::{ClearFlags, CullMode, GraphicsDevice};
use crate::resource::material::DEFAULT_NAME;
use crate::resource::{Font, MaterialDesc, Model, Resources};
use crate::{engine_debug, engine_info, engine_warn};
use super::config::RenderConfig;
use super::sync::{CameraSync, PrimitiveSync, TimeSync, CAMERA_SLOT, PRIMITIVE_SLOT, TIME_SLOT};

/// Keys of the shared storage blocks, created by `init`
struct SyncBuffers {
    camera: u32,
    time: u32,
    primitive: u32,
}

pub struct Render {
    resources: Resources,
    camera: Camera,
    config: RenderConfig,
    sync: Option<SyncBuffers>,
    /// Replaces the camera's view-projection for draws (screen-space text)
    vp_override: Option<Mat4>,
    /// Culling state restored after the translucent model passes
    cull_mode: CullMode,
}

impl Render {
    /// Wrap a device; nothing is created on it until `init`
    pub fn new(device: Box<dyn GraphicsDevice>, config: RenderConfig) -> Self {
        let mut camera = Camera::new();
        camera.resize(config.width, config.height);
        Self {
            resources: Resources::new(device, config.shader_root.clone(), config.hot_reload),
            camera,
            config,
            sync: None,
            vp_override: None,
            cull_mode: CullMode::Disabled,
        }
    }

    /// Set up GPU state, the shared blocks, the default shader and material
    pub fn init(&mut self) -> Result<()> {
        let device = self.resources.device();
        device.init_state()?;
        device.set_clear_color(self.config.clear_color, self.config.clear_depth);
        device.set_viewport(0, 0, self.camera.frame_w(), self.camera.frame_h());

        let camera = self.resources.buffer_create(CAMERA_SLOT, std::mem::size_of::<CameraSync>(), None)?;
        let time = self.resources.buffer_create(TIME_SLOT, std::mem::size_of::<TimeSync>(), None)?;
        let primitive = self.resources.buffer_create(PRIMITIVE_SLOT, std::mem::size_of::<PrimitiveSync>(), None)?;

        let default_shader = self.config.default_shader.clone();
        self.resources.shader_create(&default_shader);
        self.resources.material_create(MaterialDesc {
            name: DEFAULT_NAME.to_string(),
            shader: Some(default_shader),
            ..Default::default()
        })?;

        self.sync = Some(SyncBuffers { camera, time, primitive });
        engine_info!("tse::Render", "Render system initialized");
        Ok(())
    }

    /// Release every resource while the device is still alive
    pub fn close(&mut self) {
        let was_ready = self.sync.take().is_some();
        self.resources.clear();
        if was_ready {
            engine_info!("tse::Render", "Render system closed");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.sync.is_some()
    }

    fn ready_or_warn(&self, what: &str) -> bool {
        if self.sync.is_none() {
            engine_warn!("tse::Render", "{} ignored: render not initialized", what);
            return false;
        }
        true
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
        let (w, h) = (self.camera.frame_w(), self.camera.frame_h());
        self.resources.device().set_viewport(0, 0, w, h);
        engine_debug!("tse::Render", "Resized to {}x{}", w, h);
    }

    /// Clear, reload changed shaders, upload camera and time blocks
    pub fn frame_start(&mut self, time: &TimeSync) {
        if !self.ready_or_warn("frame_start") {
            return;
        }
        self.resources.device().clear(ClearFlags::COLOR | ClearFlags::DEPTH);
        self.resources.shader_update_all();

        let Some(sync) = &self.sync else { return };
        let (camera_id, time_id) = (sync.camera, sync.time);
        let camera = CameraSync::from(&self.camera);
        self.resources.buffer_update(camera_id, bytemuck::bytes_of(&camera), 0, -1);
        self.resources.buffer_apply(camera_id);
        self.resources.buffer_update(time_id, bytemuck::bytes_of(time), 0, -1);
        self.resources.buffer_apply(time_id);
    }

    /// Wait for the GPU and present
    pub fn frame_end(&mut self) -> Result<()> {
        if !self.ready_or_warn("frame_end") {
            return Ok(());
        }
        let device = self.resources.device();
        device.finish();
        device.present()
    }

    /// Draw a primitive with `world` applied after its local transform
    ///
    /// Unknown keys are ignored. The primitive's material (or "default")
    /// selects the shader; nothing is drawn when no shader resolves.
    pub fn draw_primitive(&mut self, id: u32, world: &Mat4) {
        if !self.ready_or_warn("draw_primitive") {
            return;
        }
        let Some(primitive) = self.resources.primitives.find(&id) else {
            return;
        };
        let tex_flags = self
            .resources
            .material_for(primitive)
            .map(|m| m.sync_block().tex_flags)
            .unwrap_or_default();
        let vp = self.vp_override.as_ref().unwrap_or(self.camera.vp());
        let block = PrimitiveSync::new(vp, *world * primitive.transform, tex_flags);

        if !self.resources.bind_primitive(id) {
            return;
        }
        if let Some(sync) = &self.sync {
            let primitive_id = sync.primitive;
            self.resources.buffer_update(primitive_id, bytemuck::bytes_of(&block), 0, -1);
            self.resources.buffer_apply(primitive_id);
        }
        self.resources.draw_bound_primitive(id);
    }

    /// Draw a model: opaque primitives first, then translucent ones twice
    /// (back faces, then front faces)
    ///
    /// Opaque primitives use the current cull mode, which is restored at the end.
    pub fn draw_model(&mut self, model: &Model, world: &Mat4) {
        if !self.ready_or_warn("draw_model") {
            return;
        }
        let (opaque, translucent): (Vec<u32>, Vec<u32>) = model
            .primitives()
            .iter()
            .partition(|&&id| self.resources.primitive_is_opaque(id));

        for &id in &opaque {
            self.draw_primitive(id, world);
        }
        self.resources.device().set_cull_mode(CullMode::Front);
        for &id in &translucent {
            self.draw_primitive(id, world);
        }
        self.resources.device().set_cull_mode(CullMode::Back);
        for &id in &translucent {
            self.draw_primitive(id, world);
        }
        self.resources.device().set_cull_mode(self.cull_mode);
    }

    /// Face culling for subsequent draws
    pub fn set_cull_mode(&mut self, mode: CullMode) {
        self.cull_mode = mode;
        self.resources.device().set_cull_mode(mode);
    }

    pub fn cull_mode(&self) -> CullMode {
        self.cull_mode
    }

    /// Draw text with a loaded font; see `Font::layout` for placement
    pub fn draw_text(&mut self, font: u32, text: &str, pos: Vec3, size: f32) {
        if !self.ready_or_warn("draw_text") {
            return;
        }
        let Some(font) = self.resources.fonts.find(&font) else {
            return;
        };
        let draws: Vec<(u32, Mat4)> = font
            .layout(text, pos, size)
            .into_iter()
            .filter_map(|g| font.glyph(g.code).map(|id| (id, g.transform)))
            .collect();
        for (id, transform) in draws {
            self.draw_primitive(id, &transform);
        }
    }

    /// Run `draw` with a pixel-space orthographic projection
    ///
    /// X grows right from the left edge, Y grows up from the top edge (so
    /// visible rows have negative Y).
    pub fn with_screen_space(&mut self, draw: impl FnOnce(&mut Render)) {
        let (w, h) = (self.camera.frame_w() as f32, self.camera.frame_h() as f32);
        let saved = self.vp_override.replace(Mat4::orthographic_rh_gl(0.0, w, -h, 0.0, -1.0, 1.0));
        draw(self);
        self.vp_override = saved;
    }

    /// Load a font into the font manager
    pub fn load_font(&mut self, path: &std::path::Path) -> Result<u32> {
        Font::load(&mut self.resources, path)
    }

    /// Delete a font and its glyph primitives
    pub fn delete_font(&mut self, font: u32) -> bool {
        self.resources.font_delete(font)
    }

    // ===== ACCESSORS =====

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }
}

impl Drop for Render {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
