/// Sample units: world axes and an orbit camera controller

use std::path::Path;

use glam::{Mat4, Vec2, Vec3, Vec4};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::error::Result;
use crate::render::Render;
use crate::resource::{MaterialDesc, Topology, VertexStd};
use crate::engine_warn;
use super::unit::{FrameContext, Unit, UnitRegistry};

/// Register the sample units as "axis" and "control"
pub fn register_builtin(registry: &mut UnitRegistry) {
    registry
        .register("axis", |render| Ok(Box::new(AxisUnit::new(render)?) as Box<dyn Unit>))
        .register("control", |render| {
            Ok(Box::new(ControlUnit::new(render, Some(Path::new(DEFAULT_FONT)))) as Box<dyn Unit>)
        });
}

// ===== AXIS =====

/// Three colored lines from the origin to the far plane; Shift+A toggles
pub struct AxisUnit {
    primitive: u32,
    visible: bool,
}

impl AxisUnit {
    pub const MATERIAL: &'static str = "axis";

    pub fn new(render: &mut Render) -> Result<Self> {
        let far = render.camera().far_clip();
        let line = |end: Vec3, color: Vec4| {
            [
                VertexStd::new(end, Vec2::ZERO, Vec3::Y, color),
                VertexStd::new(Vec3::ZERO, Vec2::ZERO, Vec3::Y, color),
            ]
        };
        let vertices: Vec<VertexStd> = [
            line(Vec3::X * far, Vec4::new(1.0, 0.0, 0.0, 1.0)),
            line(Vec3::Y * far, Vec4::new(0.0, 1.0, 0.0, 1.0)),
            line(Vec3::Z * far, Vec4::new(0.0, 0.0, 1.0, 1.0)),
        ]
        .concat();

        let res = render.resources_mut();
        let material = res.material_create(MaterialDesc {
            name: Self::MATERIAL.to_string(),
            ka: Vec3::ZERO,
            kd: Vec3::ONE,
            ks: Vec3::ZERO,
            ph: 0.0,
            trans: 1.0,
            shader: Some(Self::MATERIAL.to_string()),
            textures: Vec::new(),
        })?;
        let primitive = res.primitive_create(Some(material), Topology::Lines, &vertices, &[])?;
        Ok(Self { primitive, visible: false })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Unit for AxisUnit {
    fn response(&mut self, ctx: &mut FrameContext) {
        if ctx.input.shift() && ctx.input.is_clicked(KeyCode::KeyA) {
            self.visible = !self.visible;
        }
    }

    fn render(&mut self, ctx: &mut FrameContext) {
        if self.visible {
            ctx.render.draw_primitive(self.primitive, &Mat4::IDENTITY);
        }
    }

    fn close(&mut self, render: &mut Render) {
        render.resources_mut().primitive_delete(self.primitive);
    }
}

// ===== CONTROL =====

pub const DEFAULT_FONT: &str = "bin/fonts/Book.g3df";

const HOME: Vec3 = Vec3::new(8.0, 8.0, 8.0);
/// Orbit speed for arrow keys, degrees per second
const KEY_ORBIT_SPEED: f32 = 94.0;
const MIN_ELEVATION: f32 = 0.08;
const MAX_ELEVATION: f32 = 178.9;
const MIN_DISTANCE: f32 = 0.1;

/// Orbit camera around its look-at point while Ctrl is held
///
/// - left drag / arrows: orbit
/// - wheel / PageUp / PageDown: zoom
/// - right drag: pan
/// - Shift+P pause, Ctrl+F reset, Escape exit
pub struct ControlUnit {
    font: Option<u32>,
}

impl ControlUnit {
    /// `font` is optional; without it no FPS line is drawn
    pub fn new(render: &mut Render, font: Option<&Path>) -> Self {
        render.camera_mut().set_loc_at_up(HOME, Vec3::ZERO, Vec3::Y);
        let font = font.and_then(|path| match render.load_font(path) {
            Ok(id) => Some(id),
            Err(e) => {
                engine_warn!("tse::ControlUnit", "No FPS overlay, font '{}' not loaded: {}", path.display(), e);
                None
            }
        });
        Self { font }
    }

    pub fn font(&self) -> Option<u32> {
        self.font
    }

    fn orbit(ctx: &mut FrameContext) {
        let input = ctx.input;
        let dt = ctx.timer.global_delta as f32;
        let camera = ctx.render.camera_mut();
        let (loc, mut at) = (camera.loc(), camera.at());

        let offset = loc - at;
        let mut distance = offset.length();
        if distance <= f32::EPSILON {
            return;
        }
        let cos_t = offset.y / distance;
        let sin_t = (1.0 - cos_t * cos_t).max(0.0).sqrt();
        let plane = distance * sin_t;
        let (sin_p, cos_p) = if plane > f32::EPSILON { (offset.x / plane, offset.z / plane) } else { (0.0, 1.0) };
        let mut azimuth = sin_p.atan2(cos_p).to_degrees();
        let mut elevation = sin_t.atan2(cos_t).to_degrees();

        let axis = |plus: KeyCode, minus: KeyCode| input.is_down(plus) as i32 as f32 - input.is_down(minus) as i32 as f32;
        let (mdx, mdy) = input.mouse_delta();
        let dragging = input.is_button_down(MouseButton::Left) as i32 as f32;
        azimuth += -dragging * mdx as f32 + KEY_ORBIT_SPEED * dt * axis(KeyCode::ArrowLeft, KeyCode::ArrowRight);
        elevation += -dragging * mdy as f32 + KEY_ORBIT_SPEED * dt * axis(KeyCode::ArrowUp, KeyCode::ArrowDown);
        elevation = elevation.clamp(MIN_ELEVATION, MAX_ELEVATION);

        let zoom = -0.08 * input.wheel() as f32 + axis(KeyCode::PageDown, KeyCode::PageUp);
        distance *= 1.0 + (distance * 18.0).ln() * dt * zoom;
        distance = distance.max(MIN_DISTANCE);

        if input.is_button_down(MouseButton::Right) {
            let (w, h) = (camera.frame_w() as f32, camera.frame_h() as f32);
            let sx = -(mdx as f32) * camera.wp() / w * distance / camera.proj_dist() / 4.7;
            let sy = mdy as f32 * camera.hp() / h * distance / camera.proj_dist() / 1.8;
            at += camera.right() * sx + camera.up() * sy;
        }

        let orbit = Mat4::from_translation(at)
            * Mat4::from_rotation_y(azimuth.to_radians())
            * Mat4::from_rotation_x(elevation.to_radians());
        let new_loc = orbit.transform_point3(Vec3::new(0.0, distance, 0.0));
        camera.set_loc_at_up(new_loc, at, Vec3::Y);
    }
}

impl Unit for ControlUnit {
    fn response(&mut self, ctx: &mut FrameContext) {
        let input = ctx.input;
        if input.shift() && input.is_clicked(KeyCode::KeyP) {
            ctx.timer.toggle_pause();
        } else if input.is_clicked(KeyCode::Escape) {
            ctx.request_exit();
        } else if input.control() && input.is_clicked(KeyCode::KeyF) {
            ctx.render.camera_mut().set_loc_at_up(HOME, Vec3::ZERO, Vec3::Y);
        } else if input.control() {
            Self::orbit(ctx);
        }
    }

    fn render(&mut self, ctx: &mut FrameContext) {
        let Some(font) = self.font else { return };
        let text = format!("FPS: {:.6}", ctx.timer.fps);
        ctx.render.with_screen_space(|render| render.draw_text(font, &text, Vec3::new(0.0, 3.0, 0.0), 64.0));
    }

    fn close(&mut self, render: &mut Render) {
        if let Some(font) = self.font.take() {
            render.delete_font(font);
        }
    }
}

#[cfg(test)]
#[path = "units_tests.rs"]
mod tests;
