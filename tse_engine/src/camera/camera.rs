/// Perspective camera.
///
/// Keeps location, look-at point and an orthonormal basis together with the
/// projection parameters, and recomputes view, projection and their product
/// whenever any of them changes. The projection plane is `size` wide along
/// the shorter frame side and widened along the longer one, so pixels stay
/// square.

use glam::{Mat4, Vec3};

use super::ray::Ray;

pub const DEFAULT_LOCATION: Vec3 = Vec3::new(0.0, 0.0, 5.0);
pub const DEFAULT_PROJ_DIST: f32 = 0.1;
pub const DEFAULT_FAR_CLIP: f32 = 1847.0;
pub const DEFAULT_SIZE: f32 = 0.1;
pub const DEFAULT_FRAME_SIZE: u32 = 30;

/// Right-handed perspective frustum, clip depth -1..1
fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    Mat4::from_cols_array(&[
        2.0 * near / (right - left), 0.0, 0.0, 0.0,
        0.0, 2.0 * near / (top - bottom), 0.0, 0.0,
        (right + left) / (right - left), (top + bottom) / (top - bottom), -(far + near) / (far - near), -1.0,
        0.0, 0.0, -2.0 * near * far / (far - near), 0.0,
    ])
}

#[derive(Debug, Clone)]
pub struct Camera {
    loc: Vec3,
    at: Vec3,
    dir: Vec3,
    up: Vec3,
    right: Vec3,
    proj_dist: f32,
    far_clip: f32,
    size: f32,
    /// Projection plane extent, world units
    wp: f32,
    hp: f32,
    frame_w: u32,
    frame_h: u32,
    view: Mat4,
    proj: Mat4,
    vp: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            loc: DEFAULT_LOCATION,
            at: Vec3::ZERO,
            dir: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            proj_dist: DEFAULT_PROJ_DIST,
            far_clip: DEFAULT_FAR_CLIP,
            size: DEFAULT_SIZE,
            wp: 0.0,
            hp: 0.0,
            frame_w: DEFAULT_FRAME_SIZE,
            frame_h: DEFAULT_FRAME_SIZE,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
            vp: Mat4::IDENTITY,
        };
        camera.update_proj();
        camera
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the camera and rebuild an orthonormal basis from `up`
    ///
    /// `up` only needs to be roughly perpendicular to the view direction; the
    /// stored up vector is recomputed from direction and right.
    pub fn set_loc_at_up(&mut self, loc: Vec3, at: Vec3, up: Vec3) -> &mut Self {
        self.loc = loc;
        self.at = at;
        self.dir = (at - loc).normalize_or_zero();
        self.right = self.dir.cross(up).normalize_or_zero();
        self.up = self.right.cross(self.dir);
        self.update_proj();
        self
    }

    pub fn set_proj(&mut self, size: f32, proj_dist: f32, far_clip: f32) -> &mut Self {
        self.size = size;
        self.proj_dist = proj_dist;
        self.far_clip = far_clip;
        self.update_proj();
        self
    }

    /// Adopt a new frame size in pixels; zero sides are clamped to 1
    pub fn resize(&mut self, width: u32, height: u32) -> &mut Self {
        self.frame_w = width.max(1);
        self.frame_h = height.max(1);
        self.update_proj();
        self
    }

    /// Ray from the eye through pixel (x, y), y growing downwards
    pub fn frame_ray(&self, x: f32, y: f32) -> Ray {
        let (w, h) = (self.frame_w as f32, self.frame_h as f32);
        let q = self.dir * self.proj_dist
            + self.right * ((x - w / 2.0) * self.wp / w)
            + self.up * ((-y + h / 2.0) * self.hp / h);
        Ray::new(self.loc + q, q)
    }

    fn update_proj(&mut self) {
        let mut rx = self.size / 2.0;
        let mut ry = self.size / 2.0;
        if self.frame_w >= self.frame_h {
            rx *= self.frame_w as f32 / self.frame_h as f32;
        } else {
            ry *= self.frame_h as f32 / self.frame_w as f32;
        }
        self.wp = rx * 2.0;
        self.hp = ry * 2.0;
        self.proj = frustum(-rx, rx, -ry, ry, self.proj_dist, self.far_clip);
        self.view = Mat4::look_at_rh(self.loc, self.at, self.up);
        self.vp = self.proj * self.view;
    }

    // ===== GETTERS =====

    pub fn loc(&self) -> Vec3 {
        self.loc
    }

    pub fn at(&self) -> Vec3 {
        self.at
    }

    pub fn dir(&self) -> Vec3 {
        self.dir
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn proj_dist(&self) -> f32 {
        self.proj_dist
    }

    pub fn far_clip(&self) -> f32 {
        self.far_clip
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Projection plane width
    pub fn wp(&self) -> f32 {
        self.wp
    }

    /// Projection plane height
    pub fn hp(&self) -> f32 {
        self.hp
    }

    pub fn frame_w(&self) -> u32 {
        self.frame_w
    }

    pub fn frame_h(&self) -> u32 {
        self.frame_h
    }

    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    pub fn proj(&self) -> &Mat4 {
        &self.proj
    }

    /// Projection * view
    pub fn vp(&self) -> &Mat4 {
        &self.vp
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
