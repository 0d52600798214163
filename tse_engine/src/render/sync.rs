/// Per-frame and per-draw storage blocks shared with every shader.
///
/// Layouts mirror the std430 blocks declared in `includes/commondf.glsl`:
/// camera at binding 0, time at 1, primitive at 2 (materials use 3).

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::camera::Camera;
use crate::timer::Timer;

pub const CAMERA_SLOT: u32 = 0;
pub const TIME_SLOT: u32 = 1;
pub const PRIMITIVE_SLOT: u32 = 2;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraSync {
    pub view: Mat4,
    pub proj: Mat4,
    pub vp: Mat4,
    /// xyz: location, w: frame width
    pub loc_frame_w: Vec4,
    /// xyz: direction, w: projection distance
    pub dir_proj_dist: Vec4,
    /// xyz: right, w: projection plane width
    pub right_wp: Vec4,
    /// xyz: up, w: projection plane height
    pub up_hp: Vec4,
    /// xyz: look-at point, w: frame height
    pub at_frame_h: Vec4,
}

impl From<&Camera> for CameraSync {
    fn from(camera: &Camera) -> Self {
        Self {
            view: *camera.view(),
            proj: *camera.proj(),
            vp: *camera.vp(),
            loc_frame_w: camera.loc().extend(camera.frame_w() as f32),
            dir_proj_dist: camera.dir().extend(camera.proj_dist()),
            right_wp: camera.right().extend(camera.wp()),
            up_hp: camera.up().extend(camera.hp()),
            at_frame_h: camera.at().extend(camera.frame_h() as f32),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct TimeSync {
    pub global_time: f32,
    pub global_delta: f32,
    pub time: f32,
    pub delta: f32,
}

impl From<&Timer> for TimeSync {
    fn from(timer: &Timer) -> Self {
        Self {
            global_time: timer.global_time as f32,
            global_delta: timer.global_delta as f32,
            time: timer.time as f32,
            delta: timer.delta as f32,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PrimitiveSync {
    /// Projection * view * world
    pub wvp: Mat4,
    pub w: Mat4,
    /// Inverse transpose of `w`, for normals
    pub w_inv_trans: Mat4,
    pub flags: Vec4,
    pub tex_flags: [i32; 8],
}

impl PrimitiveSync {
    pub fn new(vp: &Mat4, world: Mat4, tex_flags: [i32; 8]) -> Self {
        Self {
            wvp: *vp * world,
            w: world,
            w_inv_trans: world.inverse().transpose(),
            flags: Vec4::ZERO,
            tex_flags,
        }
    }
}

const _: () = assert!(std::mem::size_of::<CameraSync>() == 272);
const _: () = assert!(std::mem::size_of::<TimeSync>() == 16);
const _: () = assert!(std::mem::size_of::<PrimitiveSync>() == 240);
