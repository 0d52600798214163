//! Camera module: a perspective camera and pick rays.
//!
//! The camera is owned by the renderer, which uploads its matrices and basis
//! once per frame. Applications steer it through `Render::camera_mut`.

mod camera;
mod ray;

pub use camera::{
    Camera,
    DEFAULT_LOCATION, DEFAULT_PROJ_DIST, DEFAULT_FAR_CLIP, DEFAULT_SIZE, DEFAULT_FRAME_SIZE,
};
pub use ray::Ray;
