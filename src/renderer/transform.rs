use std::f32::consts::FRAC_PI_4;

use glam::{Mat4, Vec3};

pub const FOV_Y: f32 = FRAC_PI_4;
pub const ASPECT: f32 = 1.0;
pub const Z_NEAR: f32 = 8.0;
pub const Z_FAR: f32 = 12.0;

pub const CAMERA_AXIS: Vec3 = Vec3::new(0.707, 0.707, 0.0);
pub const CAMERA_ANGLE: f32 = 0.7;
pub const CAMERA_DISTANCE: f32 = 10.0;

pub const WIRE_COLOR: [f32; 4] = [0.5, 0.0, 1.0, 1.0];

pub fn projection() -> Mat4 {
    Mat4::perspective_rh(FOV_Y, ASPECT, Z_NEAR, Z_FAR)
}

pub fn rotate_to_zero() -> Mat4 {
    Mat4::from_axis_angle(CAMERA_AXIS.normalize(), CAMERA_ANGLE)
}

pub fn translate_to_zero() -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -CAMERA_DISTANCE))
}

/// `projection · translate_to_zero · rotate_to_zero · view`; `view` applies first.
pub fn model_view_projection(view: Mat4) -> Mat4 {
    projection() * translate_to_zero() * rotate_to_zero() * view
}
