//! Conversions between runtime poses and legacy matrices.

use glam::{Mat4, Quat, Vec3};
use ovrbridge_vr::{HmdMatrix34, Pose};

pub fn pose_to_mat4(pose: &Pose) -> Mat4 {
    Mat4::from_rotation_translation(
        Quat::from_array(pose.orientation),
        Vec3::from_array(pose.position),
    )
}

/// Drop the bottom row, giving the row-major 3x4 legacy layout.
pub fn mat4_to_hmd34(m: Mat4) -> HmdMatrix34 {
    let mut out = [[0.0; 4]; 3];
    for (r, row) in out.iter_mut().enumerate() {
        *row = m.row(r).to_array();
    }
    out
}

pub fn hmd34_to_mat4(m: &HmdMatrix34) -> Mat4 {
    Mat4::from_cols_array_2d(&[
        [m[0][0], m[1][0], m[2][0], 0.0],
        [m[0][1], m[1][1], m[2][1], 0.0],
        [m[0][2], m[1][2], m[2][2], 0.0],
        [m[0][3], m[1][3], m[2][3], 1.0],
    ])
}
