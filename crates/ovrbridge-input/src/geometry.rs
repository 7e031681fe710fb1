//! Affine transforms built from position/rotation offsets.

use glam::{Mat4, Vec3};
use ovrbridge_common::ControllerAdjustConfig;
use ovrbridge_vr::Hand;

/// Build an affine transform from an origin in metres and XYZ Euler angles in
/// degrees. The translation lands in the last column.
pub fn euler_transform(origin: [f32; 3], rotate_xyz: [f32; 3]) -> Mat4 {
    let rx = rotate_xyz[0].to_radians();
    let ry = rotate_xyz[1].to_radians();
    let rz = rotate_xyz[2].to_radians();

    let (sx, cx) = rx.sin_cos();
    let (sy, cy) = ry.sin_cos();
    let (sz, cz) = rz.sin_cos();

    Mat4::from_cols_array_2d(&[
        [cy * cz, -cy * sz, sy, 0.0],
        [cz * sx * sy + cx * sz, cx * cz - sx * sy * sz, -cy * sx, 0.0],
        [-cx * cz * sy + sx * sz, cz * sx + cx * sy * sz, cx * cy, 0.0],
        [origin[0], origin[1], origin[2], 1.0],
    ])
}

/// Inverse of [`euler_transform`], used for calibration data authored as
/// grip-space-to-model-space.
pub fn inverse_calibration(origin: [f32; 3], rotate_xyz: [f32; 3]) -> Mat4 {
    euler_transform(origin, rotate_xyz).inverse()
}

/// `Rx * Ry * Rz`, angles in degrees.
pub fn rotation_matrix(x_degrees: f32, y_degrees: f32, z_degrees: f32) -> Mat4 {
    Mat4::from_axis_angle(Vec3::X, x_degrees.to_radians())
        * Mat4::from_axis_angle(Vec3::Y, y_degrees.to_radians())
        * Mat4::from_axis_angle(Vec3::Z, z_degrees.to_radians())
}

/// Applies the user's manual grip offsets on top of a family's calibration.
#[derive(Debug, Clone, Default)]
pub struct GeometryAdjust {
    config: ControllerAdjustConfig,
}

impl GeometryAdjust {
    pub fn new(config: ControllerAdjustConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ControllerAdjustConfig {
        &self.config
    }

    /// User offset for `hand`, if any is configured.
    ///
    /// A per-hand position or rotation override wins over the global tilt.
    pub fn offset(&self, hand: Hand) -> Option<Mat4> {
        let cfg = &self.config;
        let (adjust_pos, pos, adjust_rot, rot) = match hand {
            Hand::Left => (
                cfg.adjust_left_position,
                cfg.left_position,
                cfg.adjust_left_rotation,
                cfg.left_rotation,
            ),
            Hand::Right => (
                cfg.adjust_right_position,
                cfg.right_position,
                cfg.adjust_right_rotation,
                cfg.right_rotation,
            ),
        };

        if adjust_pos || adjust_rot {
            let origin = if adjust_pos { pos } else { [0.0; 3] };
            let rotation = if adjust_rot { rot } else { [0.0; 3] };
            Some(euler_transform(origin, rotation))
        } else if cfg.adjust_tilt {
            Some(rotation_matrix(cfg.tilt, 0.0, 0.0))
        } else {
            None
        }
    }

    /// `primary` post-multiplied by the configured offset for `hand`.
    pub fn apply(&self, hand: Hand, primary: Mat4) -> Mat4 {
        match self.offset(hand) {
            Some(offset) => primary * offset,
            None => primary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_zero_offsets_are_identity() {
        assert!(euler_transform([0.0; 3], [0.0; 3]).abs_diff_eq(Mat4::IDENTITY, EPS));
        assert!(rotation_matrix(0.0, 0.0, 0.0).abs_diff_eq(Mat4::IDENTITY, EPS));
    }

    #[test]
    fn test_translation_in_last_column() {
        let m = euler_transform([0.1, -0.2, 0.3], [0.0; 3]);
        assert!(m.w_axis.abs_diff_eq(Vec4::new(0.1, -0.2, 0.3, 1.0), EPS));
        assert!(m.x_axis.abs_diff_eq(Vec4::X, EPS));
    }

    #[test]
    fn test_pure_x_rotation_matches_rotation_matrix() {
        let a = euler_transform([0.0; 3], [30.0, 0.0, 0.0]);
        let b = rotation_matrix(30.0, 0.0, 0.0);
        // The authored form is the transpose of the right-handed rotation.
        assert!(a.abs_diff_eq(b.transpose(), EPS));
    }

    #[test]
    fn test_inverse_calibration_undoes_transform() {
        let origin = [0.0, 0.003, 0.097];
        let rot = [5.037, 0.0, 0.0];
        let m = euler_transform(origin, rot) * inverse_calibration(origin, rot);
        assert!(m.abs_diff_eq(Mat4::IDENTITY, EPS));
    }

    #[test]
    fn test_no_adjustment_configured() {
        let adjust = GeometryAdjust::default();
        assert!(adjust.offset(Hand::Left).is_none());
        let primary = euler_transform([0.0, 0.01, 0.1], [10.0, 0.0, 0.0]);
        assert_eq!(adjust.apply(Hand::Right, primary), primary);
    }

    #[test]
    fn test_hand_override_beats_tilt() {
        let adjust = GeometryAdjust::new(ControllerAdjustConfig {
            adjust_left_position: true,
            left_position: [0.0, 0.0, 0.05],
            adjust_tilt: true,
            tilt: 45.0,
            ..Default::default()
        });
        let left = adjust.offset(Hand::Left).unwrap();
        assert!(left.abs_diff_eq(Mat4::from_translation(Vec3::new(0.0, 0.0, 0.05)), EPS));

        // Right hand has no override, so the tilt applies.
        let right = adjust.offset(Hand::Right).unwrap();
        assert!(right.abs_diff_eq(rotation_matrix(45.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn test_rotation_only_override_ignores_position_values() {
        let adjust = GeometryAdjust::new(ControllerAdjustConfig {
            adjust_right_rotation: true,
            right_rotation: [0.0, 90.0, 0.0],
            right_position: [1.0, 1.0, 1.0],
            ..Default::default()
        });
        let m = adjust.offset(Hand::Right).unwrap();
        assert!(m.w_axis.abs_diff_eq(Vec4::W, EPS));
    }
}
