//! Velocity-adaptive one-pole smoothing for controller poses.
//!
//! Each tracked device gets an independent position filter (one per axis)
//! and rotation filter (one per quaternion component). The cutoff frequency
//! rises with the measured velocity so fast motion lags less than slow drift.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::time::{Duration, Instant};

use glam::{Mat4, Quat, Vec3};
use ovrbridge_common::SmoothingConfig;
use ovrbridge_vr::PoseVelocity;
use tracing::trace;

/// Frame intervals at or below this are treated as timer noise and the
/// previous sampling rate is reused.
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(3);

const DEFAULT_RATE_HZ: f64 = 90.0;

/// `1 / (1 + tau / te)` with `tau = 1 / (2π·cutoff)` and `te = 1 / rate`.
pub fn alpha(cutoff: f64, rate: f64) -> f64 {
    let tau = 1.0 / (2.0 * PI * cutoff);
    let te = 1.0 / rate;
    1.0 / (1.0 + tau / te)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub min_cutoff: f64,
    pub beta: f64,
    /// Derivative cutoff. The velocity comes from the runtime rather than
    /// being differentiated here, so this is carried but not applied.
    pub d_cutoff: f64,
}

impl FilterParams {
    pub fn new(min_cutoff: f64, beta: f64) -> Self {
        Self {
            min_cutoff,
            beta,
            d_cutoff: 1.0,
        }
    }
}

/// Scalar one-pole filter whose cutoff tracks an externally supplied velocity.
#[derive(Debug, Clone)]
pub struct VelocityFilter {
    params: FilterParams,
    rate: f64,
    prev: Option<f64>,
}

impl VelocityFilter {
    pub fn new(params: FilterParams, rate: f64) -> Self {
        Self {
            params,
            rate,
            prev: None,
        }
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    pub fn filter(&mut self, x: f64, velocity: f64) -> f64 {
        let prev = *self.prev.get_or_insert(x);
        let cutoff = self.params.min_cutoff + self.params.beta * velocity.abs();
        let x_hat = prev + alpha(cutoff, self.rate) * (x - prev);
        self.prev = Some(x_hat);
        x_hat
    }
}

#[derive(Debug, Clone)]
pub struct PositionFilter {
    axes: [VelocityFilter; 3],
}

impl PositionFilter {
    pub fn new(params: FilterParams, rate: f64) -> Self {
        let axis = VelocityFilter::new(params, rate);
        Self {
            axes: [axis.clone(), axis.clone(), axis],
        }
    }

    pub fn set_rate(&mut self, rate: f64) {
        for axis in &mut self.axes {
            axis.set_rate(rate);
        }
    }

    pub fn filter(&mut self, position: Vec3, velocity: Vec3) -> Vec3 {
        Vec3::new(
            self.axes[0].filter(position.x as f64, velocity.x as f64) as f32,
            self.axes[1].filter(position.y as f64, velocity.y as f64) as f32,
            self.axes[2].filter(position.z as f64, velocity.z as f64) as f32,
        )
    }
}

/// Plain exponential filter with the coefficient supplied per sample.
#[derive(Debug, Clone, Copy, Default)]
struct LowPass {
    state: Option<f32>,
}

impl LowPass {
    fn filter(&mut self, value: f32, alpha: f32) -> f32 {
        let out = match self.state {
            Some(s) => alpha * value + (1.0 - alpha) * s,
            None => value,
        };
        self.state = Some(out);
        out
    }
}

#[derive(Debug, Clone)]
pub struct RotationFilter {
    params: FilterParams,
    rate: f64,
    components: [LowPass; 4],
    // Last blended value, before normalisation.
    current: Quat,
}

impl RotationFilter {
    pub fn new(params: FilterParams, rate: f64) -> Self {
        Self {
            params,
            rate,
            components: [LowPass::default(); 4],
            current: Quat::IDENTITY,
        }
    }

    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    pub fn filter(&mut self, value: Quat, angular_velocity: Vec3) -> Quat {
        // q and -q are the same rotation; follow whichever is closer to the
        // running estimate.
        let mut value = value;
        if (self.current - value).length() > std::f32::consts::SQRT_2 {
            value = -value;
        }

        let cutoff = self.params.min_cutoff + self.params.beta * angular_velocity.length() as f64;
        let a = alpha(cutoff, self.rate) as f32;

        self.current = Quat::from_xyzw(
            self.components[0].filter(value.x, a),
            self.components[1].filter(value.y, a),
            self.components[2].filter(value.z, a),
            self.components[3].filter(value.w, a),
        );
        self.current.normalize()
    }
}

#[derive(Debug, Clone)]
struct DeviceFilter {
    position: PositionFilter,
    rotation: RotationFilter,
    last_sample: Option<Instant>,
    interval: Option<Duration>,
    last_output: Option<Mat4>,
}

/// Per-device smoothing state, keyed by tracked device index.
///
/// Not internally synchronised; drive it from the frame-loop thread.
#[derive(Debug, Clone)]
pub struct PoseSmoother {
    position_params: FilterParams,
    rotation_params: FilterParams,
    devices: HashMap<u32, DeviceFilter>,
}

impl PoseSmoother {
    pub fn new(position_params: FilterParams, rotation_params: FilterParams) -> Self {
        Self {
            position_params,
            rotation_params,
            devices: HashMap::new(),
        }
    }

    pub fn from_config(cfg: &SmoothingConfig) -> Self {
        Self::new(
            FilterParams::new(cfg.pos_min_cutoff as f64, cfg.pos_beta as f64),
            FilterParams::new(cfg.rot_min_cutoff as f64, cfg.rot_beta as f64),
        )
    }

    pub fn tracked_devices(&self) -> usize {
        self.devices.len()
    }

    /// Forget all device state.
    pub fn reset(&mut self) {
        self.devices.clear();
    }

    /// Smooth `pose` for `device`, sampled at `now`.
    ///
    /// The first sample for a device only records the time. A timestamp that
    /// does not move forward leaves the filters untouched and returns the
    /// previous output.
    pub fn smooth(
        &mut self,
        device: u32,
        pose: Mat4,
        velocity: &PoseVelocity,
        now: Instant,
    ) -> Mat4 {
        let (pos_params, rot_params) = (self.position_params, self.rotation_params);
        let state = self.devices.entry(device).or_insert_with(|| DeviceFilter {
            position: PositionFilter::new(pos_params, DEFAULT_RATE_HZ),
            rotation: RotationFilter::new(rot_params, DEFAULT_RATE_HZ),
            last_sample: None,
            interval: None,
            last_output: None,
        });

        if let Some(prev) = state.last_sample {
            let delta = now.checked_duration_since(prev).unwrap_or_default();
            if delta.is_zero() {
                trace!(device, "stale pose timestamp, keeping previous output");
                return state.last_output.unwrap_or(pose);
            }
            if delta > MIN_FRAME_INTERVAL {
                state.interval = Some(delta);
            }
        }
        state.last_sample = Some(now);

        let Some(interval) = state.interval else {
            return pose;
        };
        let rate = 1.0 / interval.as_secs_f64();
        state.position.set_rate(rate);
        state.rotation.set_rate(rate);

        let (_, rotation, translation) = pose.to_scale_rotation_translation();
        let position = state
            .position
            .filter(translation, Vec3::from_array(velocity.linear));
        let rotation = state
            .rotation
            .filter(rotation, Vec3::from_array(velocity.angular));

        let out = Mat4::from_rotation_translation(rotation, position);
        state.last_output = Some(out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still() -> PoseVelocity {
        PoseVelocity::default()
    }

    #[test]
    fn test_alpha_matches_closed_form() {
        let a = alpha(1.0, 90.0);
        let expected = 1.0 / (1.0 + 90.0 / (2.0 * PI));
        assert!((a - expected).abs() < 1e-12);
        // Higher cutoff follows the input more closely.
        assert!(alpha(10.0, 90.0) > a);
    }

    #[test]
    fn test_first_sample_initialises_state() {
        let mut f = VelocityFilter::new(FilterParams::new(1.0, 0.0), 90.0);
        assert_eq!(f.filter(3.5, 0.0), 3.5);
    }

    #[test]
    fn test_beta_zero_converges_monotonically_regardless_of_velocity() {
        let params = FilterParams::new(1.0, 0.0);
        let mut slow = VelocityFilter::new(params, 90.0);
        let mut fast = VelocityFilter::new(params, 90.0);
        slow.filter(0.0, 0.0);
        fast.filter(0.0, 0.0);

        let mut last = 0.0;
        for _ in 0..200 {
            let a = slow.filter(1.0, 0.0);
            let b = fast.filter(1.0, 50.0);
            assert_eq!(a, b);
            assert!(a > last);
            assert!(a <= 1.0);
            last = a;
        }
        assert!(last > 0.99);
    }

    #[test]
    fn test_beta_raises_cutoff_with_velocity() {
        let params = FilterParams::new(1.0, 5.0);
        let mut slow = VelocityFilter::new(params, 90.0);
        let mut fast = VelocityFilter::new(params, 90.0);
        slow.filter(0.0, 0.0);
        fast.filter(0.0, 0.0);
        assert!(fast.filter(1.0, 2.0) > slow.filter(1.0, 0.0));
    }

    #[test]
    fn test_rotation_double_cover_does_not_jump() {
        let mut f = RotationFilter::new(FilterParams::new(1.5, 0.2), 90.0);
        let q = Quat::from_rotation_y(0.8);
        let first = f.filter(q, Vec3::ZERO);
        let second = f.filter(-q, Vec3::ZERO);
        assert!(first.abs_diff_eq(q, 1e-5));
        assert!(second.abs_diff_eq(first, 1e-5));
    }

    #[test]
    fn test_rotation_output_is_unit_length() {
        let mut f = RotationFilter::new(FilterParams::new(1.0, 0.0), 90.0);
        f.filter(Quat::IDENTITY, Vec3::ZERO);
        let out = f.filter(Quat::from_rotation_z(1.2), Vec3::ZERO);
        assert!((out.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_first_frame_passes_through() {
        let mut s = PoseSmoother::from_config(&SmoothingConfig::default());
        let pose = Mat4::from_translation(Vec3::new(0.1, 1.2, -0.3));
        assert_eq!(s.smooth(3, pose, &still(), Instant::now()), pose);
        assert_eq!(s.tracked_devices(), 1);
    }

    #[test]
    fn test_smoothing_lags_behind_step() {
        let mut s = PoseSmoother::from_config(&SmoothingConfig::default());
        let t0 = Instant::now();
        let a = Mat4::from_translation(Vec3::ZERO);
        let b = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        s.smooth(1, a, &still(), t0);
        let first = s.smooth(1, a, &still(), t0 + Duration::from_millis(11));
        assert!(first.abs_diff_eq(a, 1e-6));
        let out = s.smooth(1, b, &still(), t0 + Duration::from_millis(22));
        assert!(out.w_axis.x > 0.0 && out.w_axis.x < 1.0);
    }

    #[test]
    fn test_stale_timestamp_is_a_no_op() {
        let mut s = PoseSmoother::from_config(&SmoothingConfig::default());
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_millis(11);
        let a = Mat4::IDENTITY;
        let b = Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0));
        s.smooth(1, a, &still(), t0);
        s.smooth(1, a, &still(), t1);
        let out = s.smooth(1, b, &still(), t1);
        assert!(out.abs_diff_eq(a, 1e-6));
        let earlier = s.smooth(1, b, &still(), t0);
        assert!(earlier.abs_diff_eq(a, 1e-6));
    }

    #[test]
    fn test_short_interval_reuses_previous_rate() {
        let mut s = PoseSmoother::from_config(&SmoothingConfig::default());
        let t0 = Instant::now();
        s.smooth(2, Mat4::IDENTITY, &still(), t0);
        // Below the noise floor with no rate established yet: passthrough.
        let target = Mat4::from_translation(Vec3::new(0.0, 0.0, 1.0));
        let out = s.smooth(2, target, &still(), t0 + Duration::from_millis(1));
        assert_eq!(out, target);
    }

    #[test]
    fn test_short_interval_after_rate_established_keeps_old_rate() {
        let params = FilterParams::new(1.0, 0.0);
        let mut s = PoseSmoother::new(params, params);
        let t0 = Instant::now();
        s.smooth(4, Mat4::IDENTITY, &still(), t0);
        // 10 ms establishes 100 Hz and seeds the filters at the origin.
        s.smooth(4, Mat4::IDENTITY, &still(), t0 + Duration::from_millis(10));

        let target = Mat4::from_translation(Vec3::new(0.0, 0.0, 1.0));
        let out = s.smooth(4, target, &still(), t0 + Duration::from_millis(11));
        let at_old_rate = alpha(1.0, 100.0) as f32;
        assert!((out.w_axis.z - at_old_rate).abs() < 1e-5);
        assert!((out.w_axis.z - alpha(1.0, 1000.0) as f32).abs() > 1e-3);
    }

    #[test]
    fn test_devices_are_independent() {
        let mut s = PoseSmoother::from_config(&SmoothingConfig::default());
        let t0 = Instant::now();
        s.smooth(1, Mat4::IDENTITY, &still(), t0);
        s.smooth(2, Mat4::IDENTITY, &still(), t0);
        assert_eq!(s.tracked_devices(), 2);
        s.reset();
        assert_eq!(s.tracked_devices(), 0);
    }
}
