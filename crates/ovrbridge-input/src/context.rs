//! Composition root for the input side of the bridge.
//!
//! `InputContext` owns the profile registry, the user's geometry offsets and
//! the per-device smoothing state. It is meant to be driven from the single
//! frame-loop thread and holds no locks; hosts that call it from several
//! threads must wrap it in their own mutex.

use std::time::Instant;

use glam::Mat4;
use ovrbridge_common::{soft_abort, Config};
use ovrbridge_vr::{
    CapabilityProbe, Hand, PathResolver, SpaceHandle, SpaceLocator, TrackedDevicePose,
    TrackingOrigin, TrackingResult, VrResult,
};
use tracing::debug;

use crate::geometry::GeometryAdjust;
use crate::pose::{mat4_to_hmd34, pose_to_mat4};
use crate::profile::{InteractionProfile, LegacyControllerActions, SuggestedBinding};
use crate::registry::ProfileRegistry;
use crate::smoothing::PoseSmoother;

pub struct InputContext {
    config: Config,
    adjust: GeometryAdjust,
    registry: ProfileRegistry,
    smoother: PoseSmoother,
}

impl InputContext {
    pub fn new(config: Config, probe: &dyn CapabilityProbe) -> Self {
        let adjust = GeometryAdjust::new(config.controller.clone());
        let smoother = PoseSmoother::from_config(&config.smoothing);
        Self {
            registry: ProfileRegistry::new(probe),
            adjust,
            smoother,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn geometry(&self) -> &GeometryAdjust {
        &self.adjust
    }

    pub fn smoother(&self) -> &PoseSmoother {
        &self.smoother
    }

    pub fn profile(&self, path: &str) -> VrResult<&InteractionProfile> {
        self.registry.profile_by_path(path)
    }

    /// Grip-space correction for `hand` on the family at `profile_path`,
    /// including the user's configured offsets.
    pub fn grip_to_steamvr_transform(
        &self,
        profile_path: &str,
        hand: Option<Hand>,
    ) -> VrResult<Mat4> {
        Ok(self
            .profile(profile_path)?
            .grip_to_steamvr_transform(hand, &self.adjust))
    }

    /// Suggested bindings for every legacy control of `ctrl` on the family at
    /// `profile_path`.
    pub fn legacy_bindings_for(
        &self,
        profile_path: &str,
        ctrl: &LegacyControllerActions,
        resolver: &dyn PathResolver,
    ) -> VrResult<Vec<SuggestedBinding>> {
        let mut out = Vec::new();
        self.profile(profile_path)?
            .add_legacy_bindings(ctrl, resolver, &mut out)?;
        Ok(out)
    }

    /// Locate `space` and fill a legacy pose record.
    ///
    /// `extra` is the family correction to post-multiply; smoothing is only
    /// applied when it is present and smoothing is enabled. A failed locate is
    /// a soft failure and yields an invalid pose.
    pub fn pose_from_space(
        &mut self,
        locator: &dyn SpaceLocator,
        space: SpaceHandle,
        origin: TrackingOrigin,
        device: u32,
        extra: Option<Mat4>,
        now: Instant,
    ) -> VrResult<TrackedDevicePose> {
        let location = match locator.locate(space, origin) {
            Ok(location) => location,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                soft_abort(err, self.config.stop_on_soft_abort)?;
                Default::default()
            }
        };

        let mut m = pose_to_mat4(&location.pose);
        if let Some(extra) = extra {
            m *= extra;
            if self.config.smoothing.enabled {
                m = self.smoother.smooth(device, m, &location.velocity, now);
            }
        }

        let valid = location.position_valid;
        if !valid {
            debug!(device, ?origin, "pose out of range");
        }

        Ok(TrackedDevicePose {
            device_to_absolute_tracking: mat4_to_hmd34(m),
            velocity: location.velocity.linear,
            angular_velocity: location.velocity.angular,
            tracking_result: if valid {
                TrackingResult::RunningOk
            } else {
                TrackingResult::RunningOutOfRange
            },
            pose_is_valid: valid,
            device_is_connected: true,
        })
    }
}

impl std::fmt::Debug for InputContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputContext")
            .field("profiles", &self.registry.profiles().len())
            .field("smoothing", &self.config.smoothing.enabled)
            .field("tracked_devices", &self.smoother.tracked_devices())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovrbridge_vr::{Capability, Pose, PoseVelocity, SpaceLocation, VrError};
    use std::cell::RefCell;
    use std::time::Duration;

    fn no_capabilities(_: Capability) -> bool {
        false
    }

    /// Replays queued locations, then fails softly.
    struct ScriptedLocator {
        queue: RefCell<Vec<VrResult<SpaceLocation>>>,
    }

    impl ScriptedLocator {
        fn new(mut items: Vec<VrResult<SpaceLocation>>) -> Self {
            items.reverse();
            Self {
                queue: RefCell::new(items),
            }
        }
    }

    impl SpaceLocator for ScriptedLocator {
        fn locate(&self, _space: SpaceHandle, _origin: TrackingOrigin) -> VrResult<SpaceLocation> {
            self.queue
                .borrow_mut()
                .pop()
                .unwrap_or_else(|| Err(VrError::soft("no more locations")))
        }
    }

    fn located(position: [f32; 3]) -> SpaceLocation {
        SpaceLocation {
            pose: Pose {
                position,
                ..Default::default()
            },
            velocity: PoseVelocity {
                linear: [0.5, 0.0, 0.0],
                angular: [0.0, 1.0, 0.0],
            },
            position_valid: true,
            orientation_valid: true,
        }
    }

    #[test]
    fn test_pose_record_fields() {
        let mut ctx = InputContext::new(Config::default(), &no_capabilities);
        let locator = ScriptedLocator::new(vec![Ok(located([0.1, 1.2, -0.4]))]);
        let pose = ctx
            .pose_from_space(
                &locator,
                SpaceHandle(1),
                TrackingOrigin::Standing,
                1,
                None,
                Instant::now(),
            )
            .unwrap();
        assert!(pose.device_is_connected);
        assert!(pose.pose_is_valid);
        assert_eq!(pose.tracking_result, TrackingResult::RunningOk);
        assert_eq!(pose.velocity, [0.5, 0.0, 0.0]);
        assert_eq!(pose.angular_velocity, [0.0, 1.0, 0.0]);
        assert_eq!(pose.device_to_absolute_tracking[1][3], 1.2);
    }

    #[test]
    fn test_soft_locate_failure_gives_invalid_pose() {
        let mut ctx = InputContext::new(Config::default(), &no_capabilities);
        let locator = ScriptedLocator::new(vec![]);
        let pose = ctx
            .pose_from_space(
                &locator,
                SpaceHandle(1),
                TrackingOrigin::Seated,
                1,
                None,
                Instant::now(),
            )
            .unwrap();
        assert!(!pose.pose_is_valid);
        assert!(pose.device_is_connected);
        assert_eq!(pose.tracking_result, TrackingResult::RunningOutOfRange);
    }

    #[test]
    fn test_soft_locate_failure_escalates_when_configured() {
        let config = Config {
            stop_on_soft_abort: true,
            ..Default::default()
        };
        let mut ctx = InputContext::new(config, &no_capabilities);
        let locator = ScriptedLocator::new(vec![]);
        let err = ctx
            .pose_from_space(
                &locator,
                SpaceHandle(1),
                TrackingOrigin::Seated,
                1,
                None,
                Instant::now(),
            )
            .unwrap_err();
        assert!(matches!(err, VrError::Escalated(_)));
    }

    #[test]
    fn test_fatal_locate_failure_propagates() {
        let mut ctx = InputContext::new(Config::default(), &no_capabilities);
        let locator = ScriptedLocator::new(vec![Err(VrError::DeviceLost {
            operation: "locate".into(),
            reason: "hung".into(),
        })]);
        let err = ctx
            .pose_from_space(
                &locator,
                SpaceHandle(1),
                TrackingOrigin::Seated,
                1,
                None,
                Instant::now(),
            )
            .unwrap_err();
        assert!(matches!(err, VrError::DeviceLost { .. }));
    }

    #[test]
    fn test_extra_transform_is_post_multiplied() {
        let mut ctx = InputContext::new(Config::default(), &no_capabilities);
        let locator = ScriptedLocator::new(vec![Ok(located([0.0, 1.0, 0.0]))]);
        let extra = Mat4::from_translation(glam::Vec3::new(0.0, 0.0, 0.1));
        let pose = ctx
            .pose_from_space(
                &locator,
                SpaceHandle(1),
                TrackingOrigin::Standing,
                1,
                Some(extra),
                Instant::now(),
            )
            .unwrap();
        assert_eq!(pose.device_to_absolute_tracking[2][3], 0.1);
    }

    #[test]
    fn test_smoothing_disabled_is_bit_exact() {
        let mut ctx = InputContext::new(Config::default(), &no_capabilities);
        let extra = ctx
            .grip_to_steamvr_transform(
                "/interaction_profiles/oculus/touch_controller",
                Some(Hand::Left),
            )
            .unwrap();
        let start = Instant::now();
        let samples = [[0.0, 1.0, 0.0], [0.05, 1.0, 0.0], [0.3, 1.1, 0.0]];
        let locator = ScriptedLocator::new(samples.iter().map(|&p| Ok(located(p))).collect());
        for (i, p) in samples.iter().enumerate() {
            let now = start + Duration::from_millis(11 * i as u64);
            let pose = ctx
                .pose_from_space(
                    &locator,
                    SpaceHandle(1),
                    TrackingOrigin::Standing,
                    1,
                    Some(extra),
                    now,
                )
                .unwrap();
            let expected = mat4_to_hmd34(pose_to_mat4(&located(*p).pose) * extra);
            assert_eq!(pose.device_to_absolute_tracking, expected);
        }
        assert_eq!(ctx.smoother().tracked_devices(), 0);
    }

    #[test]
    fn test_smoothing_lags_behind_jump() {
        let mut config = Config::default();
        config.smoothing.enabled = true;
        let mut ctx = InputContext::new(config, &no_capabilities);
        let start = Instant::now();
        let mut still = located([0.0, 1.0, 0.0]);
        still.velocity = PoseVelocity::default();
        let mut jumped = located([0.5, 1.0, 0.0]);
        jumped.velocity = PoseVelocity::default();
        let locator = ScriptedLocator::new(vec![Ok(still), Ok(still), Ok(jumped)]);

        let mut last = None;
        for i in 0..3u64 {
            let now = start + Duration::from_millis(11 * i);
            let pose = ctx.pose_from_space(
                &locator,
                SpaceHandle(1),
                TrackingOrigin::Standing,
                7,
                Some(Mat4::IDENTITY),
                now,
            );
            last = Some(pose.unwrap());
        }
        let x = last.unwrap().device_to_absolute_tracking[0][3];
        assert!(x > 0.0 && x < 0.5, "x = {x}");
        assert_eq!(ctx.smoother().tracked_devices(), 1);
    }

    #[test]
    fn test_unknown_profile_through_context() {
        let ctx = InputContext::new(Config::default(), &no_capabilities);
        let err = ctx
            .grip_to_steamvr_transform("/interaction_profiles/acme/wand", Some(Hand::Left))
            .unwrap_err();
        assert!(matches!(err, VrError::UnknownProfile(_)));
    }
}
