use std::cell::Cell;
use std::collections::HashMap;

use openxr as xr;
use openxr::sys::Handle as _;
use ovrbridge_common::{soft_abort, OrAbort};
use ovrbridge_input::{InputContext, LegacyControl, LegacyControllerActions, SuggestedBinding};
use ovrbridge_vr::{
    ActionHandle, Capability, CapabilityProbe, Hand, PathHandle, PathResolver, Pose, PoseVelocity,
    SpaceHandle, SpaceLocation, SpaceLocator, TrackingOrigin, VrError, VrResult,
};
use tracing::debug;

/// Resolves path strings through the instance.
pub struct OpenXrPaths<'a> {
    instance: &'a xr::Instance,
}

impl<'a> OpenXrPaths<'a> {
    pub fn new(instance: &'a xr::Instance) -> Self {
        Self { instance }
    }
}

impl PathResolver for OpenXrPaths<'_> {
    fn string_to_path(&self, path: &str) -> VrResult<PathHandle> {
        self.instance
            .string_to_path(path)
            .map(|p| PathHandle(p.into_raw()))
            .map_err(|e| VrError::path_resolution(path, format!("{e:?}")))
    }
}

/// Answers capability queries from the extensions the instance was created with.
pub struct OpenXrCapabilities {
    enabled: xr::ExtensionSet,
}

impl OpenXrCapabilities {
    pub fn new(enabled: xr::ExtensionSet) -> Self {
        Self { enabled }
    }
}

impl CapabilityProbe for OpenXrCapabilities {
    fn has_capability(&self, capability: Capability) -> bool {
        match capability {
            Capability::HpMixedRealityController => self.enabled.ext_hp_mixed_reality_controller,
        }
    }
}

pub fn to_pose(pose: xr::Posef) -> Pose {
    Pose {
        position: [pose.position.x, pose.position.y, pose.position.z],
        orientation: [
            pose.orientation.x,
            pose.orientation.y,
            pose.orientation.z,
            pose.orientation.w,
        ],
    }
}

/// Action spaces registered under opaque handles, located against the
/// reference space the tracking origin selects.
pub struct OpenXrSpaces {
    local: xr::Space,
    stage: xr::Space,
    spaces: HashMap<SpaceHandle, xr::Space>,
    display_time: Cell<xr::Time>,
}

impl OpenXrSpaces {
    pub fn new<G: xr::Graphics>(session: &xr::Session<G>) -> VrResult<Self> {
        let local = session
            .create_reference_space(xr::ReferenceSpaceType::LOCAL, xr::Posef::IDENTITY)
            .map_err(|e| VrError::soft(format!("OpenXR local space: {e:?}")))?;
        let stage = session
            .create_reference_space(xr::ReferenceSpaceType::STAGE, xr::Posef::IDENTITY)
            .map_err(|e| VrError::soft(format!("OpenXR stage space: {e:?}")))?;
        Ok(Self {
            local,
            stage,
            spaces: HashMap::new(),
            display_time: Cell::new(xr::Time::from_nanos(0)),
        })
    }

    pub fn insert(&mut self, space: xr::Space) -> SpaceHandle {
        let handle = SpaceHandle(space.as_raw().into_raw());
        self.spaces.insert(handle, space);
        handle
    }

    /// Predicted display time used for every locate until the next call.
    pub fn set_display_time(&self, time: xr::Time) {
        self.display_time.set(time);
    }

    fn base_space(&self, origin: TrackingOrigin) -> &xr::Space {
        match origin {
            TrackingOrigin::Seated => &self.local,
            TrackingOrigin::Standing | TrackingOrigin::RawAndUncalibrated => &self.stage,
        }
    }
}

impl SpaceLocator for OpenXrSpaces {
    fn locate(&self, space: SpaceHandle, origin: TrackingOrigin) -> VrResult<SpaceLocation> {
        let space = self
            .spaces
            .get(&space)
            .ok_or_else(|| VrError::soft(format!("unknown space {space:?}")))?;
        let (location, velocity) = space
            .relate(self.base_space(origin), self.display_time.get())
            .map_err(|e| VrError::soft(format!("OpenXR locate space: {e:?}")))?;

        let linear = if velocity
            .velocity_flags
            .contains(xr::SpaceVelocityFlags::LINEAR_VALID)
        {
            let v = velocity.linear_velocity;
            [v.x, v.y, v.z]
        } else {
            [0.0; 3]
        };
        let angular = if velocity
            .velocity_flags
            .contains(xr::SpaceVelocityFlags::ANGULAR_VALID)
        {
            let v = velocity.angular_velocity;
            [v.x, v.y, v.z]
        } else {
            [0.0; 3]
        };

        Ok(SpaceLocation {
            pose: to_pose(location.pose),
            velocity: PoseVelocity { linear, angular },
            position_valid: location
                .location_flags
                .contains(xr::SpaceLocationFlags::POSITION_VALID),
            orientation_valid: location
                .location_flags
                .contains(xr::SpaceLocationFlags::ORIENTATION_VALID),
        })
    }
}

enum LegacyAction {
    Bool(xr::Action<bool>),
    Float(xr::Action<f32>),
    Haptic(xr::Action<xr::Haptic>),
    Pose(xr::Action<xr::Posef>),
}

impl LegacyAction {
    fn handle(&self) -> ActionHandle {
        let raw = match self {
            LegacyAction::Bool(a) => a.as_raw(),
            LegacyAction::Float(a) => a.as_raw(),
            LegacyAction::Haptic(a) => a.as_raw(),
            LegacyAction::Pose(a) => a.as_raw(),
        };
        ActionHandle(raw.into_raw())
    }
}

/// The action set backing the legacy fixed-function controls, one action
/// per control per hand.
pub struct LegacyActionSet {
    pub action_set: xr::ActionSet,
    actions: HashMap<(Hand, LegacyControl), LegacyAction>,
}

impl LegacyActionSet {
    pub fn new(instance: &xr::Instance) -> VrResult<Self> {
        let action_set = instance
            .create_action_set("legacy-inputs", "Legacy Inputs", 0)
            .map_err(|e| VrError::soft(format!("OpenXR action set: {e:?}")))?;

        let mut actions = HashMap::new();
        for hand in Hand::BOTH {
            let side = match hand {
                Hand::Left => "left",
                Hand::Right => "right",
            };
            for control in LegacyControl::ALL {
                let name = format!("{side}-{}", control.name()).replace('_', "-");
                let localized = format!("{side} {}", control.name().replace('_', " "));
                let action = Self::create(&action_set, control, &name, &localized).map_err(|e| {
                    VrError::soft(format!("OpenXR action {name}: {e:?}"))
                })?;
                actions.insert((hand, control), action);
            }
        }
        debug!(count = actions.len(), "created legacy actions");
        Ok(Self { action_set, actions })
    }

    fn create(
        set: &xr::ActionSet,
        control: LegacyControl,
        name: &str,
        localized: &str,
    ) -> xr::Result<LegacyAction> {
        Ok(match control {
            LegacyControl::StickX
            | LegacyControl::StickY
            | LegacyControl::TrackPadX
            | LegacyControl::TrackPadY
            | LegacyControl::Trigger
            | LegacyControl::Grip => LegacyAction::Float(set.create_action(name, localized, &[])?),
            LegacyControl::Haptic => LegacyAction::Haptic(set.create_action(name, localized, &[])?),
            LegacyControl::GripPose | LegacyControl::AimPose => {
                LegacyAction::Pose(set.create_action(name, localized, &[])?)
            }
            _ => LegacyAction::Bool(set.create_action(name, localized, &[])?),
        })
    }

    /// Raw action handles for one hand, ready for binding.
    pub fn controller_actions(&self, hand: Hand) -> LegacyControllerActions {
        let mut out = LegacyControllerActions::new(hand);
        for control in LegacyControl::ALL {
            if let Some(action) = self.actions.get(&(hand, control)) {
                out.set(control, action.handle());
            }
        }
        out
    }
}

/// Submit `bindings` as the suggested bindings for `profile_path`.
///
/// The bindings carry raw handles of mixed action types, so this goes through
/// the raw entry point rather than the typed `xr::Binding` API.
pub fn suggest_legacy_bindings(
    instance: &xr::Instance,
    profile_path: &str,
    bindings: &[SuggestedBinding],
) -> VrResult<()> {
    let profile = instance
        .string_to_path(profile_path)
        .map_err(|e| VrError::path_resolution(profile_path, format!("{e:?}")))?;

    let raw: Vec<xr::sys::ActionSuggestedBinding> = bindings
        .iter()
        .map(|b| xr::sys::ActionSuggestedBinding {
            action: xr::sys::Action::from_raw(b.action.0),
            binding: xr::Path::from_raw(b.binding.0),
        })
        .collect();
    let info = xr::sys::InteractionProfileSuggestedBinding {
        ty: xr::sys::InteractionProfileSuggestedBinding::TYPE,
        next: std::ptr::null(),
        interaction_profile: profile,
        count_suggested_bindings: raw.len() as u32,
        suggested_bindings: raw.as_ptr(),
    };

    // SAFETY: `info` and `raw` outlive the call and every handle came from
    // this instance.
    let result =
        unsafe { (instance.fp().suggest_interaction_profile_bindings)(instance.as_raw(), &info) };
    if result.into_raw() < 0 {
        return Err(VrError::soft(format!(
            "OpenXR binding suggestion rejected for {profile_path}: {result:?}"
        )));
    }
    debug!(profile = profile_path, count = raw.len(), "suggested legacy bindings");
    Ok(())
}

/// Suggest legacy bindings for every registered profile.
///
/// Authoring defects in a profile's tables are fatal. A runtime that rejects
/// a suggestion only costs that profile, so rejection is a soft failure.
pub fn bind_legacy_profiles(
    instance: &xr::Instance,
    ctx: &InputContext,
    actions: &LegacyActionSet,
) -> VrResult<()> {
    let resolver = OpenXrPaths::new(instance);
    for profile in ctx.registry().profiles() {
        let mut bindings = Vec::new();
        for hand in Hand::BOTH {
            let controller = actions.controller_actions(hand);
            profile.add_legacy_bindings(&controller, &resolver, &mut bindings)?;
        }
        if let Err(err) = suggest_legacy_bindings(instance, profile.path(), &bindings) {
            soft_abort(err, ctx.config().stop_on_soft_abort)?;
        }
    }
    Ok(())
}

/// Host entry point for legacy binding setup.
///
/// Any fatal error from [`bind_legacy_profiles`] terminates the process with
/// its diagnostic.
pub fn install_legacy_bindings(
    instance: &xr::Instance,
    ctx: &InputContext,
    actions: &LegacyActionSet,
) {
    bind_legacy_profiles(instance, ctx, actions).or_abort();
}
