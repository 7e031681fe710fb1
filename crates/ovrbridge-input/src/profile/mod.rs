//! Interaction profiles: one per physical controller family.
//!
//! A profile knows which paths its hardware exposes, how to rewrite the
//! near-synonyms legacy applications use, where each legacy control lives on
//! this hardware, and how its grip space differs from the legacy one.

mod holographic;
mod index;
mod khr_simple;
mod oculus;
mod reverb_g2;
mod vive;

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use glam::Mat4;
use ovrbridge_vr::{
    ActionHandle, Hand, PathHandle, PathResolver, TrackedProperty, VrError, VrResult,
};
use tracing::debug;

use crate::geometry::GeometryAdjust;

/// The closed set of supported controller families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerFamily {
    OculusTouch,
    IndexController,
    ViveWand,
    Holographic,
    KhrSimple,
    ReverbG2,
}

impl ControllerFamily {
    pub fn build(self) -> InteractionProfile {
        match self {
            ControllerFamily::OculusTouch => oculus::profile(),
            ControllerFamily::IndexController => index::profile(),
            ControllerFamily::ViveWand => vive::profile(),
            ControllerFamily::Holographic => holographic::profile(),
            ControllerFamily::KhrSimple => khr_simple::profile(),
            ControllerFamily::ReverbG2 => reverb_g2::profile(),
        }
    }

    fn legacy_bindings(self, hand: Hand) -> LegacyBindings {
        match self {
            ControllerFamily::OculusTouch => oculus::legacy_bindings(hand),
            ControllerFamily::IndexController => index::legacy_bindings(hand),
            ControllerFamily::ViveWand => vive::legacy_bindings(hand),
            ControllerFamily::Holographic => holographic::legacy_bindings(hand),
            ControllerFamily::KhrSimple => khr_simple::legacy_bindings(hand),
            ControllerFamily::ReverbG2 => reverb_g2::legacy_bindings(hand),
        }
    }
}

/// Fixed-function controls of the legacy input model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyControl {
    System,
    Menu,
    MenuTouch,
    BtnA,
    BtnATouch,
    StickX,
    StickY,
    TrackPadX,
    TrackPadY,
    TrackPadClick,
    TrackPadTouch,
    StickBtn,
    StickBtnTouch,
    Trigger,
    TriggerTouch,
    TriggerClick,
    Grip,
    GripClick,
    Haptic,
    GripPose,
    AimPose,
}

impl LegacyControl {
    pub const COUNT: usize = 21;

    /// Every control, in binding order.
    pub const ALL: [LegacyControl; Self::COUNT] = [
        LegacyControl::System,
        LegacyControl::Menu,
        LegacyControl::MenuTouch,
        LegacyControl::BtnA,
        LegacyControl::BtnATouch,
        LegacyControl::StickX,
        LegacyControl::StickY,
        LegacyControl::TrackPadX,
        LegacyControl::TrackPadY,
        LegacyControl::TrackPadClick,
        LegacyControl::TrackPadTouch,
        LegacyControl::StickBtn,
        LegacyControl::StickBtnTouch,
        LegacyControl::Trigger,
        LegacyControl::TriggerTouch,
        LegacyControl::TriggerClick,
        LegacyControl::Grip,
        LegacyControl::GripClick,
        LegacyControl::Haptic,
        LegacyControl::GripPose,
        LegacyControl::AimPose,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LegacyControl::System => "system",
            LegacyControl::Menu => "menu",
            LegacyControl::MenuTouch => "menu_touch",
            LegacyControl::BtnA => "btn_a",
            LegacyControl::BtnATouch => "btn_a_touch",
            LegacyControl::StickX => "stick_x",
            LegacyControl::StickY => "stick_y",
            LegacyControl::TrackPadX => "trackpad_x",
            LegacyControl::TrackPadY => "trackpad_y",
            LegacyControl::TrackPadClick => "trackpad_click",
            LegacyControl::TrackPadTouch => "trackpad_touch",
            LegacyControl::StickBtn => "stick_btn",
            LegacyControl::StickBtnTouch => "stick_btn_touch",
            LegacyControl::Trigger => "trigger",
            LegacyControl::TriggerTouch => "trigger_touch",
            LegacyControl::TriggerClick => "trigger_click",
            LegacyControl::Grip => "grip",
            LegacyControl::GripClick => "grip_click",
            LegacyControl::Haptic => "haptic",
            LegacyControl::GripPose => "grip_pose",
            LegacyControl::AimPose => "aim_pose",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Where each legacy control lives on a family, relative to the hand path.
/// `None` means the hardware has no such control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyBindings {
    paths: [Option<&'static str>; LegacyControl::COUNT],
}

impl LegacyBindings {
    pub fn set(&mut self, control: LegacyControl, path: &'static str) -> &mut Self {
        self.paths[control.slot()] = Some(path);
        self
    }

    /// The path as authored, without fallbacks.
    pub fn get(&self, control: LegacyControl) -> Option<&'static str> {
        self.paths[control.slot()]
    }

    /// The path a control binds to. Grip-click falls back to the grip path
    /// on hardware without a separate click.
    pub fn resolve(&self, control: LegacyControl) -> Option<&'static str> {
        match control {
            LegacyControl::GripClick => self
                .get(LegacyControl::GripClick)
                .or_else(|| self.get(LegacyControl::Grip)),
            other => self.get(other),
        }
    }

    /// Bound controls and their paths, in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (LegacyControl, &'static str)> + '_ {
        LegacyControl::ALL
            .into_iter()
            .filter_map(|control| self.resolve(control).map(|path| (control, path)))
    }
}

/// Action handles the legacy emulation layer created for one hand.
#[derive(Debug, Clone)]
pub struct LegacyControllerActions {
    hand: Hand,
    actions: [ActionHandle; LegacyControl::COUNT],
}

impl LegacyControllerActions {
    pub fn new(hand: Hand) -> Self {
        Self {
            hand,
            actions: [ActionHandle::NULL; LegacyControl::COUNT],
        }
    }

    pub fn hand(&self) -> Hand {
        self.hand
    }

    pub fn hand_path(&self) -> &'static str {
        self.hand.path()
    }

    pub fn set(&mut self, control: LegacyControl, action: ActionHandle) -> &mut Self {
        self.actions[control.slot()] = action;
        self
    }

    pub fn get(&self, control: LegacyControl) -> ActionHandle {
        self.actions[control.slot()]
    }
}

/// An action/path pair to suggest to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedBinding {
    pub action: ActionHandle,
    pub binding: PathHandle,
}

/// Device property values a family reports in place of the runtime's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Same string for both hands.
    Shared(&'static str),
    PerHand {
        left: &'static str,
        right: &'static str,
    },
}

pub struct InteractionProfile {
    family: ControllerFamily,
    path: &'static str,
    openvr_name: &'static str,
    render_models: [Option<&'static str>; 2],
    valid_input_paths: HashSet<String>,
    path_translation_map: Vec<(&'static str, &'static str)>,
    hmd_properties: HashMap<TrackedProperty, &'static str>,
    controller_properties: HashMap<TrackedProperty, PropertyValue>,
    grip_transforms: [Mat4; 2],
    component_transforms: [HashMap<&'static str, Mat4>; 2],
    legacy_bindings: [OnceLock<LegacyBindings>; 2],
}

impl InteractionProfile {
    pub(crate) fn new(
        family: ControllerFamily,
        path: &'static str,
        openvr_name: &'static str,
    ) -> Self {
        Self {
            family,
            path,
            openvr_name,
            render_models: [None, None],
            valid_input_paths: HashSet::new(),
            path_translation_map: Vec::new(),
            hmd_properties: HashMap::new(),
            controller_properties: HashMap::new(),
            grip_transforms: [Mat4::IDENTITY; 2],
            component_transforms: [HashMap::new(), HashMap::new()],
            legacy_bindings: [OnceLock::new(), OnceLock::new()],
        }
    }

    /// Register paths that already carry a `/user/hand/...` prefix.
    pub(crate) fn add_paths(&mut self, paths: &[&str]) {
        self.valid_input_paths
            .extend(paths.iter().map(|p| p.to_string()));
    }

    /// Register paths exposed identically on both hands, relative to the hand.
    pub(crate) fn add_per_hand_paths(&mut self, paths: &[&str]) {
        for hand in Hand::BOTH {
            self.valid_input_paths
                .extend(paths.iter().map(|p| format!("{}/{}", hand.path(), p)));
        }
    }

    pub(crate) fn set_translations(&mut self, map: &[(&'static str, &'static str)]) {
        self.path_translation_map = map.to_vec();
    }

    pub(crate) fn set_render_models(&mut self, left: &'static str, right: &'static str) {
        self.render_models = [Some(left), Some(right)];
    }

    pub(crate) fn set_hmd_property(&mut self, prop: TrackedProperty, value: &'static str) {
        self.hmd_properties.insert(prop, value);
    }

    pub(crate) fn set_controller_property(&mut self, prop: TrackedProperty, value: PropertyValue) {
        self.controller_properties.insert(prop, value);
    }

    pub(crate) fn set_grip_transform(&mut self, hand: Hand, transform: Mat4) {
        self.grip_transforms[hand.index()] = transform;
    }

    pub(crate) fn set_component_transform(
        &mut self,
        hand: Hand,
        name: &'static str,
        transform: Mat4,
    ) {
        self.component_transforms[hand.index()].insert(name, transform);
    }

    pub fn family(&self) -> ControllerFamily {
        self.family
    }

    /// Canonical interaction profile path, e.g. `/interaction_profiles/oculus/touch_controller`.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Controller type name legacy applications know this family by.
    pub fn openvr_name(&self) -> &'static str {
        self.openvr_name
    }

    pub fn render_model_name(&self, hand: Hand) -> Option<&'static str> {
        self.render_models[hand.index()]
    }

    pub fn valid_input_paths(&self) -> &HashSet<String> {
        &self.valid_input_paths
    }

    pub fn is_input_path_valid(&self, path: &str) -> bool {
        self.valid_input_paths.contains(path)
    }

    /// Rewrite a legacy path into this family's vocabulary.
    ///
    /// Valid paths come back untouched. Otherwise every translation entry is
    /// tried in order and replaces only its first occurrence. The result is
    /// not re-validated.
    pub fn translate_action(&self, input_path: &str) -> String {
        if self.path_translation_map.is_empty() || self.is_input_path_valid(input_path) {
            return input_path.to_string();
        }

        let mut out = input_path.to_string();
        for &(from, to) in &self.path_translation_map {
            if out.contains(from) {
                out = out.replacen(from, to, 1);
            }
        }
        debug!(
            from = input_path,
            to = %out,
            profile = self.path,
            "translated legacy path"
        );
        out
    }

    /// Legacy control table for `hand`, built on first use.
    pub fn legacy_bindings(&self, hand: Hand) -> &LegacyBindings {
        self.legacy_bindings[hand.index()].get_or_init(|| self.family.legacy_bindings(hand))
    }

    /// Append a suggested binding for every legacy control this family has.
    ///
    /// Either every control with a path is bound or a fatal error is
    /// returned and `out` is left as it was.
    pub fn add_legacy_bindings(
        &self,
        ctrl: &LegacyControllerActions,
        resolver: &dyn PathResolver,
        out: &mut Vec<SuggestedBinding>,
    ) -> VrResult<()> {
        let hand_path = ctrl.hand_path();
        let mut bindings = Vec::with_capacity(LegacyControl::COUNT);

        for (control, path) in self.legacy_bindings(ctrl.hand()).iter() {
            let real_path = format!("{hand_path}/{path}");
            if !self.is_input_path_valid(&real_path) {
                return Err(VrError::InvalidLegacyPath {
                    path: real_path,
                    profile: self.path.to_string(),
                });
            }

            let action = ctrl.get(control);
            if action.is_null() {
                return Err(VrError::NullAction {
                    control: control.name(),
                    hand_path: hand_path.to_string(),
                });
            }

            let binding = resolver.string_to_path(&real_path)?;
            bindings.push(SuggestedBinding { action, binding });
        }

        debug!(
            profile = self.path,
            hand = hand_path,
            count = bindings.len(),
            "added legacy bindings"
        );
        out.extend(bindings);
        Ok(())
    }

    /// The family's authored grip correction, without user offsets.
    pub fn primary_grip_transform(&self, hand: Hand) -> Mat4 {
        self.grip_transforms[hand.index()]
    }

    /// Transform from the runtime's grip space to the legacy controller
    /// space, including any configured user offset. An unknown hand gets the
    /// identity.
    pub fn grip_to_steamvr_transform(&self, hand: Option<Hand>, adjust: &GeometryAdjust) -> Mat4 {
        match hand {
            Some(hand) => adjust.apply(hand, self.primary_grip_transform(hand)),
            None => Mat4::IDENTITY,
        }
    }

    /// Correction for a named render-model component, if this family has one.
    pub fn component_transform(&self, hand: Hand, name: &str) -> Option<Mat4> {
        self.component_transforms[hand.index()].get(name).copied()
    }

    pub fn hmd_property_override(&self, prop: TrackedProperty) -> Option<&'static str> {
        self.hmd_properties.get(&prop).copied()
    }

    pub fn property_override(&self, prop: TrackedProperty, hand: Hand) -> Option<&'static str> {
        match self.controller_properties.get(&prop)? {
            PropertyValue::Shared(value) => Some(*value),
            PropertyValue::PerHand { left, right } => Some(match hand {
                Hand::Left => *left,
                Hand::Right => *right,
            }),
        }
    }
}

impl std::fmt::Debug for InteractionProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionProfile")
            .field("family", &self.family)
            .field("path", &self.path)
            .field("valid_input_paths", &self.valid_input_paths.len())
            .finish_non_exhaustive()
    }
}
