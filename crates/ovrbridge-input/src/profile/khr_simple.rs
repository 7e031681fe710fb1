//! The lowest common denominator every runtime must support.

use ovrbridge_vr::{Hand, TrackedProperty};

use super::{ControllerFamily, InteractionProfile, LegacyBindings, LegacyControl, PropertyValue};

pub(super) const PATH: &str = "/interaction_profiles/khr/simple_controller";

pub(super) fn profile() -> InteractionProfile {
    let mut p = InteractionProfile::new(ControllerFamily::KhrSimple, PATH, "khr_simple_controller");

    p.add_per_hand_paths(&[
        "input/select/click",
        "input/menu/click",
        "input/grip/pose",
        "input/aim/pose",
        "output/haptic",
    ]);

    p.set_translations(&[
        ("trigger/value", "select/click"),
        ("trigger/click", "select/click"),
        ("application_menu", "menu"),
    ]);

    p.set_controller_property(
        TrackedProperty::ControllerType,
        PropertyValue::Shared("khr_simple_controller"),
    );
    // No calibration data: the grip space is used as-is.
    p
}

/// Only the grip pose is bound; the legacy pose is derived from grip space.
pub(super) fn legacy_bindings(_hand: Hand) -> LegacyBindings {
    let mut b = LegacyBindings::default();
    b.set(LegacyControl::Menu, "input/menu/click")
        .set(LegacyControl::Trigger, "input/select/click")
        .set(LegacyControl::Haptic, "output/haptic")
        .set(LegacyControl::GripPose, "input/grip/pose");
    b
}
