use ovrbridge_vr::{Hand, TrackedProperty};

use super::{ControllerFamily, InteractionProfile, LegacyBindings, LegacyControl, PropertyValue};
use crate::geometry::inverse_calibration;

pub(super) const PATH: &str = "/interaction_profiles/htc/vive_controller";

pub(super) fn profile() -> InteractionProfile {
    let mut p = InteractionProfile::new(ControllerFamily::ViveWand, PATH, "vive_controller");

    p.add_per_hand_paths(&[
        "input/system/click",
        "input/squeeze/click",
        "input/menu/click",
        "input/trigger/click",
        "input/trigger/value",
        "input/trackpad/x",
        "input/trackpad/y",
        "input/trackpad/click",
        "input/trackpad/touch",
        "input/trackpad",
        "input/grip/pose",
        "input/aim/pose",
        "output/haptic",
    ]);

    // No thumbstick on the wand; stick bindings land on the trackpad.
    p.set_translations(&[
        ("grip", "squeeze"),
        ("application_menu", "menu"),
        ("pull", "value"),
        ("joystick", "trackpad"),
        ("thumbstick", "trackpad"),
    ]);

    p.set_render_models("vr_controller_vive_1_5", "vr_controller_vive_1_5");
    p.set_hmd_property(TrackedProperty::ManufacturerName, "HTC");
    p.set_controller_property(
        TrackedProperty::ModelNumber,
        PropertyValue::Shared("Vive. Controller MV"),
    );
    p.set_controller_property(
        TrackedProperty::ControllerType,
        PropertyValue::Shared("vive_controller"),
    );

    for hand in Hand::BOTH {
        p.set_grip_transform(hand, inverse_calibration([0.0, -0.015, 0.097], [-5.0, 0.0, 0.0]));
    }
    p
}

pub(super) fn legacy_bindings(_hand: Hand) -> LegacyBindings {
    let mut b = LegacyBindings::default();
    b.set(LegacyControl::System, "input/system/click")
        .set(LegacyControl::Menu, "input/menu/click")
        .set(LegacyControl::TrackPadX, "input/trackpad/x")
        .set(LegacyControl::TrackPadY, "input/trackpad/y")
        .set(LegacyControl::TrackPadClick, "input/trackpad/click")
        .set(LegacyControl::TrackPadTouch, "input/trackpad/touch")
        .set(LegacyControl::Trigger, "input/trigger/value")
        .set(LegacyControl::TriggerClick, "input/trigger/click")
        .set(LegacyControl::Grip, "input/squeeze/click")
        .set(LegacyControl::Haptic, "output/haptic")
        .set(LegacyControl::GripPose, "input/grip/pose")
        .set(LegacyControl::AimPose, "input/aim/pose");
    b
}
