use ovrbridge_vr::{Hand, TrackedProperty};

use super::{ControllerFamily, InteractionProfile, LegacyBindings, LegacyControl, PropertyValue};
use crate::geometry::inverse_calibration;

pub(super) const PATH: &str = "/interaction_profiles/valve/index_controller";

pub(super) fn profile() -> InteractionProfile {
    let mut p = InteractionProfile::new(ControllerFamily::IndexController, PATH, "knuckles");

    p.add_per_hand_paths(&[
        "input/system/click",
        "input/system/touch",
        "input/a/click",
        "input/a/touch",
        "input/b/click",
        "input/b/touch",
        "input/squeeze/value",
        "input/squeeze/force",
        "input/trigger/click",
        "input/trigger/value",
        "input/trigger/touch",
        "input/thumbstick/x",
        "input/thumbstick/y",
        "input/thumbstick/click",
        "input/thumbstick/touch",
        "input/thumbstick",
        "input/trackpad/x",
        "input/trackpad/y",
        "input/trackpad/force",
        "input/trackpad/touch",
        "input/trackpad",
        "input/grip/pose",
        "input/aim/pose",
        "output/haptic",
    ]);

    // The trackpad has no click, only force.
    p.set_translations(&[
        ("grip", "squeeze"),
        ("joystick", "thumbstick"),
        ("pull", "value"),
        ("trackpad/click", "trackpad/force"),
        ("application_menu", "b/click"),
    ]);

    p.set_render_models("valve_controller_knu_1_0_left", "valve_controller_knu_1_0_right");
    p.set_hmd_property(TrackedProperty::ManufacturerName, "Valve");
    p.set_controller_property(
        TrackedProperty::ModelNumber,
        PropertyValue::PerHand {
            left: "Knuckles Left",
            right: "Knuckles Right",
        },
    );
    p.set_controller_property(TrackedProperty::ControllerType, PropertyValue::Shared("knuckles"));

    // Knuckles render model "openxr_grip" component, mirrored for the left hand.
    p.set_grip_transform(
        Hand::Left,
        inverse_calibration([0.0, -0.015, 0.13], [15.392, -2.071, 0.303]),
    );
    p.set_grip_transform(
        Hand::Right,
        inverse_calibration([0.0, -0.015, 0.13], [15.392, 2.071, -0.303]),
    );
    p
}

pub(super) fn legacy_bindings(_hand: Hand) -> LegacyBindings {
    let mut b = LegacyBindings::default();
    b.set(LegacyControl::System, "input/system/click")
        .set(LegacyControl::Menu, "input/b/click")
        .set(LegacyControl::MenuTouch, "input/b/touch")
        .set(LegacyControl::BtnA, "input/a/click")
        .set(LegacyControl::BtnATouch, "input/a/touch")
        .set(LegacyControl::StickX, "input/thumbstick/x")
        .set(LegacyControl::StickY, "input/thumbstick/y")
        .set(LegacyControl::StickBtn, "input/thumbstick/click")
        .set(LegacyControl::StickBtnTouch, "input/thumbstick/touch")
        .set(LegacyControl::TrackPadX, "input/trackpad/x")
        .set(LegacyControl::TrackPadY, "input/trackpad/y")
        .set(LegacyControl::TrackPadTouch, "input/trackpad/touch")
        .set(LegacyControl::Trigger, "input/trigger/value")
        .set(LegacyControl::TriggerClick, "input/trigger/click")
        .set(LegacyControl::TriggerTouch, "input/trigger/touch")
        .set(LegacyControl::Grip, "input/squeeze/value")
        .set(LegacyControl::Haptic, "output/haptic")
        .set(LegacyControl::GripPose, "input/grip/pose")
        .set(LegacyControl::AimPose, "input/aim/pose");
    b
}
