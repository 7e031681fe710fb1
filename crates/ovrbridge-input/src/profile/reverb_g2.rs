use ovrbridge_vr::{Hand, TrackedProperty};

use super::holographic::wmr_grip_calibration;
use super::{ControllerFamily, InteractionProfile, LegacyBindings, LegacyControl, PropertyValue};

pub(super) const PATH: &str = "/interaction_profiles/hp/mixed_reality_controller";

pub(super) fn profile() -> InteractionProfile {
    let mut p = InteractionProfile::new(ControllerFamily::ReverbG2, PATH, "hpmotioncontroller");

    p.add_paths(&[
        "/user/hand/left/input/x/click",
        "/user/hand/left/input/y/click",
        "/user/hand/right/input/a/click",
        "/user/hand/right/input/b/click",
    ]);
    p.add_per_hand_paths(&[
        "input/menu/click",
        "input/squeeze/value",
        "input/trigger/value",
        "input/thumbstick/x",
        "input/thumbstick/y",
        "input/thumbstick/click",
        "input/thumbstick",
        "input/grip/pose",
        "input/aim/pose",
        "output/haptic",
    ]);

    p.set_translations(&[
        ("application_menu", "menu"),
        ("grip", "squeeze"),
        ("pull", "value"),
        ("squeeze/click", "squeeze/value"),
        ("trigger/click", "trigger/value"),
        ("joystick", "thumbstick"),
    ]);

    p.set_hmd_property(TrackedProperty::ManufacturerName, "WindowsMR");
    p.set_controller_property(
        TrackedProperty::ModelNumber,
        PropertyValue::PerHand {
            left: "HP Reverb G2 Controller (Left)",
            right: "HP Reverb G2 Controller (Right)",
        },
    );
    p.set_controller_property(
        TrackedProperty::ControllerType,
        PropertyValue::Shared("hpmotioncontroller"),
    );

    let grip = wmr_grip_calibration().inverse();
    for hand in Hand::BOTH {
        p.set_grip_transform(hand, grip);
    }
    p
}

pub(super) fn legacy_bindings(hand: Hand) -> LegacyBindings {
    let mut b = LegacyBindings::default();
    b.set(LegacyControl::System, "input/menu/click")
        .set(LegacyControl::StickX, "input/thumbstick/x")
        .set(LegacyControl::StickY, "input/thumbstick/y")
        .set(LegacyControl::StickBtn, "input/thumbstick/click")
        .set(LegacyControl::Trigger, "input/trigger/value")
        .set(LegacyControl::TriggerClick, "input/trigger/value")
        .set(LegacyControl::Grip, "input/squeeze/value")
        .set(LegacyControl::Haptic, "output/haptic")
        .set(LegacyControl::GripPose, "input/grip/pose")
        .set(LegacyControl::AimPose, "input/aim/pose");

    match hand {
        Hand::Left => b
            .set(LegacyControl::Menu, "input/y/click")
            .set(LegacyControl::BtnA, "input/x/click"),
        Hand::Right => b
            .set(LegacyControl::Menu, "input/b/click")
            .set(LegacyControl::BtnA, "input/a/click"),
    };
    b
}
