use glam::Mat4;
use ovrbridge_vr::{Hand, TrackedProperty};

use super::{ControllerFamily, InteractionProfile, LegacyBindings, LegacyControl, PropertyValue};

pub(super) const PATH: &str = "/interaction_profiles/microsoft/motion_controller";

/// Model-to-grip transform shared by the Windows Mixed Reality controllers.
pub(super) fn wmr_grip_calibration() -> Mat4 {
    Mat4::from_cols_array_2d(&[
        [1.0, -0.0, 0.0, 0.0],
        [0.0, 0.99614, -0.08780, 0.0],
        [0.0, 0.08780, 0.99614, 0.0],
        [0.0, -0.00553, 0.09689, 1.0],
    ])
}

pub(super) fn profile() -> InteractionProfile {
    let mut p =
        InteractionProfile::new(ControllerFamily::Holographic, PATH, "holographic_controller");

    p.add_per_hand_paths(&[
        "input/menu/click",
        "input/squeeze/click",
        "input/trigger/value",
        "input/thumbstick/x",
        "input/thumbstick/y",
        "input/thumbstick/click",
        "input/thumbstick",
        "input/trackpad/x",
        "input/trackpad/y",
        "input/trackpad/click",
        "input/trackpad/touch",
        "input/trackpad",
        "input/grip/pose",
        "input/aim/pose",
        "output/haptic",
    ]);

    p.set_translations(&[
        ("application_menu", "menu"),
        ("grip", "squeeze"),
        ("pull", "value"),
        ("force", "value"),
        ("trigger/click", "trigger/value"),
        ("joystick", "thumbstick"),
    ]);

    p.set_hmd_property(TrackedProperty::ManufacturerName, "WindowsMR");
    p.set_controller_property(TrackedProperty::ModelNumber, PropertyValue::Shared("WindowsMR"));
    p.set_controller_property(
        TrackedProperty::ControllerType,
        PropertyValue::Shared("holographic_controller"),
    );

    let grip = wmr_grip_calibration().inverse();
    for hand in Hand::BOTH {
        p.set_grip_transform(hand, grip);
    }
    p
}

/// Legacy games mostly ignore the thumbstick, but players would rather have
/// it than not, so it's bound alongside the trackpad.
pub(super) fn legacy_bindings(_hand: Hand) -> LegacyBindings {
    let mut b = LegacyBindings::default();
    b.set(LegacyControl::System, "input/menu/click")
        .set(LegacyControl::StickX, "input/thumbstick/x")
        .set(LegacyControl::StickY, "input/thumbstick/y")
        .set(LegacyControl::StickBtn, "input/thumbstick/click")
        .set(LegacyControl::TrackPadClick, "input/trackpad/click")
        .set(LegacyControl::TrackPadX, "input/trackpad/x")
        .set(LegacyControl::TrackPadY, "input/trackpad/y")
        .set(LegacyControl::Trigger, "input/trigger/value")
        .set(LegacyControl::TriggerClick, "input/trigger/value")
        .set(LegacyControl::TriggerTouch, "input/trigger/value")
        .set(LegacyControl::Grip, "input/squeeze/click")
        .set(LegacyControl::Haptic, "output/haptic")
        .set(LegacyControl::GripPose, "input/grip/pose")
        .set(LegacyControl::AimPose, "input/aim/pose");
    b
}
