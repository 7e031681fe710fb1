use ovrbridge_vr::{Hand, TrackedProperty};

use super::{ControllerFamily, InteractionProfile, LegacyBindings, LegacyControl, PropertyValue};
use crate::geometry::inverse_calibration;

pub(super) const PATH: &str = "/interaction_profiles/oculus/touch_controller";

pub(super) fn profile() -> InteractionProfile {
    let mut p = InteractionProfile::new(ControllerFamily::OculusTouch, PATH, "oculus_touch");

    // Runtimes needn't expose the system buttons and legacy apps can't use them.
    p.add_paths(&[
        "/user/hand/left/input/x/click",
        "/user/hand/left/input/x/touch",
        "/user/hand/left/input/y/click",
        "/user/hand/left/input/y/touch",
        "/user/hand/left/input/menu/click",
        "/user/hand/right/input/a/click",
        "/user/hand/right/input/a/touch",
        "/user/hand/right/input/b/click",
        "/user/hand/right/input/b/touch",
    ]);
    p.add_per_hand_paths(&[
        "input/squeeze/value",
        "input/trigger/value",
        "input/trigger/touch",
        "input/thumbstick/x",
        "input/thumbstick/y",
        "input/thumbstick/click",
        "input/thumbstick/touch",
        "input/thumbstick",
        "input/thumbrest/touch",
        "input/grip/pose",
        "input/aim/pose",
        "output/haptic",
    ]);

    p.set_translations(&[
        ("grip", "squeeze"),
        ("joystick", "thumbstick"),
        ("pull", "value"),
        ("grip/click", "squeeze/value"),
        ("trigger/click", "trigger/value"),
        ("application_menu", "menu"),
    ]);

    p.set_render_models("oculus_quest2_controller_left", "oculus_quest2_controller_right");
    p.set_hmd_property(TrackedProperty::ManufacturerName, "Oculus");
    p.set_controller_property(
        TrackedProperty::ModelNumber,
        PropertyValue::PerHand {
            left: "Oculus Quest2 (Left Controller)",
            right: "Oculus Quest2 (Right Controller)",
        },
    );
    p.set_controller_property(
        TrackedProperty::ControllerType,
        PropertyValue::Shared("oculus_touch"),
    );

    // Quest 2 render model "openxr_grip" component, with the pitch trimmed.
    for hand in Hand::BOTH {
        p.set_grip_transform(hand, inverse_calibration([0.0, 0.003, 0.097], [0.037, 0.0, 0.0]));
        p.set_component_transform(
            hand,
            "body",
            inverse_calibration([0.0, 0.003, 0.097], [5.037, 0.0, 0.0]),
        );
    }

    let mirror = |x: f32, hand: Hand| if hand == Hand::Left { -x } else { x };
    for hand in Hand::BOTH {
        p.set_component_transform(
            hand,
            "base",
            inverse_calibration([mirror(0.00554, hand), -0.00735, 0.139], [-0.4, -180.0, 0.0]),
        );
        p.set_component_transform(
            hand,
            "tip",
            inverse_calibration([mirror(-0.00629, hand), -0.02522, 0.03469], [-39.4, 0.0, 0.0]),
        );
    }

    p
}

pub(super) fn legacy_bindings(hand: Hand) -> LegacyBindings {
    let mut b = LegacyBindings::default();
    b.set(LegacyControl::StickX, "input/thumbstick/x")
        .set(LegacyControl::StickY, "input/thumbstick/y")
        .set(LegacyControl::StickBtn, "input/thumbstick/click")
        .set(LegacyControl::StickBtnTouch, "input/thumbstick/touch")
        .set(LegacyControl::Trigger, "input/trigger/value")
        .set(LegacyControl::TriggerClick, "input/trigger/value")
        .set(LegacyControl::TriggerTouch, "input/trigger/touch")
        .set(LegacyControl::Grip, "input/squeeze/value")
        .set(LegacyControl::Haptic, "output/haptic")
        .set(LegacyControl::GripPose, "input/grip/pose")
        .set(LegacyControl::AimPose, "input/aim/pose");

    match hand {
        Hand::Left => {
            b.set(LegacyControl::Menu, "input/y/click")
                .set(LegacyControl::MenuTouch, "input/y/touch")
                .set(LegacyControl::BtnA, "input/x/click")
                .set(LegacyControl::BtnATouch, "input/x/touch")
                // What Oculus calls the menu button is the legacy system button.
                .set(LegacyControl::System, "input/menu/click");
        }
        Hand::Right => {
            // The right-hand Oculus button belongs to the runtime.
            b.set(LegacyControl::Menu, "input/b/click")
                .set(LegacyControl::MenuTouch, "input/b/touch")
                .set(LegacyControl::BtnA, "input/a/click")
                .set(LegacyControl::BtnATouch, "input/a/touch");
        }
    }
    b
}
