use std::cell::RefCell;
use std::collections::HashMap;

use ovrbridge_common::Config;
use ovrbridge_input::{InputContext, LegacyControl, LegacyControllerActions};
use ovrbridge_vr::{ActionHandle, Capability, Hand, PathHandle, PathResolver, VrError, VrResult};

/// Interns every path it is asked for, like a runtime would.
#[derive(Default)]
struct InterningResolver {
    paths: RefCell<HashMap<String, PathHandle>>,
}

impl InterningResolver {
    fn lookup(&self, handle: PathHandle) -> Option<String> {
        self.paths
            .borrow()
            .iter()
            .find(|(_, &h)| h == handle)
            .map(|(p, _)| p.clone())
    }
}

impl PathResolver for InterningResolver {
    fn string_to_path(&self, path: &str) -> VrResult<PathHandle> {
        let mut paths = self.paths.borrow_mut();
        let next = PathHandle(paths.len() as u64 + 1);
        Ok(*paths.entry(path.to_string()).or_insert(next))
    }
}

fn no_capabilities(_: Capability) -> bool {
    false
}

fn actions_for(hand: Hand) -> LegacyControllerActions {
    let mut actions = LegacyControllerActions::new(hand);
    for (i, control) in LegacyControl::ALL.into_iter().enumerate() {
        actions.set(control, ActionHandle(1 + i as u64));
    }
    actions
}

#[test]
fn test_khr_simple_left_hand_binds_four_controls() {
    let ctx = InputContext::new(Config::default(), &no_capabilities);
    let resolver = InterningResolver::default();
    let path = "/interaction_profiles/khr/simple_controller";

    let bindings = ctx
        .legacy_bindings_for(path, &actions_for(Hand::Left), &resolver)
        .expect("simple controller binds cleanly");
    assert_eq!(bindings.len(), 4);

    let profile = ctx.profile(path).unwrap();
    for binding in &bindings {
        let bound = resolver.lookup(binding.binding).unwrap();
        assert!(bound.starts_with("/user/hand/left/"), "{bound}");
        assert!(profile.is_input_path_valid(&bound), "{bound}");
    }

    let menu = actions_for(Hand::Left).get(LegacyControl::Menu);
    assert!(bindings.iter().any(|b| b.action == menu));
}

#[test]
fn test_every_family_binds_both_hands() {
    let ctx = InputContext::new(Config::default(), &|_: Capability| true);
    let resolver = InterningResolver::default();
    for profile in ctx.registry().profiles() {
        for hand in Hand::BOTH {
            let bindings = ctx
                .legacy_bindings_for(profile.path(), &actions_for(hand), &resolver)
                .unwrap_or_else(|e| panic!("{}: {e}", profile.path()));
            assert!(bindings.len() >= 4, "{}", profile.path());
        }
    }
}

#[test]
fn test_unknown_profile_is_fatal() {
    let ctx = InputContext::new(Config::default(), &no_capabilities);
    let err = ctx
        .legacy_bindings_for(
            "/interaction_profiles/hp/mixed_reality_controller",
            &actions_for(Hand::Right),
            &InterningResolver::default(),
        )
        .unwrap_err();
    assert!(matches!(err, VrError::UnknownProfile(_)));
    assert!(err.is_fatal());
}
