//! The fixed set of interaction profiles known to the bridge.

use std::collections::HashMap;

use ovrbridge_vr::{Capability, CapabilityProbe, VrError, VrResult};
use tracing::info;

use crate::profile::{ControllerFamily, InteractionProfile};

/// Families always present, in listing order.
const BASE_FAMILIES: [ControllerFamily; 5] = [
    ControllerFamily::Holographic,
    ControllerFamily::IndexController,
    ControllerFamily::ViveWand,
    ControllerFamily::OculusTouch,
    ControllerFamily::KhrSimple,
];

/// Ordered profile list plus an index by canonical path.
///
/// Built once; capability-gated families are decided at construction and
/// never added or removed afterwards.
#[derive(Debug)]
pub struct ProfileRegistry {
    profiles: Vec<InteractionProfile>,
    by_path: HashMap<&'static str, usize>,
}

impl ProfileRegistry {
    pub fn new(probe: &dyn CapabilityProbe) -> Self {
        let mut families = Vec::with_capacity(BASE_FAMILIES.len() + 1);
        if probe.has_capability(Capability::HpMixedRealityController) {
            families.push(ControllerFamily::ReverbG2);
        }
        families.extend(BASE_FAMILIES);

        let profiles: Vec<InteractionProfile> =
            families.into_iter().map(ControllerFamily::build).collect();
        let by_path = profiles
            .iter()
            .enumerate()
            .map(|(i, p)| (p.path(), i))
            .collect();

        info!(
            count = profiles.len(),
            reverb_g2 = profiles.iter().any(|p| p.family() == ControllerFamily::ReverbG2),
            "built interaction profile registry"
        );
        Self { profiles, by_path }
    }

    pub fn profiles(&self) -> &[InteractionProfile] {
        &self.profiles
    }

    /// Exact lookup by canonical path. An unknown path is an internal defect
    /// and is reported as fatal.
    pub fn profile_by_path(&self, path: &str) -> VrResult<&InteractionProfile> {
        self.by_path
            .get(path)
            .map(|&i| &self.profiles[i])
            .ok_or_else(|| VrError::UnknownProfile(path.to_string()))
    }

    pub fn profile_by_family(&self, family: ControllerFamily) -> Option<&InteractionProfile> {
        self.profiles.iter().find(|p| p.family() == family)
    }
}
