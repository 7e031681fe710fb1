//! Services the underlying runtime provides to the translation layer.
//!
//! All calls are synchronous and made from the frame-loop thread. None of
//! these traits require `Sync`; callers sharing an implementation between
//! threads must serialise access themselves.

use crate::types::{PathHandle, SpaceHandle, SpaceLocation, TrackingOrigin};
use crate::VrResult;

/// Optional hardware the runtime may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// HP Reverb G2 controllers (`XR_EXT_hp_mixed_reality_controller`).
    HpMixedRealityController,
}

pub trait CapabilityProbe {
    fn has_capability(&self, capability: Capability) -> bool;
}

impl<F: Fn(Capability) -> bool> CapabilityProbe for F {
    fn has_capability(&self, capability: Capability) -> bool {
        self(capability)
    }
}

pub trait PathResolver {
    /// Resolve a fully-qualified path string into an opaque path handle.
    fn string_to_path(&self, path: &str) -> VrResult<PathHandle>;
}

pub trait SpaceLocator {
    /// Locate `space` relative to the base space for `origin` at the best
    /// available display time.
    fn locate(&self, space: SpaceHandle, origin: TrackingOrigin) -> VrResult<SpaceLocation>;
}
