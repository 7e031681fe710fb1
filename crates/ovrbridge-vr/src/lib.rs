#![forbid(unsafe_code)]

pub mod runtime;
pub mod types;

pub use ovrbridge_common::{VrError, VrResult};
pub use runtime::{Capability, CapabilityProbe, PathResolver, SpaceLocator};
pub use types::{
    ActionHandle, Eye, Hand, HmdMatrix34, PathHandle, Pose, PoseVelocity, SpaceHandle,
    SpaceLocation, TrackedDevicePose, TrackedProperty, TrackingOrigin, TrackingResult,
};
