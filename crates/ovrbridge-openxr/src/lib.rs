//! OpenXR implementations of the runtime services the bridge consumes.

pub mod common;

#[cfg(target_os = "windows")]
pub mod d3d11;

pub use common::{
    bind_legacy_profiles, install_legacy_bindings, suggest_legacy_bindings, to_pose,
    LegacyActionSet, OpenXrCapabilities, OpenXrPaths, OpenXrSpaces,
};
