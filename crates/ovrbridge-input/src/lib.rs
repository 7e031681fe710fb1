//! Controller input translation: interaction profiles, grip correction and
//! pose smoothing.

#![forbid(unsafe_code)]

pub mod context;
pub mod geometry;
pub mod pose;
pub mod profile;
pub mod registry;
pub mod smoothing;

pub use context::InputContext;
pub use geometry::GeometryAdjust;
pub use profile::{
    ControllerFamily, InteractionProfile, LegacyBindings, LegacyControl, LegacyControllerActions,
    PropertyValue, SuggestedBinding,
};
pub use registry::ProfileRegistry;
pub use smoothing::{FilterParams, PoseSmoother};
