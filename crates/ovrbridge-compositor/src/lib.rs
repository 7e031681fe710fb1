//! Submission side of the bridge: per-eye swapchains fed from application
//! textures, format negotiation and layer metadata.

#![forbid(unsafe_code)]

pub mod format;
pub mod layer;
pub mod synchronizer;

pub use format::{resolve_swapchain_format, ColorSpace, DxgiFormat};
pub use layer::{compute_viewport, EyeLayer, LayerFlags, Recti, SubmitFlags, TextureBounds};
pub use synchronizer::{
    check_chain_compatible, SlotState, SwapchainDesc, SwapchainProvider, SwapchainSynchronizer,
    TextureDesc, TextureDevice,
};
