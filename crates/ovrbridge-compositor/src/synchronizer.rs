//! Keeps one runtime swapchain per eye in step with the application's
//! submitted textures.
//!
//! Each submission is checked against the swapchain the eye already has. A
//! mismatch in size, mip count or effective format destroys the swapchain
//! and creates a new one, since the runtime cannot resize in place. The
//! texture is then copied whole into the acquired image and released.
//!
//! Everything here runs on the frame-loop thread; there is no internal
//! locking.

use ovrbridge_vr::{Eye, VrError, VrResult};
use tracing::{debug, info, warn};

use crate::format::{resolve_swapchain_format, ColorSpace, DxgiFormat};
use crate::layer::{compute_viewport, EyeLayer, LayerFlags, SubmitFlags, TextureBounds};

/// Shape and format of an application texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub array_size: u32,
    pub format: DxgiFormat,
}

/// Parameters a swapchain was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapchainDesc {
    pub width: u32,
    pub height: u32,
    pub mip_count: u32,
    pub array_size: u32,
    pub sample_count: u32,
    pub format: DxgiFormat,
    pub auto_generate_mips: bool,
}

impl SwapchainDesc {
    /// Descriptor for a swapchain that can hold a full copy of `src`.
    pub fn for_source(src: &TextureDesc, color_space: ColorSpace) -> Self {
        Self {
            width: src.width,
            height: src.height,
            mip_count: src.mip_levels,
            array_size: 1,
            sample_count: 1,
            format: resolve_swapchain_format(src.format, color_space),
            auto_generate_mips: true,
        }
    }
}

/// Graphics device the application's textures live on.
pub trait TextureDevice {
    type Texture;

    fn describe(&self, texture: &Self::Texture) -> TextureDesc;

    /// Copy every subresource of `src` into `dst`.
    fn copy_resource(&self, dst: &Self::Texture, src: &Self::Texture) -> VrResult<()>;

    /// Why the device was removed, if it was.
    fn removed_reason(&self) -> Option<String>;
}

/// Runtime swapchain management in the explicit acquire/release model.
pub trait SwapchainProvider {
    type Swapchain;
    type Texture;

    /// Failure must be reported as [`VrError::SwapchainCreation`].
    fn create_swapchain(&mut self, eye: Eye, desc: &SwapchainDesc) -> VrResult<Self::Swapchain>;

    fn destroy_swapchain(&mut self, swapchain: Self::Swapchain);

    /// Acquire and wait for the next writable image, returning its index.
    fn acquire_image(&mut self, swapchain: &mut Self::Swapchain) -> VrResult<u32>;

    fn image(&self, swapchain: &Self::Swapchain, index: u32) -> VrResult<Self::Texture>;

    fn release_image(&mut self, swapchain: &mut Self::Swapchain) -> VrResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No swapchain has been created for this eye yet.
    Uninitialized,
    /// The swapchain matches the last submitted texture.
    Bound,
    /// The last submitted texture no longer fits the swapchain.
    Stale,
}

struct SwapchainSlot<S> {
    handle: Option<S>,
    desc: Option<SwapchainDesc>,
    flipped: bool,
}

impl<S> Default for SwapchainSlot<S> {
    fn default() -> Self {
        Self {
            handle: None,
            desc: None,
            flipped: false,
        }
    }
}

/// Whether a swapchain created as `chain` can take a copy of `src`.
///
/// Every mismatching field is logged.
pub fn check_chain_compatible(
    src: &TextureDesc,
    chain: &SwapchainDesc,
    color_space: ColorSpace,
) -> bool {
    let mut usable = true;
    let mut check = |field: &str, matches: bool| {
        if !matches {
            debug!(field, "resource mismatch");
            usable = false;
        }
    };

    check("width", src.width == chain.width);
    check("height", src.height == chain.height);
    check("mip_levels", src.mip_levels == chain.mip_count);
    check(
        "format",
        resolve_swapchain_format(src.format, color_space) == chain.format,
    );
    usable
}

pub struct SwapchainSynchronizer<P, D>
where
    P: SwapchainProvider,
    D: TextureDevice<Texture = P::Texture>,
{
    provider: P,
    device: D,
    slots: [SwapchainSlot<P::Swapchain>; 2],
}

impl<P, D> SwapchainSynchronizer<P, D>
where
    P: SwapchainProvider,
    D: TextureDevice<Texture = P::Texture>,
{
    pub fn new(provider: P, device: D) -> Self {
        Self {
            provider,
            device,
            slots: [SwapchainSlot::default(), SwapchainSlot::default()],
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn swapchain(&self, eye: Eye) -> Option<&P::Swapchain> {
        self.slots[eye.index()].handle.as_ref()
    }

    pub fn swapchain_desc(&self, eye: Eye) -> Option<&SwapchainDesc> {
        self.slots[eye.index()].desc.as_ref()
    }

    /// State of `eye`'s slot with respect to `texture`.
    pub fn slot_state(&self, eye: Eye, texture: &D::Texture, color_space: ColorSpace) -> SlotState {
        let slot = &self.slots[eye.index()];
        match (&slot.handle, &slot.desc) {
            (Some(_), Some(desc)) => {
                let src = self.device.describe(texture);
                if check_chain_compatible(&src, desc, color_space) {
                    SlotState::Bound
                } else {
                    SlotState::Stale
                }
            }
            _ => SlotState::Uninitialized,
        }
    }

    pub fn is_flipped(&self, eye: Eye) -> bool {
        self.slots[eye.index()].flipped
    }

    pub fn layer_flags(&self, eye: Eye) -> LayerFlags {
        if self.is_flipped(eye) {
            LayerFlags::TEXTURE_ORIGIN_AT_BOTTOM_LEFT
        } else {
            LayerFlags::empty()
        }
    }

    /// Push one eye's submitted texture into its swapchain.
    ///
    /// Returns the viewport and orientation flags for the eye's layer. Every
    /// error returned is fatal.
    pub fn invoke(
        &mut self,
        eye: Eye,
        texture: &D::Texture,
        color_space: ColorSpace,
        bounds: Option<&TextureBounds>,
        submit_flags: SubmitFlags,
    ) -> VrResult<EyeLayer> {
        let extended = SubmitFlags::TEXTURE_WITH_POSE | SubmitFlags::TEXTURE_WITH_DEPTH;
        if submit_flags.intersects(extended) {
            debug!(?eye, ?submit_flags, "ignoring extended submit data");
        }

        let src = self.device.describe(texture);
        self.ensure_swapchain(eye, &src, color_space)?;

        let slot = &mut self.slots[eye.index()];
        let Some(swapchain) = slot.handle.as_mut() else {
            return Err(VrError::swapchain_image(format!("no swapchain bound for {eye:?}")));
        };

        let index = self.provider.acquire_image(swapchain)?;
        let image = self.provider.image(swapchain, index)?;
        let copied = self.device.copy_resource(&image, texture);
        let released = self.provider.release_image(swapchain);
        if let Err(err) = copied {
            if let Err(release_err) = released {
                warn!(?eye, error = %release_err, "release after failed copy");
            }
            let reason = self
                .device
                .removed_reason()
                .unwrap_or_else(|| err.to_string());
            return Err(VrError::DeviceLost {
                operation: "CopyResource".to_string(),
                reason,
            });
        }
        released?;

        let (viewport, flipped) = compute_viewport(bounds, src.width, src.height);
        slot.flipped = flipped;

        Ok(EyeLayer {
            viewport,
            flags: self.layer_flags(eye),
        })
    }

    fn ensure_swapchain(
        &mut self,
        eye: Eye,
        src: &TextureDesc,
        color_space: ColorSpace,
    ) -> VrResult<()> {
        let slot = &mut self.slots[eye.index()];
        let usable = match (&slot.handle, &slot.desc) {
            (Some(_), Some(desc)) => check_chain_compatible(src, desc, color_space),
            _ => false,
        };
        if usable {
            return Ok(());
        }

        if let Some(old) = slot.handle.take() {
            self.provider.destroy_swapchain(old);
        }
        slot.desc = None;

        let desc = SwapchainDesc::for_source(src, color_space);
        info!(
            ?eye,
            width = desc.width,
            height = desc.height,
            mips = desc.mip_count,
            format = ?desc.format,
            "creating swapchain"
        );
        let handle = self.provider.create_swapchain(eye, &desc)?;
        slot.handle = Some(handle);
        slot.desc = Some(desc);
        Ok(())
    }
}

impl<P, D> Drop for SwapchainSynchronizer<P, D>
where
    P: SwapchainProvider,
    D: TextureDevice<Texture = P::Texture>,
{
    fn drop(&mut self) {
        for slot in &mut self.slots {
            if let Some(handle) = slot.handle.take() {
                self.provider.destroy_swapchain(handle);
            }
        }
    }
}
