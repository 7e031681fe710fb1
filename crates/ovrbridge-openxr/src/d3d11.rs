//! Direct3D 11 swapchain provider and texture device.

use std::ffi::c_void;

use openxr as xr;
use ovrbridge_compositor::{
    DxgiFormat, SwapchainDesc, SwapchainProvider, TextureDesc, TextureDevice,
};
use ovrbridge_vr::{Eye, VrError, VrResult};
use tracing::debug;

use windows::core::Interface;
use windows::Win32::Graphics::Direct3D11::{
    ID3D11Device, ID3D11DeviceContext, ID3D11Texture2D, D3D11_TEXTURE2D_DESC,
};

/// The device and immediate context the application renders with.
pub struct D3d11Device {
    device: ID3D11Device,
    context: ID3D11DeviceContext,
}

impl D3d11Device {
    /// Take the device from one of the application's textures.
    pub fn from_texture(texture: &ID3D11Texture2D) -> VrResult<Self> {
        let device = unsafe { texture.GetDevice() }
            .map_err(|e| VrError::swapchain_image(format!("D3D11 GetDevice: {e:?}")))?;
        let context = unsafe { device.GetImmediateContext() }
            .map_err(|e| VrError::swapchain_image(format!("D3D11 GetImmediateContext: {e:?}")))?;
        Ok(Self { device, context })
    }

    pub fn device(&self) -> &ID3D11Device {
        &self.device
    }
}

impl TextureDevice for D3d11Device {
    type Texture = ID3D11Texture2D;

    fn describe(&self, texture: &ID3D11Texture2D) -> TextureDesc {
        let mut desc = D3D11_TEXTURE2D_DESC::default();
        unsafe { texture.GetDesc(&mut desc) };
        TextureDesc {
            width: desc.Width,
            height: desc.Height,
            mip_levels: desc.MipLevels,
            array_size: desc.ArraySize,
            format: DxgiFormat(desc.Format.0 as u32),
        }
    }

    fn copy_resource(&self, dst: &ID3D11Texture2D, src: &ID3D11Texture2D) -> VrResult<()> {
        unsafe { self.context.CopyResource(dst, src) };
        // CopyResource reports nothing; a removed device is the only failure.
        match self.removed_reason() {
            Some(reason) => Err(VrError::swapchain_image(reason)),
            None => Ok(()),
        }
    }

    fn removed_reason(&self) -> Option<String> {
        unsafe { self.device.GetDeviceRemovedReason() }
            .err()
            .map(|e| format!("{e:?}"))
    }
}

pub struct D3d11Swapchain {
    swapchain: xr::Swapchain<xr::D3D11>,
    images: Vec<ID3D11Texture2D>,
}

/// Creates per-eye swapchains on an OpenXR D3D11 session.
pub struct D3d11SwapchainProvider {
    session: xr::Session<xr::D3D11>,
}

impl D3d11SwapchainProvider {
    pub fn new(session: xr::Session<xr::D3D11>) -> Self {
        Self { session }
    }
}

impl SwapchainProvider for D3d11SwapchainProvider {
    type Swapchain = D3d11Swapchain;
    type Texture = ID3D11Texture2D;

    fn create_swapchain(&mut self, eye: Eye, desc: &SwapchainDesc) -> VrResult<D3d11Swapchain> {
        let create_info = xr::SwapchainCreateInfo {
            create_flags: xr::SwapchainCreateFlags::EMPTY,
            usage_flags: xr::SwapchainUsageFlags::COLOR_ATTACHMENT
                | xr::SwapchainUsageFlags::TRANSFER_DST
                | xr::SwapchainUsageFlags::SAMPLED,
            format: desc.format.0,
            sample_count: desc.sample_count,
            width: desc.width,
            height: desc.height,
            face_count: 1,
            array_size: desc.array_size,
            mip_count: desc.mip_count,
        };
        let failed = |e: xr::sys::Result| VrError::SwapchainCreation {
            eye: eye.index(),
            code: i64::from(e.into_raw()),
        };

        let swapchain = self.session.create_swapchain(&create_info).map_err(failed)?;
        let images = swapchain
            .enumerate_images()
            .map_err(failed)?
            .into_iter()
            .filter_map(|raw| {
                let raw = raw as *mut c_void;
                unsafe { ID3D11Texture2D::from_raw_borrowed(&raw) }.cloned()
            })
            .collect::<Vec<_>>();
        debug!(?eye, images = images.len(), "enumerated swapchain images");
        Ok(D3d11Swapchain { swapchain, images })
    }

    fn destroy_swapchain(&mut self, swapchain: D3d11Swapchain) {
        drop(swapchain);
    }

    fn acquire_image(&mut self, swapchain: &mut D3d11Swapchain) -> VrResult<u32> {
        let index = swapchain
            .swapchain
            .acquire_image()
            .map_err(|e| VrError::swapchain_image(format!("OpenXR acquire: {e:?}")))?;
        swapchain
            .swapchain
            .wait_image(xr::Duration::INFINITE)
            .map_err(|e| VrError::swapchain_image(format!("OpenXR wait_image: {e:?}")))?;
        Ok(index)
    }

    fn image(&self, swapchain: &D3d11Swapchain, index: u32) -> VrResult<ID3D11Texture2D> {
        swapchain
            .images
            .get(index as usize)
            .cloned()
            .ok_or_else(|| VrError::swapchain_image(format!("no swapchain image {index}")))
    }

    fn release_image(&mut self, swapchain: &mut D3d11Swapchain) -> VrResult<()> {
        swapchain
            .swapchain
            .release_image()
            .map_err(|e| VrError::swapchain_image(format!("OpenXR release: {e:?}")))
    }
}
