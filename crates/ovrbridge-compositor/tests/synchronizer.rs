use std::cell::RefCell;
use std::rc::Rc;

use ovrbridge_compositor::{
    ColorSpace, DxgiFormat, LayerFlags, Recti, SlotState, SubmitFlags, SwapchainDesc,
    SwapchainProvider, SwapchainSynchronizer, TextureBounds, TextureDesc, TextureDevice,
};
use ovrbridge_vr::{Eye, VrError, VrResult};

/// A texture is just its description plus an id the copies can be traced by.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FakeTexture {
    id: u32,
    desc: TextureDesc,
}

#[derive(Debug, Default)]
struct Log {
    created: Vec<(Eye, SwapchainDesc)>,
    destroyed: Vec<u32>,
    acquired: usize,
    released: usize,
    copies: Vec<(u32, u32)>,
}

struct FakeSwapchain {
    id: u32,
    desc: SwapchainDesc,
    acquired: bool,
}

struct FakeProvider {
    log: Rc<RefCell<Log>>,
    next_id: u32,
    fail_create_with: Option<i64>,
}

impl SwapchainProvider for FakeProvider {
    type Swapchain = FakeSwapchain;
    type Texture = FakeTexture;

    fn create_swapchain(&mut self, eye: Eye, desc: &SwapchainDesc) -> VrResult<FakeSwapchain> {
        if let Some(code) = self.fail_create_with {
            return Err(VrError::SwapchainCreation {
                eye: eye.index(),
                code,
            });
        }
        self.next_id += 1;
        self.log.borrow_mut().created.push((eye, *desc));
        Ok(FakeSwapchain {
            id: self.next_id,
            desc: *desc,
            acquired: false,
        })
    }

    fn destroy_swapchain(&mut self, swapchain: FakeSwapchain) {
        self.log.borrow_mut().destroyed.push(swapchain.id);
    }

    fn acquire_image(&mut self, swapchain: &mut FakeSwapchain) -> VrResult<u32> {
        if swapchain.acquired {
            return Err(VrError::swapchain_image("acquired twice"));
        }
        swapchain.acquired = true;
        self.log.borrow_mut().acquired += 1;
        Ok(0)
    }

    fn image(&self, swapchain: &FakeSwapchain, index: u32) -> VrResult<FakeTexture> {
        Ok(FakeTexture {
            id: 1000 * swapchain.id + index,
            desc: TextureDesc {
                width: swapchain.desc.width,
                height: swapchain.desc.height,
                mip_levels: swapchain.desc.mip_count,
                array_size: swapchain.desc.array_size,
                format: swapchain.desc.format,
            },
        })
    }

    fn release_image(&mut self, swapchain: &mut FakeSwapchain) -> VrResult<()> {
        swapchain.acquired = false;
        self.log.borrow_mut().released += 1;
        Ok(())
    }
}

struct FakeDevice {
    log: Rc<RefCell<Log>>,
    removed: Option<&'static str>,
}

impl TextureDevice for FakeDevice {
    type Texture = FakeTexture;

    fn describe(&self, texture: &FakeTexture) -> TextureDesc {
        texture.desc
    }

    fn copy_resource(&self, dst: &FakeTexture, src: &FakeTexture) -> VrResult<()> {
        if self.removed.is_some() {
            return Err(VrError::soft("copy failed"));
        }
        self.log.borrow_mut().copies.push((dst.id, src.id));
        Ok(())
    }

    fn removed_reason(&self) -> Option<String> {
        self.removed.map(str::to_string)
    }
}

type Synchronizer = SwapchainSynchronizer<FakeProvider, FakeDevice>;

fn synchronizer_with(
    fail_create_with: Option<i64>,
    removed: Option<&'static str>,
) -> (Synchronizer, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let provider = FakeProvider {
        log: log.clone(),
        next_id: 0,
        fail_create_with,
    };
    let device = FakeDevice {
        log: log.clone(),
        removed,
    };
    (SwapchainSynchronizer::new(provider, device), log)
}

fn synchronizer() -> (Synchronizer, Rc<RefCell<Log>>) {
    synchronizer_with(None, None)
}

fn texture(id: u32, width: u32, height: u32) -> FakeTexture {
    FakeTexture {
        id,
        desc: TextureDesc {
            width,
            height,
            mip_levels: 1,
            array_size: 1,
            format: DxgiFormat::R8G8B8A8_UNORM,
        },
    }
}

#[test]
fn test_identical_submissions_create_swapchain_once() {
    let (mut sync, log) = synchronizer();
    let tex = texture(1, 1024, 1024);

    assert_eq!(sync.slot_state(Eye::Left, &tex, ColorSpace::Auto), SlotState::Uninitialized);
    for _ in 0..2 {
        sync.invoke(Eye::Left, &tex, ColorSpace::Auto, None, SubmitFlags::empty())
            .unwrap();
    }
    assert_eq!(sync.slot_state(Eye::Left, &tex, ColorSpace::Auto), SlotState::Bound);

    let log = log.borrow();
    assert_eq!(log.created.len(), 1);
    assert!(log.destroyed.is_empty());
    assert_eq!(log.acquired, 2);
    assert_eq!(log.released, 2);
    assert_eq!(log.copies, vec![(1000, 1), (1000, 1)]);
}

#[test]
fn test_resize_recreates_swapchain() {
    let (mut sync, log) = synchronizer();
    sync.invoke(Eye::Right, &texture(1, 1024, 1024), ColorSpace::Auto, None, SubmitFlags::empty())
        .unwrap();

    let bigger = texture(2, 2048, 1024);
    assert_eq!(sync.slot_state(Eye::Right, &bigger, ColorSpace::Auto), SlotState::Stale);
    sync.invoke(Eye::Right, &bigger, ColorSpace::Auto, None, SubmitFlags::empty())
        .unwrap();

    let log = log.borrow();
    assert_eq!(log.created.len(), 2);
    assert_eq!(log.destroyed, vec![1]);
    assert_eq!(log.created[1].1.width, 2048);
    assert_eq!(sync.swapchain_desc(Eye::Right).map(|d| d.width), Some(2048));
}

#[test]
fn test_color_space_change_recreates_with_srgb() {
    let (mut sync, log) = synchronizer();
    let tex = texture(1, 512, 512);
    sync.invoke(Eye::Left, &tex, ColorSpace::Auto, None, SubmitFlags::empty())
        .unwrap();
    sync.invoke(Eye::Left, &tex, ColorSpace::Gamma, None, SubmitFlags::empty())
        .unwrap();

    let log = log.borrow();
    assert_eq!(log.created.len(), 2);
    assert_eq!(log.created[0].1.format, DxgiFormat::R8G8B8A8_UNORM);
    assert_eq!(log.created[1].1.format, DxgiFormat::R8G8B8A8_UNORM_SRGB);
}

#[test]
fn test_eyes_are_independent() {
    let (mut sync, log) = synchronizer();
    sync.invoke(Eye::Left, &texture(1, 800, 600), ColorSpace::Auto, None, SubmitFlags::empty())
        .unwrap();
    sync.invoke(Eye::Right, &texture(2, 800, 600), ColorSpace::Auto, None, SubmitFlags::empty())
        .unwrap();
    assert_eq!(log.borrow().created.len(), 2);
    assert!(sync.swapchain(Eye::Left).is_some());
    assert!(sync.swapchain(Eye::Right).is_some());
}

#[test]
fn test_flip_flag_follows_bounds() {
    let (mut sync, _log) = synchronizer();
    let tex = texture(1, 1000, 1000);
    let flipped = TextureBounds {
        u_min: 0.0,
        v_min: 0.8,
        u_max: 1.0,
        v_max: 0.2,
    };
    let layer = sync
        .invoke(Eye::Left, &tex, ColorSpace::Auto, Some(&flipped), SubmitFlags::empty())
        .unwrap();
    assert_eq!(layer.flags, LayerFlags::TEXTURE_ORIGIN_AT_BOTTOM_LEFT);
    assert_eq!(layer.viewport.y, 200);
    assert!(sync.is_flipped(Eye::Left));
    assert!(!sync.is_flipped(Eye::Right));

    let layer = sync
        .invoke(Eye::Left, &tex, ColorSpace::Auto, None, SubmitFlags::empty())
        .unwrap();
    assert_eq!(layer.flags, LayerFlags::empty());
    assert_eq!(
        layer.viewport,
        Recti {
            x: 0,
            y: 0,
            width: 1000,
            height: 1000
        }
    );
}

#[test]
fn test_creation_failure_is_fatal() {
    let (mut sync, _log) = synchronizer_with(Some(-8), None);
    let err = sync
        .invoke(Eye::Right, &texture(1, 64, 64), ColorSpace::Auto, None, SubmitFlags::empty())
        .unwrap_err();
    assert!(matches!(err, VrError::SwapchainCreation { eye: 1, code: -8 }));
    assert!(err.is_fatal());
    assert!(sync.swapchain(Eye::Right).is_none());
}

#[test]
fn test_copy_failure_reports_removal_reason() {
    let (mut sync, log) = synchronizer_with(None, Some("DXGI_ERROR_DEVICE_HUNG"));
    let err = sync
        .invoke(Eye::Left, &texture(1, 64, 64), ColorSpace::Auto, None, SubmitFlags::empty())
        .unwrap_err();
    match err {
        VrError::DeviceLost { operation, reason } => {
            assert_eq!(operation, "CopyResource");
            assert_eq!(reason, "DXGI_ERROR_DEVICE_HUNG");
        }
        other => panic!("unexpected error {other:?}"),
    }
    let log = log.borrow();
    assert!(log.copies.is_empty());
    assert_eq!(log.acquired, 1);
    assert_eq!(log.released, 1);
    assert_eq!(sync.swapchain(Eye::Left).map(|s| s.acquired), Some(false));
}

#[test]
fn test_drop_destroys_bound_swapchains() {
    let (mut sync, log) = synchronizer();
    sync.invoke(Eye::Left, &texture(1, 64, 64), ColorSpace::Auto, None, SubmitFlags::empty())
        .unwrap();
    sync.invoke(Eye::Right, &texture(2, 64, 64), ColorSpace::Auto, None, SubmitFlags::empty())
        .unwrap();
    drop(sync);

    let mut destroyed = log.borrow().destroyed.clone();
    destroyed.sort_unstable();
    assert_eq!(destroyed, vec![1, 2]);
}
