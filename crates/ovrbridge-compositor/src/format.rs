//! Source texture format to swapchain format negotiation.

use std::fmt;

/// A raw `DXGI_FORMAT` value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DxgiFormat(pub u32);

impl DxgiFormat {
    pub const UNKNOWN: Self = Self(0);
    pub const R16G16B16A16_FLOAT: Self = Self(10);
    pub const R11G11B10_FLOAT: Self = Self(26);
    pub const R8G8B8A8_TYPELESS: Self = Self(27);
    pub const R8G8B8A8_UNORM: Self = Self(28);
    pub const R8G8B8A8_UNORM_SRGB: Self = Self(29);
    pub const B5G6R5_UNORM: Self = Self(85);
    pub const B5G5R5A1_UNORM: Self = Self(86);
    pub const B8G8R8A8_UNORM: Self = Self(87);
    pub const B8G8R8X8_UNORM: Self = Self(88);
    pub const B8G8R8A8_UNORM_SRGB: Self = Self(91);
    pub const B8G8R8X8_UNORM_SRGB: Self = Self(93);
    pub const B4G4R4A4_UNORM: Self = Self(115);

    pub fn name(self) -> Option<&'static str> {
        Some(match self {
            Self::UNKNOWN => "UNKNOWN",
            Self::R16G16B16A16_FLOAT => "R16G16B16A16_FLOAT",
            Self::R11G11B10_FLOAT => "R11G11B10_FLOAT",
            Self::R8G8B8A8_TYPELESS => "R8G8B8A8_TYPELESS",
            Self::R8G8B8A8_UNORM => "R8G8B8A8_UNORM",
            Self::R8G8B8A8_UNORM_SRGB => "R8G8B8A8_UNORM_SRGB",
            Self::B5G6R5_UNORM => "B5G6R5_UNORM",
            Self::B5G5R5A1_UNORM => "B5G5R5A1_UNORM",
            Self::B8G8R8A8_UNORM => "B8G8R8A8_UNORM",
            Self::B8G8R8X8_UNORM => "B8G8R8X8_UNORM",
            Self::B8G8R8A8_UNORM_SRGB => "B8G8R8A8_UNORM_SRGB",
            Self::B8G8R8X8_UNORM_SRGB => "B8G8R8X8_UNORM_SRGB",
            Self::B4G4R4A4_UNORM => "B4G4R4A4_UNORM",
            _ => return None,
        })
    }

    pub fn is_srgb(self) -> bool {
        matches!(
            self,
            Self::R8G8B8A8_UNORM_SRGB | Self::B8G8R8A8_UNORM_SRGB | Self::B8G8R8X8_UNORM_SRGB
        )
    }
}

impl fmt::Debug for DxgiFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "DXGI_FORMAT_{name}"),
            None => write!(f, "DXGI_FORMAT({})", self.0),
        }
    }
}

/// Colour space the application tagged its texture with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    #[default]
    Auto,
    Gamma,
    Linear,
}

/// Pick the swapchain format for a source texture.
///
/// Formats with an sRGB twin resolve to the sRGB variant whenever the
/// application set an explicit colour space, and to the linear one for
/// `Auto`. Anything not in the table resolves to [`DxgiFormat::UNKNOWN`].
pub fn resolve_swapchain_format(source: DxgiFormat, color_space: ColorSpace) -> DxgiFormat {
    let use_srgb = color_space != ColorSpace::Auto;
    let pick = |linear, srgb| if use_srgb { srgb } else { linear };

    match source {
        DxgiFormat::B5G6R5_UNORM
        | DxgiFormat::B5G5R5A1_UNORM
        | DxgiFormat::B4G4R4A4_UNORM
        | DxgiFormat::R16G16B16A16_FLOAT
        | DxgiFormat::R11G11B10_FLOAT => source,

        DxgiFormat::R8G8B8A8_UNORM
        | DxgiFormat::R8G8B8A8_UNORM_SRGB
        | DxgiFormat::R8G8B8A8_TYPELESS => {
            pick(DxgiFormat::R8G8B8A8_UNORM, DxgiFormat::R8G8B8A8_UNORM_SRGB)
        }
        DxgiFormat::B8G8R8A8_UNORM | DxgiFormat::B8G8R8A8_UNORM_SRGB => {
            pick(DxgiFormat::B8G8R8A8_UNORM, DxgiFormat::B8G8R8A8_UNORM_SRGB)
        }
        DxgiFormat::B8G8R8X8_UNORM | DxgiFormat::B8G8R8X8_UNORM_SRGB => {
            pick(DxgiFormat::B8G8R8X8_UNORM, DxgiFormat::B8G8R8X8_UNORM_SRGB)
        }

        _ => DxgiFormat::UNKNOWN,
    }
}
