//! Per-eye layer metadata produced for each submitted frame.

use bitflags::bitflags;

bitflags! {
    /// Flags the application passes with a submitted texture.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SubmitFlags: u32 {
        const LENS_DISTORTION_ALREADY_APPLIED = 0x01;
        const GL_RENDER_BUFFER = 0x02;
        const TEXTURE_WITH_POSE = 0x08;
        const TEXTURE_WITH_DEPTH = 0x10;
        const FRAME_DISCONTINUITY = 0x20;
    }
}

bitflags! {
    /// Orientation and composition hints for the runtime.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayerFlags: u32 {
        const TEXTURE_ORIGIN_AT_BOTTOM_LEFT = 0x01;
    }
}

/// UV sub-rectangle of the submitted texture, as min/max pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureBounds {
    pub u_min: f32,
    pub v_min: f32,
    pub u_max: f32,
    pub v_max: f32,
}

impl Default for TextureBounds {
    fn default() -> Self {
        Self {
            u_min: 0.0,
            v_min: 0.0,
            u_max: 1.0,
            v_max: 1.0,
        }
    }
}

impl TextureBounds {
    /// Vertically flipped bounds have `v_min > v_max`.
    pub fn is_flipped(&self) -> bool {
        self.v_min > self.v_max
    }

    /// The same region with `v_min <= v_max`.
    pub fn unflipped(self) -> Self {
        if self.is_flipped() {
            Self {
                v_min: self.v_max,
                v_max: self.v_min,
                ..self
            }
        } else {
            self
        }
    }
}

/// Pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Recti {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EyeLayer {
    pub viewport: Recti,
    pub flags: LayerFlags,
}

/// Pixel viewport for `bounds` on a `width` x `height` texture, and whether
/// the submission was vertically flipped. No bounds means the whole texture.
pub fn compute_viewport(bounds: Option<&TextureBounds>, width: u32, height: u32) -> (Recti, bool) {
    let Some(bounds) = bounds else {
        let full = Recti {
            x: 0,
            y: 0,
            width: width as i32,
            height: height as i32,
        };
        return (full, false);
    };

    let flipped = bounds.is_flipped();
    let b = bounds.unflipped();
    let (w, h) = (width as f32, height as f32);
    // Truncates toward zero, so an extent can land one pixel short.
    let viewport = Recti {
        x: (b.u_min * w) as i32,
        y: (b.v_min * h) as i32,
        width: ((b.u_max - b.u_min) * w) as i32,
        height: ((b.v_max - b.v_min) * h) as i32,
    };
    (viewport, flipped)
}
