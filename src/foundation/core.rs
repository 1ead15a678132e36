use crate::foundation::error::{FramekitError, FramekitResult};

pub use kurbo::{Affine, Point};

/// Side length of the square output canvas, in pixels.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CanvasSize(u32);

impl CanvasSize {
    /// HD export resolution (2048x2048).
    pub const HD: CanvasSize = CanvasSize(2048);
    /// Share export resolution (1200x1200).
    pub const SHARE: CanvasSize = CanvasSize(1200);
    /// Live preview resolution (320x320).
    pub const PREVIEW: CanvasSize = CanvasSize(320);

    pub fn new(side: u32) -> FramekitResult<Self> {
        if side == 0 {
            return Err(FramekitError::validation("canvas size must be > 0"));
        }
        Ok(Self(side))
    }

    pub fn side(self) -> u32 {
        self.0
    }

    /// Byte length of a tightly packed RGBA8 buffer at this size.
    pub fn pixel_bytes(self) -> usize {
        self.0 as usize * self.0 as usize * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_size_rejects_zero() {
        assert!(CanvasSize::new(0).is_err());
        assert_eq!(CanvasSize::new(64).unwrap().side(), 64);
    }

    #[test]
    fn standard_sizes() {
        assert_eq!(CanvasSize::HD.side(), 2048);
        assert_eq!(CanvasSize::SHARE.side(), 1200);
        assert_eq!(CanvasSize::PREVIEW.side(), 320);
        assert_eq!(CanvasSize::PREVIEW.pixel_bytes(), 320 * 320 * 4);
    }
}
