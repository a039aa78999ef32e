//! The screen the viewport draws into.

use transience_core::Point;

/// Screen size in pixels.
///
/// Passed explicitly to every viewport operation that depends on the
/// current resolution (centering, pixel-perfect alignment, culling).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// How many whole tiles of `pixels_per_tile` fit on each axis.
    #[inline]
    pub fn in_tiles(self, pixels_per_tile: u32) -> Point {
        let ppt = pixels_per_tile.max(1);
        Point::new((self.width / ppt) as i32, (self.height / ppt) as i32)
    }
}
