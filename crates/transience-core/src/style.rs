//! Colours for glyph foregrounds and backgrounds.

/// An RGB colour packed into a `u32` (0x00RRGGBB).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Self = Self(0x000000);
    pub const WHITE: Self = Self(0xFFFFFF);
    pub const GRAY: Self = Self(0xC8C8C8);

    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Mix `self` toward `over` by `coverage` (0 = self, 255 = over).
    #[inline]
    pub fn blend(self, over: Color, coverage: u8) -> Color {
        let a = coverage as u32;
        let inv = 255 - a;
        let mix = |under: u8, top: u8| ((top as u32 * a + under as u32 * inv) / 255) as u8;
        Color::from_rgb(
            mix(self.r(), over.r()),
            mix(self.g(), over.g()),
            mix(self.b(), over.b()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_red_high() {
        let c = Color::from_rgb(0x12, 0x34, 0x56);
        assert_eq!(c.0, 0x123456);
        assert_eq!((c.r(), c.g(), c.b()), (0x12, 0x34, 0x56));
    }

    #[test]
    fn blend_endpoints_and_midpoint() {
        let under = Color::BLACK;
        let over = Color::from_rgb(200, 100, 50);
        assert_eq!(under.blend(over, 0), under);
        assert_eq!(under.blend(over, 255), over);
        assert_eq!(under.blend(over, 51), Color::from_rgb(40, 20, 10));
    }
}
