//! The [`Glyph`] type: the visual representation of a tile or entity.

use crate::style::Color;

/// A character drawn in a `width x height` pixel box.
///
/// `alpha` scales both the background fill and the character coverage, so a
/// glyph at `0.0` draws nothing at all.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyph {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub width: u32,
    pub height: u32,
    alpha: f32,
}

impl Glyph {
    /// A fully opaque 32x32 glyph.
    pub const fn new(ch: char, fg: Color, bg: Color) -> Self {
        Self {
            ch,
            fg,
            bg,
            width: 32,
            height: 32,
            alpha: 1.0,
        }
    }

    #[inline]
    pub const fn with_char(mut self, ch: char) -> Self {
        self.ch = ch;
        self
    }

    #[inline]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    pub fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Set the opacity, clamped to `[0, 1]`. NaN counts as transparent.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
    }

    /// The opacity as a byte, for pixel blending.
    #[inline]
    pub fn alpha_u8(&self) -> u8 {
        (self.alpha * 255.0).round() as u8
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::new(' ', Color::GRAY, Color::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_dimensions() {
        let mut g = Glyph::default().with_char('#').with_fg(Color::WHITE);
        g.set_dimensions(16, 24);
        assert_eq!(g.ch, '#');
        assert_eq!(g.fg, Color::WHITE);
        assert_eq!((g.width, g.height), (16, 24));
    }

    #[test]
    fn alpha_is_clamped() {
        let mut g = Glyph::default();
        g.set_alpha(1.7);
        assert_eq!(g.alpha(), 1.0);
        g.set_alpha(-3.0);
        assert_eq!(g.alpha(), 0.0);
        g.set_alpha(f32::NAN);
        assert_eq!(g.alpha(), 0.0);
        g.set_alpha(0.5);
        assert_eq!(g.alpha_u8(), 128);
    }
}
