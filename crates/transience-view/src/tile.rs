//! The [`Tile`] type: one grid cell with a glyph and a visibility flag.

use transience_core::Glyph;

use crate::canvas::Painter;

/// A grid cell. Hidden tiles keep their slot but draw nothing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    glyph: Glyph,
    visible: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Self::new(Glyph::default())
    }
}

impl Tile {
    /// A visible tile showing `glyph`.
    pub const fn new(glyph: Glyph) -> Self {
        Self {
            glyph,
            visible: true,
        }
    }

    #[inline]
    pub fn glyph(&self) -> &Glyph {
        &self.glyph
    }

    #[inline]
    pub fn glyph_mut(&mut self) -> &mut Glyph {
        &mut self.glyph
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[inline]
    pub fn show(&mut self) {
        self.visible = true;
    }

    #[inline]
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Draw the glyph at pixel `(x, y)` if the tile is visible.
    pub fn render(&self, painter: &mut Painter<'_>, x: f32, y: f32, highlight: bool) {
        if self.visible {
            painter.draw_glyph(&self.glyph, x, y, highlight);
        }
    }
}
