//! Things drawn on top of the grid.

use transience_core::{Glyph, Point};

use crate::canvas::Painter;

/// Anything that sits on a grid cell and draws itself there.
///
/// An entity occupies exactly the cell at [`position`](Entity::position).
/// When it shares a cell with a tile, the viewport draws the entity instead
/// of the tile.
pub trait Entity {
    fn position(&self) -> Point;

    /// Whether this entity stands on `p`.
    fn occupies(&self, p: Point) -> bool {
        self.position() == p
    }

    /// Draw at pixel `(x, y)`, the top-left corner of the occupied cell.
    fn render(&self, painter: &mut Painter<'_>, x: f32, y: f32, highlight: bool);
}

/// A single glyph standing on a cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub pos: Point,
    pub glyph: Glyph,
}

impl Sprite {
    pub const fn new(pos: Point, glyph: Glyph) -> Self {
        Self { pos, glyph }
    }
}

impl Entity for Sprite {
    fn position(&self) -> Point {
        self.pos
    }

    /// The glyph is sized to the painter's cell, whatever its own box.
    fn render(&self, painter: &mut Painter<'_>, x: f32, y: f32, highlight: bool) {
        let mut glyph = self.glyph;
        let cell = painter.cell_size();
        glyph.set_dimensions(cell, cell);
        painter.draw_glyph(&glyph, x, y, highlight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PixelCanvas;
    use crate::font::{FontCache, FontKey};
    use transience_core::Color;

    #[test]
    fn sprite_fills_the_painter_cell() {
        let mut cache = FontCache::bundled().unwrap();
        let key = FontKey::next();
        cache.acquire(key, 7.0).unwrap();
        let font = cache.lookup_mut(key).unwrap();

        let bg = Color::from_rgb(9, 9, 9);
        let sprite = Sprite::new(Point::new(4, 4), Glyph::new(' ', Color::WHITE, bg));
        assert_eq!(sprite.position(), Point::new(4, 4));
        assert!(sprite.occupies(Point::new(4, 4)));
        assert!(!sprite.occupies(Point::new(4, 5)));

        let mut canvas = PixelCanvas::new(16, 16);
        let mut painter = Painter::new(&mut canvas, font, 8);
        sprite.render(&mut painter, 8.0, 8.0, false);

        assert_eq!(canvas.pixel(8, 8), Some(bg));
        assert_eq!(canvas.pixel(15, 15), Some(bg));
        assert_eq!(canvas.pixel(7, 7), Some(Color::BLACK));
    }
}
