//! The [`TileSet`] viewport: a grid of tiles scrolled by a camera.
//!
//! Each frame the caller runs [`update`](TileSet::update) to advance the
//! camera, then [`render`](TileSet::render). Rendering culls every row and
//! column whose pixel position falls outside
//! `[-pixels_per_tile, screen_size)`, then draws each remaining cell at
//!
//! ```text
//! index * ppt - camera * ppt + fine_offset
//! ```
//!
//! on both axes. A cell holding an entity draws the entity instead of its
//! tile.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use transience_core::{Grid, GridError, Point, Range};

use crate::Logical;
use crate::camera::FlowPosition;
use crate::canvas::{Painter, RenderTarget};
use crate::config::TileSetConfig;
use crate::entity::Entity;
use crate::font::{FontCache, FontError, FontKey};
use crate::screen::Resolution;
use crate::tile::Tile;

pub const MIN_PIXELS_PER_TILE: u32 = 8;
pub const MAX_PIXELS_PER_TILE: u32 = 128;

/// Clamp a tile size into `[MIN_PIXELS_PER_TILE, MAX_PIXELS_PER_TILE]`.
#[inline]
pub fn clamp_pixels_per_tile(ppt: u32) -> u32 {
    ppt.clamp(MIN_PIXELS_PER_TILE, MAX_PIXELS_PER_TILE)
}

/// Font size for a tile size: seven eighths of the tile.
#[inline]
fn font_px(ppt: u32) -> f32 {
    (ppt * 7 / 8) as f32
}

/// Horizontal sub-tile offset that lines tile edges up with the screen's
/// centre.
fn fine_offset_x(width: u32, ppt: u32) -> f32 {
    let mut offset = (width % ppt / 2) as i32;
    if (width / ppt) % 2 == 0 {
        offset -= (ppt / 2) as i32;
    }
    offset as f32
}

/// Vertical counterpart of [`fine_offset_x`], measured from the half
/// height. Differs from the horizontal rule by a pixel for some odd tile
/// sizes.
fn fine_offset_y(height: u32, ppt: u32) -> f32 {
    ((height / 2 % ppt) as i32 - (ppt / 2) as i32) as f32
}

/// Whether index `i` lands inside `[-ppt, screen_px)` on one axis.
#[inline]
fn axis_visible(i: i32, camera: f32, ppt: u32, fine: f32, screen_px: u32) -> bool {
    let ppt = ppt as f32;
    let px = (i as f32 - camera) * ppt + fine;
    px >= -ppt && px < screen_px as f32
}

/// A fixed-size grid of tiles drawn through a smoothly moving camera.
pub struct TileSet {
    tiles: Grid<Tile>,
    position: FlowPosition,
    pixels_per_tile: u32,
    fine_offset_x: f32,
    fine_offset_y: f32,
    pixel_perfect: Option<Resolution>,
    fonts: Rc<RefCell<FontCache>>,
    font_key: FontKey,
    font_missing: Cell<bool>,
}

impl std::fmt::Debug for TileSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileSet")
            .field("size", &self.tiles.size())
            .field("position", &self.position)
            .field("pixels_per_tile", &self.pixels_per_tile)
            .field("fine_offset", &self.fine_offset())
            .field("font_key", &self.font_key)
            .finish()
    }
}

impl TileSet {
    /// A `width x height` tile set with the default configuration.
    pub fn new(width: i32, height: i32, fonts: Rc<RefCell<FontCache>>) -> Result<Self, GridError> {
        Self::with_config(width, height, fonts, TileSetConfig::default())
    }

    /// A `width x height` tile set drawing text from `fonts`.
    ///
    /// A font that cannot be acquired is not an error: the tile set is
    /// created and renders nothing until its font exists.
    pub fn with_config(
        width: i32,
        height: i32,
        fonts: Rc<RefCell<FontCache>>,
        config: TileSetConfig,
    ) -> Result<Self, GridError> {
        let ppt = clamp_pixels_per_tile(config.pixels_per_tile);

        let mut tile = Tile::new(config.tile);
        tile.glyph_mut().set_dimensions(ppt, ppt);
        let mut tiles = Grid::new();
        tiles.set_dimensions(width, height)?;
        tiles.fill(tile);

        let font_key = FontKey::next();
        if let Err(e) = fonts.borrow_mut().acquire(font_key, font_px(ppt)) {
            log::warn!("tile set {font_key}: font unavailable, rendering disabled: {e}");
        }

        Ok(Self {
            tiles,
            position: FlowPosition::with_rate(config.follow_rate),
            pixels_per_tile: ppt,
            fine_offset_x: 0.0,
            fine_offset_y: 0.0,
            pixel_perfect: None,
            fonts,
            font_key,
            font_missing: Cell::new(false),
        })
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    #[inline]
    pub fn tiles(&self) -> &Grid<Tile> {
        &self.tiles
    }

    #[inline]
    pub fn tiles_mut(&mut self) -> &mut Grid<Tile> {
        &mut self.tiles
    }

    /// The camera controlling where this tile set is drawn.
    #[inline]
    pub fn position(&self) -> &FlowPosition {
        &self.position
    }

    #[inline]
    pub fn position_mut(&mut self) -> &mut FlowPosition {
        &mut self.position
    }

    #[inline]
    pub fn pixels_per_tile(&self) -> u32 {
        self.pixels_per_tile
    }

    #[inline]
    pub fn fine_offset(&self) -> (f32, f32) {
        (self.fine_offset_x, self.fine_offset_y)
    }

    #[inline]
    pub fn font_key(&self) -> FontKey {
        self.font_key
    }

    // -------------------------------------------------------------------
    // Tile visibility
    // -------------------------------------------------------------------

    /// Hide the tile at `p`. Out of range is ignored.
    pub fn hide_tile(&mut self, p: Point) {
        if let Some(tile) = self.tiles.try_get_mut(p) {
            tile.hide();
        }
    }

    /// Show the tile at `p`. Out of range is ignored.
    pub fn show_tile(&mut self, p: Point) {
        if let Some(tile) = self.tiles.try_get_mut(p) {
            tile.show();
        }
    }

    #[inline]
    pub fn hide_tile_at(&mut self, x: i32, y: i32) {
        self.hide_tile(Point::new(x, y));
    }

    #[inline]
    pub fn show_tile_at(&mut self, x: i32, y: i32) {
        self.show_tile(Point::new(x, y));
    }

    // -------------------------------------------------------------------
    // Camera and scale
    // -------------------------------------------------------------------

    /// Aim the camera so that `p` ends up in the middle of `screen`.
    pub fn center_on(&mut self, p: Point, screen: Resolution) {
        let half = screen.in_tiles(self.pixels_per_tile) / 2;
        self.position.set_target(p - half);
    }

    /// Recompute the fine offsets for `screen` so tile edges fall on whole
    /// pixels around the screen centre. Later tile size changes redo this
    /// for the same screen.
    pub fn set_pixel_perfect(&mut self, screen: Resolution) {
        self.fine_offset_x = fine_offset_x(screen.width, self.pixels_per_tile);
        self.fine_offset_y = fine_offset_y(screen.height, self.pixels_per_tile);
        self.pixel_perfect = Some(screen);
    }

    /// Set the tile size, clamped to `[8, 128]`, resizing every tile and
    /// this tile set's font to match. A font entry released elsewhere is
    /// acquired again.
    pub fn set_pixels_per_tile(&mut self, pixels_per_tile: u32) {
        let ppt = clamp_pixels_per_tile(pixels_per_tile);
        self.pixels_per_tile = ppt;
        self.tiles
            .for_each(|_, tile| tile.glyph_mut().set_dimensions(ppt, ppt));

        let resized = {
            let mut fonts = self.fonts.borrow_mut();
            match fonts.modify(self.font_key, font_px(ppt)) {
                Err(FontError::UnknownKey(key)) => fonts.acquire(key, font_px(ppt)),
                other => other,
            }
        };
        if let Err(e) = resized {
            log::warn!("tile set {}: font not resized: {e}", self.font_key);
        }

        if let Some(screen) = self.pixel_perfect {
            self.set_pixel_perfect(screen);
        }
    }

    /// Set the opacity of every tile, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.tiles.for_each(|_, tile| tile.glyph_mut().set_alpha(alpha));
    }

    /// Advance the camera by `elapsed_ms`. Tiles are untouched.
    pub fn update(&mut self, elapsed_ms: u32) {
        self.position.update(elapsed_ms);
    }

    // -------------------------------------------------------------------
    // Culling
    // -------------------------------------------------------------------

    pub fn is_column_visible(&self, x: i32, screen: Resolution) -> bool {
        axis_visible(
            x,
            self.position.intermediate_x(),
            self.pixels_per_tile,
            self.fine_offset_x,
            screen.width,
        )
    }

    pub fn is_row_visible(&self, y: i32, screen: Resolution) -> bool {
        axis_visible(
            y,
            self.position.intermediate_y(),
            self.pixels_per_tile,
            self.fine_offset_y,
            screen.height,
        )
    }

    /// Whether the cell at `p` passes the culling test on both axes. Cells
    /// outside the grid can pass; the test is purely positional.
    pub fn is_cell_visible(&self, p: Point, screen: Resolution) -> bool {
        self.is_row_visible(p.y, screen) && self.is_column_visible(p.x, screen)
    }

    /// The grid cells that pass the culling test, as one range.
    pub fn visible_cells(&self, screen: Resolution) -> Range {
        let band = |len: i32, visible: &dyn Fn(i32) -> bool| -> Option<(i32, i32)> {
            let first = (0..len).find(|&i| visible(i))?;
            let last = (first..len).take_while(|&i| visible(i)).last()?;
            Some((first, last + 1))
        };
        let cols = band(self.tiles.width(), &|x: i32| self.is_column_visible(x, screen));
        let rows = band(self.tiles.height(), &|y: i32| self.is_row_visible(y, screen));
        match (cols, rows) {
            (Some((x0, x1)), Some((y0, y1))) => Range::new(x0, y0, x1, y1),
            _ => Range::default(),
        }
    }

    /// Top-left pixel of the cell at `p` for the current camera position.
    pub fn screen_position(&self, p: Point) -> (f32, f32) {
        let ppt = self.pixels_per_tile as f32;
        let (cam_x, cam_y) = self.position.intermediate();
        (
            p.x as f32 * ppt - cam_x * ppt + self.fine_offset_x,
            p.y as f32 * ppt - cam_y * ppt + self.fine_offset_y,
        )
    }

    // -------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------

    /// Draw every visible cell into `target`.
    ///
    /// A cell occupied by an entity draws the first such entity in
    /// `entities` instead of its tile. Without a font nothing is drawn; the
    /// first such frame logs a warning.
    pub fn render(&self, entities: &[&dyn Entity], target: &mut dyn RenderTarget, screen: Resolution) {
        let mut fonts = self.fonts.borrow_mut();
        let Some(font) = fonts.lookup_mut(self.font_key) else {
            if !self.font_missing.replace(true) {
                log::warn!("tile set {}: no font, skipping render", self.font_key);
            }
            return;
        };
        self.font_missing.set(false);

        let mut painter = Painter::new(target, font, self.pixels_per_tile);
        for y in 0..self.tiles.height() {
            if !self.is_row_visible(y, screen) {
                continue;
            }
            for x in 0..self.tiles.width() {
                if !self.is_column_visible(x, screen) {
                    continue;
                }
                let p = Point::new(x, y);
                let (px, py) = self.screen_position(p);
                if let Some(entity) = entities.iter().find(|e| e.occupies(p)) {
                    entity.render(&mut painter, px, py, false);
                    continue;
                }
                if let Some(tile) = self.tiles.try_get(p) {
                    tile.render(&mut painter, px, py, false);
                }
            }
        }
    }
}

impl Logical for TileSet {
    fn update(&mut self, elapsed_ms: u32) {
        TileSet::update(self, elapsed_ms);
    }
}

impl Drop for TileSet {
    fn drop(&mut self) {
        match self.fonts.try_borrow_mut() {
            Ok(mut fonts) => {
                fonts.release(self.font_key);
            }
            Err(_) => log::warn!("tile set {}: font cache busy, entry leaked", self.font_key),
        }
    }
}
