//! **transience-view**: a scrolling tile viewport.
//!
//! A [`TileSet`] owns a fixed [`Grid`](transience_core::Grid) of [`Tile`]s
//! and a [`FlowPosition`] camera that eases toward its target every frame.
//! Rendering culls rows and columns outside the screen and draws the rest
//! into any [`RenderTarget`], letting [`Entity`] values on a cell take the
//! place of its tile.
//!
//! Uses:
//! - [`fontdue`] for glyph rasterization, through a shared [`FontCache`]
//! - [`log`] for degraded-state warnings

pub mod camera;
pub mod canvas;
pub mod config;
pub mod entity;
pub mod font;
pub mod screen;
pub mod tile;
pub mod viewport;

pub use camera::FlowPosition;
pub use canvas::{Painter, PixelCanvas, RenderTarget};
pub use config::TileSetConfig;
pub use entity::{Entity, Sprite};
pub use font::{FontCache, FontError, FontKey};
pub use screen::Resolution;
pub use tile::Tile;
pub use viewport::{MAX_PIXELS_PER_TILE, MIN_PIXELS_PER_TILE, TileSet};

/// Anything advanced once per frame by the elapsed time.
pub trait Logical {
    fn update(&mut self, elapsed_ms: u32);
}
