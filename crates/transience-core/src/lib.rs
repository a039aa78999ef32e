//! **transience-core**: data types for a scrolling tile viewport.
//!
//! This crate holds everything that does not touch pixels: grid-space
//! geometry, the fixed-size row-major [`Grid`] container, colours and the
//! [`Glyph`] representation drawn for every tile.

pub mod error;
pub mod geom;
pub mod glyph;
pub mod grid;
pub mod style;

pub use error::GridError;
pub use geom::{Point, Range};
pub use glyph::Glyph;
pub use grid::Grid;
pub use style::Color;
