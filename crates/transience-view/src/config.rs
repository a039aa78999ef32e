//! Construction-time settings for a [`TileSet`](crate::TileSet).

use transience_core::Glyph;

use crate::camera::DEFAULT_FOLLOW_RATE;

/// Configuration for creating a [`TileSet`](crate::TileSet).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TileSetConfig {
    /// Pixel width and height of one tile; clamped to the supported range.
    pub pixels_per_tile: u32,
    /// Camera easing rate, per second.
    pub follow_rate: f32,
    /// Glyph every tile starts with.
    pub tile: Glyph,
}

impl Default for TileSetConfig {
    fn default() -> Self {
        Self {
            pixels_per_tile: 32,
            follow_rate: DEFAULT_FOLLOW_RATE,
            tile: Glyph::default(),
        }
    }
}
