//! Pixel surfaces and the [`Painter`] that draws glyphs onto them.

use transience_core::{Color, Glyph};

use crate::font::SizedFont;
use crate::screen::Resolution;

/// Opaque black in softbuffer's `0x00RRGGBB` layout with the top byte set.
const OPAQUE: u32 = 0xFF00_0000;

/// Something pixels can be drawn into. Implementations clip every call to
/// their own bounds.
pub trait RenderTarget {
    fn size(&self) -> Resolution;

    /// Blend a solid rectangle at `alpha` (0 = invisible, 255 = opaque).
    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color, alpha: u8);

    /// Blend one pixel at `alpha`.
    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: u8);
}

// ---------------------------------------------------------------------------
// PixelCanvas
// ---------------------------------------------------------------------------

/// A CPU pixel buffer in the format softbuffer presents (`0xFFRRGGBB`).
#[derive(Clone, Debug)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelCanvas {
    /// An opaque black canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![OPAQUE; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    /// Re-allocate for a new size; contents are cleared to black.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize((width as usize) * (height as usize), OPAQUE);
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(OPAQUE | color.0);
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// The colour at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| Color(self.pixels[i] & 0x00FF_FFFF))
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            Some((y as usize) * (self.width as usize) + (x as usize))
        } else {
            None
        }
    }

    /// Copy into a presentation buffer of a possibly different size. Areas
    /// the canvas does not cover are cleared to black.
    pub fn blit_to_buffer(&self, buf: &mut [u32], buf_width: usize, buf_height: usize) {
        let src_w = self.width as usize;
        let src_h = self.height as usize;
        if buf_width > src_w || buf_height > src_h {
            buf.fill(OPAQUE);
        }
        let copy_w = src_w.min(buf_width);
        for y in 0..src_h.min(buf_height) {
            let src = y * src_w;
            let dst = y * buf_width;
            if src + copy_w <= self.pixels.len() && dst + copy_w <= buf.len() {
                buf[dst..dst + copy_w].copy_from_slice(&self.pixels[src..src + copy_w]);
            }
        }
    }
}

impl RenderTarget for PixelCanvas {
    fn size(&self) -> Resolution {
        self.resolution()
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Color, alpha: u8) {
        if alpha == 0 {
            return;
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(width as i32).min(self.width as i32);
        let y1 = y.saturating_add(height as i32).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color, alpha);
            }
        }
    }

    fn blend_pixel(&mut self, x: i32, y: i32, color: Color, alpha: u8) {
        if alpha == 0 {
            return;
        }
        if let Some(i) = self.index(x, y) {
            let under = Color(self.pixels[i] & 0x00FF_FFFF);
            self.pixels[i] = OPAQUE | under.blend(color, alpha).0;
        }
    }
}

// ---------------------------------------------------------------------------
// Painter
// ---------------------------------------------------------------------------

/// A render target paired with the font it should draw characters in.
///
/// The viewport builds one per frame and hands it to tiles and entities.
pub struct Painter<'a> {
    target: &'a mut dyn RenderTarget,
    font: &'a mut SizedFont,
    cell_size: u32,
}

impl<'a> Painter<'a> {
    pub fn new(target: &'a mut dyn RenderTarget, font: &'a mut SizedFont, cell_size: u32) -> Self {
        Self {
            target,
            font,
            cell_size,
        }
    }

    /// Pixel size of one grid cell in the current frame.
    #[inline]
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    #[inline]
    pub fn target(&mut self) -> &mut dyn RenderTarget {
        &mut *self.target
    }

    /// Draw `glyph` with its box's top-left corner at `(x, y)`.
    ///
    /// The background fills the whole box and the character is centred in
    /// it. `highlight` swaps foreground and background.
    pub fn draw_glyph(&mut self, glyph: &Glyph, x: f32, y: f32, highlight: bool) {
        let alpha = glyph.alpha_u8();
        if alpha == 0 {
            return;
        }
        let (fg, bg) = if highlight {
            (glyph.bg, glyph.fg)
        } else {
            (glyph.fg, glyph.bg)
        };
        let x0 = x.round() as i32;
        let y0 = y.round() as i32;
        self.target
            .fill_rect(x0, y0, glyph.width, glyph.height, bg, alpha);

        if glyph.ch == ' ' || glyph.ch == '\0' {
            return;
        }

        let baseline = y0
            + ((glyph.height as f32 - self.font.line_height()) / 2.0 + self.font.ascent()).round()
                as i32;
        let raster = self.font.glyph(glyph.ch);
        let left = x0 + ((glyph.width as f32 - raster.advance) / 2.0).round() as i32 + raster.xmin;
        let top = baseline - raster.ymin - raster.height as i32;

        for gy in 0..raster.height {
            for gx in 0..raster.width {
                let coverage = raster.bitmap[gy * raster.width + gx];
                if coverage == 0 {
                    continue;
                }
                let a = (coverage as u32 * alpha as u32 / 255) as u8;
                self.target
                    .blend_pixel(left + gx as i32, top + gy as i32, fg, a);
            }
        }
    }
}
