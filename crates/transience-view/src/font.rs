//! Per-viewport font resources.
//!
//! A [`FontCache`] parses one TrueType face with [`fontdue`] and hands out
//! sized entries keyed by [`FontKey`]. Each viewport owns one key: it
//! acquires the entry when it is created, resizes it in place when its tile
//! size changes and releases it when it is dropped. Looking up a key that
//! has no entry is a normal, degraded state rather than an error.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use fontdue::{Font, FontSettings};

/// DejaVu Sans Mono, see `assets/LICENSE-DejaVu.txt`.
const BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FontError {
    #[error("invalid font data: {0}")]
    InvalidFont(&'static str),
    #[error("font cache has no face loaded")]
    NoFace,
    #[error("no font entry for {0}")]
    UnknownKey(FontKey),
    #[error("invalid font size {0}")]
    InvalidSize(f32),
}

// ---------------------------------------------------------------------------
// FontKey
// ---------------------------------------------------------------------------

/// A process-unique handle naming one sized font entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontKey(u64);

impl FontKey {
    /// Allocate a fresh key. Keys are never reused.
    #[allow(clippy::should_implement_trait)]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FontKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// SizedFont
// ---------------------------------------------------------------------------

/// A rasterized character: coverage bitmap plus placement metrics.
#[derive(Clone, Debug)]
pub struct RasterGlyph {
    /// Coverage values, `width * height`, row-major, top row first.
    pub bitmap: Vec<u8>,
    pub width: usize,
    pub height: usize,
    pub xmin: i32,
    pub ymin: i32,
    pub advance: f32,
}

/// The face at one pixel size, with its rasterized glyphs cached.
pub struct SizedFont {
    face: Rc<Font>,
    px: f32,
    ascent: f32,
    descent: f32,
    glyphs: HashMap<char, RasterGlyph>,
}

impl fmt::Debug for SizedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SizedFont")
            .field("px", &self.px)
            .field("cached_glyphs", &self.glyphs.len())
            .finish()
    }
}

impl SizedFont {
    fn new(face: Rc<Font>, px: f32) -> Self {
        let (ascent, descent) = face
            .horizontal_line_metrics(px)
            .map(|m| (m.ascent, m.descent))
            .unwrap_or((px * 0.8, -(px * 0.2)));
        Self {
            face,
            px,
            ascent,
            descent,
            glyphs: HashMap::new(),
        }
    }

    #[inline]
    pub fn px(&self) -> f32 {
        self.px
    }

    #[inline]
    pub fn ascent(&self) -> f32 {
        self.ascent
    }

    /// Ascent minus descent.
    #[inline]
    pub fn line_height(&self) -> f32 {
        self.ascent - self.descent
    }

    /// The rasterized `ch`, rendering it on first use.
    pub fn glyph(&mut self, ch: char) -> &RasterGlyph {
        let face = &self.face;
        let px = self.px;
        self.glyphs.entry(ch).or_insert_with(|| {
            let (metrics, bitmap) = face.rasterize(ch, px);
            RasterGlyph {
                bitmap,
                width: metrics.width,
                height: metrics.height,
                xmin: metrics.xmin,
                ymin: metrics.ymin,
                advance: metrics.advance_width,
            }
        })
    }

    pub fn cached_glyphs(&self) -> usize {
        self.glyphs.len()
    }
}

// ---------------------------------------------------------------------------
// FontCache
// ---------------------------------------------------------------------------

/// Sized font entries keyed by [`FontKey`], all sharing one face.
#[derive(Default)]
pub struct FontCache {
    face: Option<Rc<Font>>,
    entries: HashMap<FontKey, SizedFont>,
}

impl fmt::Debug for FontCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontCache")
            .field("has_face", &self.face.is_some())
            .field("entries", &self.entries)
            .finish()
    }
}

impl FontCache {
    /// Parse `font_data` (TTF/OTF) as the face for every entry.
    pub fn new(font_data: &[u8]) -> Result<Self, FontError> {
        let face = Font::from_bytes(font_data, FontSettings::default())
            .map_err(FontError::InvalidFont)?;
        Ok(Self {
            face: Some(Rc::new(face)),
            entries: HashMap::new(),
        })
    }

    /// A cache using the bundled monospace face.
    pub fn bundled() -> Result<Self, FontError> {
        Self::new(BUNDLED_FONT)
    }

    /// A cache with no face: every [`acquire`](FontCache::acquire) fails
    /// and every lookup misses.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Create (or replace) the entry for `key` at `px` pixels.
    pub fn acquire(&mut self, key: FontKey, px: f32) -> Result<(), FontError> {
        check_size(px)?;
        let face = self.face.clone().ok_or(FontError::NoFace)?;
        log::debug!("acquire {key} at {px}px");
        self.entries.insert(key, SizedFont::new(face, px));
        Ok(())
    }

    pub fn lookup(&self, key: FontKey) -> Option<&SizedFont> {
        self.entries.get(&key)
    }

    pub fn lookup_mut(&mut self, key: FontKey) -> Option<&mut SizedFont> {
        self.entries.get_mut(&key)
    }

    /// Resize an existing entry, dropping its rasterized glyphs.
    pub fn modify(&mut self, key: FontKey, px: f32) -> Result<(), FontError> {
        check_size(px)?;
        let entry = self
            .entries
            .get_mut(&key)
            .ok_or(FontError::UnknownKey(key))?;
        if entry.px != px {
            log::debug!("resize {key} {}px -> {px}px", entry.px);
            *entry = SizedFont::new(Rc::clone(&entry.face), px);
        }
        Ok(())
    }

    /// Drop the entry for `key`. Returns whether one existed.
    pub fn release(&mut self, key: FontKey) -> bool {
        let found = self.entries.remove(&key).is_some();
        if found {
            log::debug!("release {key}");
        }
        found
    }

    pub fn has_face(&self) -> bool {
        self.face.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_size(px: f32) -> Result<(), FontError> {
    if px.is_finite() && px > 0.0 {
        Ok(())
    } else {
        Err(FontError::InvalidSize(px))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique() {
        let a = FontKey::next();
        let b = FontKey::next();
        assert_ne!(a, b);
        assert!(b.id() > a.id());
        assert_eq!(format!("{}", FontKey(7)), "font#7");
    }

    #[test]
    fn invalid_bytes_are_rejected() {
        assert!(matches!(
            FontCache::new(b"not a font"),
            Err(FontError::InvalidFont(_))
        ));
    }

    #[test]
    fn acquire_lookup_release() {
        let mut cache = FontCache::bundled().unwrap();
        let key = FontKey::next();
        assert!(cache.lookup(key).is_none());
        cache.acquire(key, 28.0).unwrap();
        assert_eq!(cache.lookup(key).map(SizedFont::px), Some(28.0));
        assert!(cache.release(key));
        assert!(!cache.release(key));
        assert!(cache.is_empty());
    }

    #[test]
    fn acquire_twice_replaces() {
        let mut cache = FontCache::bundled().unwrap();
        let key = FontKey::next();
        cache.acquire(key, 14.0).unwrap();
        cache.acquire(key, 21.0).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup(key).unwrap().px(), 21.0);
    }

    #[test]
    fn modify_resizes_in_place() {
        let mut cache = FontCache::bundled().unwrap();
        let key = FontKey::next();
        cache.acquire(key, 14.0).unwrap();
        cache.lookup_mut(key).unwrap().glyph('@');
        assert_eq!(cache.lookup(key).unwrap().cached_glyphs(), 1);

        cache.modify(key, 56.0).unwrap();
        assert_eq!(cache.len(), 1);
        let entry = cache.lookup(key).unwrap();
        assert_eq!(entry.px(), 56.0);
        assert_eq!(entry.cached_glyphs(), 0);
    }

    #[test]
    fn modify_unknown_key_fails() {
        let mut cache = FontCache::bundled().unwrap();
        let key = FontKey::next();
        assert_eq!(cache.modify(key, 12.0), Err(FontError::UnknownKey(key)));
    }

    #[test]
    fn rejects_bad_sizes() {
        let mut cache = FontCache::bundled().unwrap();
        let key = FontKey::next();
        assert_eq!(cache.acquire(key, 0.0), Err(FontError::InvalidSize(0.0)));
        assert!(cache.acquire(key, f32::INFINITY).is_err());
    }

    #[test]
    fn unavailable_cache_never_provides() {
        let mut cache = FontCache::unavailable();
        let key = FontKey::next();
        assert!(!cache.has_face());
        assert_eq!(cache.acquire(key, 28.0), Err(FontError::NoFace));
        assert!(cache.lookup(key).is_none());
    }

    #[test]
    fn glyph_rasterizes_with_coverage() {
        let mut cache = FontCache::bundled().unwrap();
        let key = FontKey::next();
        cache.acquire(key, 28.0).unwrap();
        let font = cache.lookup_mut(key).unwrap();
        assert!(font.line_height() > 0.0);
        let g = font.glyph('#');
        assert!(g.width > 0 && g.height > 0);
        assert_eq!(g.bitmap.len(), g.width * g.height);
        assert!(g.bitmap.iter().any(|&c| c > 0));
    }
}
