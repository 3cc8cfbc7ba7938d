//! Pixel-accurate collision masks
//!
//! A mask is a packed bit grid built from a sprite's alpha channel. Overlap
//! queries take the integer offset of the other mask's top-left corner
//! relative to this one, so entity positions are rounded before testing.
//! Masks are immutable and share their bits, so cloning one per frame change
//! is cheap.

use std::sync::Arc;

use glam::IVec2;

/// Alpha values above this count as solid
pub const ALPHA_THRESHOLD: u8 = 127;

const WORD_BITS: usize = 64;

/// Packed bit grid, row-major, `words_per_row` u64 words per row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Arc<[u64]>,
}

impl Default for Mask {
    fn default() -> Self {
        Self::empty()
    }
}

impl Mask {
    /// Zero-size mask; overlaps nothing
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            words_per_row: 0,
            bits: Arc::from(Vec::new()),
        }
    }

    /// Fully solid rectangle (placeholder sprites, terrain blocks)
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build from one alpha byte per pixel, row-major.
    ///
    /// Short buffers are treated as transparent past their end.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Self {
        Self::from_fn(width, height, |x, y| {
            alpha
                .get(y as usize * width as usize + x as usize)
                .is_some_and(|&a| a > ALPHA_THRESHOLD)
        })
    }

    /// Build by sampling a predicate for every pixel
    pub fn from_fn(width: u32, height: u32, mut solid: impl FnMut(u32, u32) -> bool) -> Self {
        let words_per_row = (width as usize).div_ceil(WORD_BITS);
        let mut bits = vec![0u64; words_per_row * height as usize];
        for y in 0..height {
            for x in 0..width {
                if solid(x, y) {
                    let idx = y as usize * words_per_row + x as usize / WORD_BITS;
                    bits[idx] |= 1 << (x as usize % WORD_BITS);
                }
            }
        }
        Self {
            width,
            height,
            words_per_row,
            bits: Arc::from(bits),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether pixel (x, y) is set; out of bounds is clear
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        let word = self.bits[y * self.words_per_row + x / WORD_BITS];
        word & (1 << (x % WORD_BITS)) != 0
    }

    /// Number of set pixels
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// Test overlap with `other` placed at `offset` from this mask's origin
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }

        // Intersection of both masks in this mask's coordinates
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_overlap() {
        let a = Mask::filled(10, 10);
        let b = Mask::filled(10, 10);
        assert!(a.overlaps(&b, IVec2::new(5, 5)));
        assert!(a.overlaps(&b, IVec2::new(-9, -9)));
        // Touching edge only
        assert!(!a.overlaps(&b, IVec2::new(10, 0)));
        assert!(!a.overlaps(&b, IVec2::new(0, -10)));
    }

    #[test]
    fn test_empty_mask_never_overlaps() {
        let a = Mask::filled(10, 10);
        let empty = Mask::empty();
        assert!(!a.overlaps(&empty, IVec2::ZERO));
        assert!(!empty.overlaps(&a, IVec2::ZERO));
        assert!(!Mask::filled(0, 32).overlaps(&a, IVec2::ZERO));
    }

    #[test]
    fn test_transparent_pixels_do_not_collide() {
        // Only the bottom row is solid
        let mut alpha = vec![0u8; 4 * 4];
        for x in 0..4 {
            alpha[3 * 4 + x] = 255;
        }
        let ledge = Mask::from_alpha(4, 4, &alpha);
        assert_eq!(ledge.count(), 4);

        let body = Mask::filled(2, 2);
        // Body covering rows 0-1 misses the solid row
        assert!(!ledge.overlaps(&body, IVec2::new(1, 0)));
        // Body covering rows 2-3 hits it
        assert!(ledge.overlaps(&body, IVec2::new(1, 2)));
    }

    #[test]
    fn test_wide_masks_span_multiple_words() {
        let wide = Mask::from_fn(130, 1, |x, _| x == 129);
        assert!(wide.get(129, 0));
        assert!(!wide.get(128, 0));
        let dot = Mask::filled(1, 1);
        assert!(wide.overlaps(&dot, IVec2::new(129, 0)));
        assert!(!wide.overlaps(&dot, IVec2::new(64, 0)));
    }

    #[test]
    fn test_alpha_threshold() {
        let m = Mask::from_alpha(2, 1, &[ALPHA_THRESHOLD, ALPHA_THRESHOLD + 1]);
        assert!(!m.get(0, 0));
        assert!(m.get(1, 0));
    }
}
