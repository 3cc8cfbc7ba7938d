//! Axis-aligned rectangles in screen space
//!
//! Y grows downward: `top` is the smallest y, `bottom` the largest.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Move so the bottom edge sits at `y` (size unchanged)
    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    /// Move so the top edge sits at `y`
    pub fn set_top(&mut self, y: f32) {
        self.pos.y = y;
    }

    /// Copy shifted left by a horizontal scroll offset (for drawing)
    pub fn scrolled(&self, offset_x: f32) -> Self {
        Self {
            pos: Vec2::new(self.pos.x - offset_x, self.pos.y),
            size: self.size,
        }
    }

    /// Strict overlap test (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// True if the x coordinate lies strictly between left and right
    pub fn spans_x(&self, x: f32) -> bool {
        self.left() < x && x < self.right()
    }
}
