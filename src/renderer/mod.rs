//! Rendering collaborator
//!
//! The simulation never draws. A host implements [`Canvas`] for its
//! graphics backend and calls [`draw_scene`] once per presented frame.

pub mod scene;

use glam::Vec2;

use crate::sim::Rect;
use crate::sim::{Facing, FireState, PlayerAnim};

pub use scene::{HEART_SIZE, draw_scene};

/// RGBA colour, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    /// Missing-art marker
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    /// Flat fill behind levels whose background art is missing
    pub const BACKDROP: Color = Color::rgb(100, 100, 200);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Which piece of art to draw
#[derive(Debug, Clone, PartialEq)]
pub enum SpriteRef {
    Background(String),
    Player {
        anim: PlayerAnim,
        facing: Facing,
        index: usize,
    },
    Block,
    Fire {
        state: FireState,
        index: usize,
    },
    Spike,
    Goal,
    Heart,
}

/// Minimal drawing surface; coordinates are screen pixels, y down
pub trait Canvas {
    fn blit(&mut self, sprite: SpriteRef, pos: Vec2);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn text(&mut self, text: &str, pos: Vec2, color: Color);
    fn present(&mut self);
}
