//! Side Scroller - A 2D platformer with a fixed-timestep core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, game state)
//! - `levels`: Static level descriptors (built-in or JSON)
//! - `assets`: Read-only sprite mask table handed to entity constructors
//! - `renderer`: Canvas abstraction and scene drawing
//! - `platform`: Fixed-step clock and input latching
//! - `settings`: Runtime tuning

pub mod assets;
pub mod error;
pub mod levels;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use assets::AssetTable;
pub use error::GameError;
pub use levels::{LevelDef, LevelTable};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Target simulation rate (ticks per second)
    pub const FPS: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Viewport dimensions
    pub const WIDTH: f32 = 1000.0;
    pub const HEIGHT: f32 = 800.0;
    /// Distance from a viewport edge at which the camera starts scrolling
    pub const SCROLL_AREA_WIDTH: f32 = 200.0;

    /// Terrain grid cell (blocks are 48px art scaled 2x)
    pub const BLOCK_SIZE: f32 = 96.0;

    /// Horizontal run speed (pixels per tick)
    pub const PLAYER_VEL: f32 = 5.0;
    /// Gravity unit; jump impulse and fall threshold scale with it
    pub const GRAVITY: f32 = 1.0;
    /// Cap on the per-tick gravity increment (soft terminal velocity)
    pub const MAX_FALL_ACCEL: f32 = 1.0;
    /// Jump impulse in gravity units (applied upward)
    pub const JUMP_STRENGTH: f32 = 8.0;
    /// Jumps allowed before touching the ground again
    pub const MAX_JUMPS: u8 = 2;
    pub const MAX_HEALTH: u8 = 3;

    /// Seconds of invincibility after taking damage
    pub const INVINCIBILITY_SECS: f32 = 1.5;
    /// Seconds the hit animation plays after taking damage
    pub const HIT_ANIMATION_SECS: f32 = 0.5;
    /// Seconds each animation frame stays on screen (3 ticks at 60 Hz)
    pub const ANIMATION_FRAME_SECS: f32 = 0.05;

    /// Player sprite footprint (32px art scaled 2x)
    pub const PLAYER_SIZE: f32 = 64.0;
}

/// Convert a duration in simulated seconds to a whole tick count (at least 1)
#[inline]
pub fn secs_to_ticks(secs: f32, fps: u32) -> u32 {
    ((secs * fps as f32).round() as u32).max(1)
}
