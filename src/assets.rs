//! Read-only sprite table
//!
//! Decoding images and slicing sprite sheets happens outside the crate; what
//! arrives here is one collision mask per animation frame plus the pixel size
//! of each background. The table is built once, owned by the orchestrator and
//! passed to entity constructors, which keep cheap shared handles to the
//! frames they animate through.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{UVec2, Vec2};

use crate::consts::*;
use crate::error::{GameError, Result};
use crate::sim::mask::Mask;
use crate::sim::object::FireState;
use crate::sim::player::{Facing, PlayerAnim};

/// Fire trap art is 16x32, scaled 2x
pub const FIRE_SIZE: UVec2 = UVec2::new(32, 64);
/// Spike art is 16x16, scaled 2x
pub const SPIKE_SIZE: UVec2 = UVec2::new(32, 32);
/// Goal flag art is 64x64, scaled 2x
pub const GOAL_SIZE: UVec2 = UVec2::new(128, 128);
/// Size used when a single image is missing entirely
pub const PLACEHOLDER_SIZE: UVec2 = UVec2::new(64, 64);

/// Animation frames for the player character, keyed by state and facing
#[derive(Debug, Clone, Default)]
pub struct CharacterSprites {
    sheets: HashMap<(PlayerAnim, Facing), Vec<Mask>>,
}

impl CharacterSprites {
    pub fn insert(&mut self, anim: PlayerAnim, facing: Facing, frames: Vec<Mask>) {
        self.sheets.insert((anim, facing), frames);
    }

    /// Frames for an animation; errors if the sheet is absent or empty
    pub fn frames(&self, anim: PlayerAnim, facing: Facing) -> Result<&[Mask]> {
        let key = format!("{}_{}", anim.as_str(), facing.as_str());
        match self.sheets.get(&(anim, facing)) {
            Some(frames) if !frames.is_empty() => Ok(frames),
            Some(_) => Err(GameError::EmptyAnimationFrames(key)),
            None => Err(GameError::AssetMissing(key)),
        }
    }
}

/// Animation frames for the fire trap, keyed by on/off state
#[derive(Debug, Clone, Default)]
pub struct TrapSprites {
    sheets: HashMap<FireState, Vec<Mask>>,
}

impl TrapSprites {
    pub fn insert(&mut self, state: FireState, frames: Vec<Mask>) {
        self.sheets.insert(state, frames);
    }

    pub fn frames(&self, state: FireState) -> Result<&[Mask]> {
        match self.sheets.get(&state) {
            Some(frames) if !frames.is_empty() => Ok(frames),
            Some(_) => Err(GameError::EmptyAnimationFrames(format!("fire_{}", state.as_str()))),
            None => Err(GameError::AssetMissing(format!("fire_{}", state.as_str()))),
        }
    }
}

/// A resolved background: tile size and whether it is the fallback fill
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub name: String,
    pub tile_size: Vec2,
    pub placeholder: bool,
}

impl Background {
    /// Top-left corners of the tiles needed to cover the viewport
    pub fn tile_positions(&self, viewport: Vec2) -> Vec<Vec2> {
        if self.placeholder || self.tile_size.x <= 0.0 || self.tile_size.y <= 0.0 {
            return vec![Vec2::ZERO];
        }
        let cols = (viewport.x / self.tile_size.x).ceil() as u32;
        let rows = (viewport.y / self.tile_size.y).ceil() as u32;
        let mut tiles = Vec::with_capacity((cols * rows) as usize);
        for i in 0..cols {
            for j in 0..rows {
                tiles.push(Vec2::new(i as f32 * self.tile_size.x, j as f32 * self.tile_size.y));
            }
        }
        tiles
    }
}

/// Every sprite mask the simulation needs
#[derive(Debug, Clone, Default)]
pub struct AssetTable {
    player: Arc<CharacterSprites>,
    fire: Arc<TrapSprites>,
    block: Option<Mask>,
    spike: Option<Mask>,
    goal: Option<Mask>,
    backgrounds: HashMap<String, UVec2>,
}

impl AssetTable {
    /// Empty table; every lookup falls back to a placeholder
    pub fn new() -> Self {
        Self::default()
    }

    /// Solid-rectangle stand-ins at the shipped art sizes and frame counts
    pub fn placeholder() -> Self {
        let player_size = PLAYER_SIZE as u32;
        let frame = Mask::filled(player_size, player_size);

        let mut player = CharacterSprites::default();
        for (anim, count) in [
            (PlayerAnim::Idle, 11),
            (PlayerAnim::Run, 12),
            (PlayerAnim::Jump, 1),
            (PlayerAnim::DoubleJump, 6),
            (PlayerAnim::Fall, 1),
            (PlayerAnim::Hit, 7),
        ] {
            for facing in [Facing::Left, Facing::Right] {
                player.insert(anim, facing, vec![frame.clone(); count]);
            }
        }

        let flame = Mask::filled(FIRE_SIZE.x, FIRE_SIZE.y);
        let mut fire = TrapSprites::default();
        fire.insert(FireState::On, vec![flame.clone(); 3]);
        fire.insert(FireState::Off, vec![flame]);

        let block = BLOCK_SIZE as u32;
        let mut table = Self {
            player: Arc::new(player),
            fire: Arc::new(fire),
            block: Some(Mask::filled(block, block)),
            spike: Some(Mask::filled(SPIKE_SIZE.x, SPIKE_SIZE.y)),
            goal: Some(Mask::filled(GOAL_SIZE.x, GOAL_SIZE.y)),
            backgrounds: HashMap::new(),
        };
        for name in ["Blue.png", "Purple.png", "Green.png", "Brown.png", "Gray.png", "Pink.png", "Yellow.png"] {
            table = table.with_background(name, 64, 64);
        }
        table
    }

    pub fn with_player_sprites(mut self, sprites: CharacterSprites) -> Self {
        self.player = Arc::new(sprites);
        self
    }

    pub fn with_fire_sprites(mut self, sprites: TrapSprites) -> Self {
        self.fire = Arc::new(sprites);
        self
    }

    pub fn with_block(mut self, mask: Mask) -> Self {
        self.block = Some(mask);
        self
    }

    pub fn with_spike(mut self, mask: Mask) -> Self {
        self.spike = Some(mask);
        self
    }

    pub fn with_goal(mut self, mask: Mask) -> Self {
        self.goal = Some(mask);
        self
    }

    pub fn with_background(mut self, name: &str, width: u32, height: u32) -> Self {
        self.backgrounds.insert(name.to_string(), UVec2::new(width, height));
        self
    }

    /// Shared handle to the player animation sheets
    pub fn player_sprites(&self) -> Arc<CharacterSprites> {
        Arc::clone(&self.player)
    }

    /// Shared handle to the fire animation sheets
    pub fn fire_sprites(&self) -> Arc<TrapSprites> {
        Arc::clone(&self.fire)
    }

    pub fn block(&self) -> Result<Mask> {
        self.block.clone().ok_or_else(|| GameError::AssetMissing("block".into()))
    }

    pub fn spike(&self) -> Result<Mask> {
        self.spike.clone().ok_or_else(|| GameError::AssetMissing("spike".into()))
    }

    pub fn goal(&self) -> Result<Mask> {
        self.goal.clone().ok_or_else(|| GameError::AssetMissing("goal".into()))
    }

    /// Resolve a background by name, falling back to a flat fill
    pub fn background(&self, name: &str) -> Background {
        match self.backgrounds.get(name) {
            Some(size) if size.x > 0 && size.y > 0 => Background {
                name: name.to_string(),
                tile_size: size.as_vec2(),
                placeholder: false,
            },
            Some(_) => {
                log::warn!("Background {} has zero dimension, using fill", name);
                Self::fallback_background(name)
            }
            None => {
                log::warn!("{}", GameError::AssetMissing(format!("background {}", name)));
                Self::fallback_background(name)
            }
        }
    }

    fn fallback_background(name: &str) -> Background {
        Background {
            name: name.to_string(),
            tile_size: Vec2::new(WIDTH, HEIGHT),
            placeholder: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_has_every_player_sheet() {
        let assets = AssetTable::placeholder();
        let sprites = assets.player_sprites();
        for anim in PlayerAnim::ALL {
            for facing in [Facing::Left, Facing::Right] {
                assert!(sprites.frames(anim, facing).is_ok(), "{:?} {:?}", anim, facing);
            }
        }
        assert_eq!(sprites.frames(PlayerAnim::Run, Facing::Right).map(|f| f.len()).ok(), Some(12));
    }

    #[test]
    fn test_missing_and_empty_sheets_are_distinguished() {
        let mut sprites = CharacterSprites::default();
        sprites.insert(PlayerAnim::Idle, Facing::Right, Vec::new());
        assert!(matches!(
            sprites.frames(PlayerAnim::Idle, Facing::Right),
            Err(GameError::EmptyAnimationFrames(_))
        ));
        assert!(matches!(
            sprites.frames(PlayerAnim::Run, Facing::Left),
            Err(GameError::AssetMissing(_))
        ));
    }

    #[test]
    fn test_empty_table_reports_missing_footprints() {
        let assets = AssetTable::new();
        assert!(assets.block().is_err());
        assert!(assets.spike().is_err());
        assert!(assets.goal().is_err());
    }

    #[test]
    fn test_background_tiles_cover_viewport() {
        let assets = AssetTable::new().with_background("Blue.png", 64, 64);
        let bg = assets.background("Blue.png");
        assert!(!bg.placeholder);
        let tiles = bg.tile_positions(Vec2::new(WIDTH, HEIGHT));
        // ceil(1000/64) * ceil(800/64) = 16 * 13
        assert_eq!(tiles.len(), 16 * 13);
        assert_eq!(tiles[1], Vec2::new(0.0, 64.0));
    }

    #[test]
    fn test_missing_background_is_single_fill_tile() {
        let assets = AssetTable::new().with_background("Flat.png", 0, 10);
        for name in ["Nope.png", "Flat.png"] {
            let bg = assets.background(name);
            assert!(bg.placeholder);
            assert_eq!(bg.tile_positions(Vec2::new(WIDTH, HEIGHT)), vec![Vec2::ZERO]);
        }
    }
}
