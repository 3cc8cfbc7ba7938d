//! The player character: kinematics, health and animation state

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::mask::Mask;
use super::rect::Rect;
use crate::assets::CharacterSprites;
use crate::consts::*;
use crate::error::{GameError, Result};
use crate::secs_to_ticks;

/// Horizontal facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

/// Which animation sheet the player is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerAnim {
    #[default]
    Idle,
    Run,
    Jump,
    DoubleJump,
    Fall,
    Hit,
}

impl PlayerAnim {
    pub const ALL: [PlayerAnim; 6] = [
        PlayerAnim::Idle,
        PlayerAnim::Run,
        PlayerAnim::Jump,
        PlayerAnim::DoubleJump,
        PlayerAnim::Fall,
        PlayerAnim::Hit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerAnim::Idle => "idle",
            PlayerAnim::Run => "run",
            PlayerAnim::Jump => "jump",
            PlayerAnim::DoubleJump => "double_jump",
            PlayerAnim::Fall => "fall",
            PlayerAnim::Hit => "hit",
        }
    }
}

/// Damage reaction state. One timer (ticks since the last hit) drives both
/// the hit animation and the invincibility window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    Normal,
    /// Hit animation still playing after invincibility ran out
    Hit,
    Invincible,
    HitAndInvincible,
}

impl PlayerStatus {
    fn from_flags(hit: bool, invincible: bool) -> Self {
        match (hit, invincible) {
            (false, false) => PlayerStatus::Normal,
            (true, false) => PlayerStatus::Hit,
            (false, true) => PlayerStatus::Invincible,
            (true, true) => PlayerStatus::HitAndInvincible,
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, PlayerStatus::Hit | PlayerStatus::HitAndInvincible)
    }

    pub fn is_invincible(&self) -> bool {
        matches!(self, PlayerStatus::Invincible | PlayerStatus::HitAndInvincible)
    }
}

/// Physics and timer parameters copied into each player at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerTuning {
    pub gravity: f32,
    pub jump_strength: f32,
    pub max_health: u8,
    pub invincibility_secs: f32,
    pub hit_animation_secs: f32,
    pub animation_frame_secs: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            max_health: MAX_HEALTH,
            invincibility_secs: INVINCIBILITY_SECS,
            hit_animation_secs: HIT_ANIMATION_SECS,
            animation_frame_secs: ANIMATION_FRAME_SECS,
        }
    }
}

/// Sprite currently shown, for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteFrame {
    pub anim: PlayerAnim,
    pub facing: Facing,
    pub index: usize,
}

/// The player-controlled character
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left position and size of the current frame
    pub rect: Rect,
    /// Pixels per tick
    pub vel: Vec2,
    pub facing: Facing,
    pub jump_count: u8,
    /// Ticks since last landing / first jump; scales gravity
    pub fall_count: u32,
    pub anim: PlayerAnim,
    /// Ticks spent in the current animation cycle
    pub animation_count: u32,
    health: u8,
    status: PlayerStatus,
    status_ticks: u32,
    starting_pos: Vec2,
    frame: Option<SpriteFrame>,
    mask: Mask,
    sprites: Arc<CharacterSprites>,
    tuning: PlayerTuning,
}

impl Player {
    pub fn new(start: Vec2, sprites: Arc<CharacterSprites>, tuning: PlayerTuning) -> Self {
        let mut player = Self {
            rect: Rect::new(start.x, start.y, PLAYER_SIZE, PLAYER_SIZE),
            vel: Vec2::ZERO,
            facing: Facing::Right,
            jump_count: 0,
            fall_count: 0,
            anim: PlayerAnim::Idle,
            animation_count: 0,
            health: tuning.max_health,
            status: PlayerStatus::Normal,
            status_ticks: 0,
            starting_pos: start,
            frame: None,
            mask: Mask::empty(),
            sprites,
            tuning,
        };
        player.show_first_frame();
        player
    }

    /// Restore the state the player had when the level was loaded
    pub fn reset(&mut self) {
        self.rect.pos = self.starting_pos;
        self.vel = Vec2::ZERO;
        self.facing = Facing::Right;
        self.jump_count = 0;
        self.fall_count = 0;
        self.anim = PlayerAnim::Idle;
        self.animation_count = 0;
        self.health = self.tuning.max_health;
        self.status = PlayerStatus::Normal;
        self.status_ticks = 0;
        self.show_first_frame();
    }

    #[inline]
    pub fn health(&self) -> u8 {
        self.health
    }

    #[inline]
    pub fn max_health(&self) -> u8 {
        self.tuning.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    #[inline]
    pub fn status(&self) -> PlayerStatus {
        self.status
    }

    pub fn is_invincible(&self) -> bool {
        self.status.is_invincible()
    }

    pub fn is_hit(&self) -> bool {
        self.status.is_hit()
    }

    pub fn starting_pos(&self) -> Vec2 {
        self.starting_pos
    }

    /// Collision mask of the current frame
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Frame being displayed; `None` means the placeholder rectangle
    pub fn frame(&self) -> Option<SpriteFrame> {
        self.frame
    }

    /// Set x velocity from the held direction; turning restarts the cycle
    pub fn apply_horizontal_intent(&mut self, direction: Option<Facing>, speed: f32) {
        match direction {
            None => self.vel.x = 0.0,
            Some(facing) => {
                self.vel.x = match facing {
                    Facing::Left => -speed,
                    Facing::Right => speed,
                };
                if self.facing != facing {
                    self.facing = facing;
                    self.animation_count = 0;
                }
            }
        }
    }

    /// Move by the gated x velocity
    pub fn commit_horizontal(&mut self) {
        self.rect.pos.x += self.vel.x;
    }

    /// Start a jump or double jump. Returns false if no jumps are left.
    pub fn jump(&mut self) -> bool {
        if self.jump_count >= MAX_JUMPS {
            return false;
        }
        self.vel.y = -self.tuning.gravity * self.tuning.jump_strength;
        self.animation_count = 0;
        self.jump_count += 1;
        if self.jump_count == 1 {
            self.fall_count = 0;
        }
        true
    }

    /// Apply damage unless invincible. Returns true if health was taken.
    pub fn take_damage(&mut self, amount: u8) -> bool {
        if self.status.is_invincible() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.status = PlayerStatus::HitAndInvincible;
        self.status_ticks = 0;
        true
    }

    /// Downward contact with solid terrain
    pub fn landed(&mut self) {
        self.fall_count = 0;
        self.vel.y = 0.0;
        self.jump_count = 0;
    }

    /// Upward contact with solid terrain: bounce back at half speed
    pub fn hit_head(&mut self) {
        self.fall_count = 0;
        self.vel.y *= -0.5;
    }

    /// Advance one simulation step: timers, gravity, vertical motion, animation
    pub fn tick(&mut self, fps: u32) {
        let fps = fps.max(1);
        self.advance_status(fps);

        let gravity_step = (self.fall_count as f32 / fps as f32) * self.tuning.gravity;
        self.vel.y += gravity_step.min(MAX_FALL_ACCEL);
        self.rect.pos.y += self.vel.y;

        self.fall_count += 1;
        self.update_sprite(fps);
    }

    fn advance_status(&mut self, fps: u32) {
        if self.status == PlayerStatus::Normal {
            return;
        }
        self.status_ticks += 1;
        let hit = self.status.is_hit()
            && self.status_ticks <= secs_to_ticks(self.tuning.hit_animation_secs, fps);
        let invincible = self.status.is_invincible()
            && self.status_ticks < secs_to_ticks(self.tuning.invincibility_secs, fps);
        self.status = PlayerStatus::from_flags(hit, invincible);
        if self.status == PlayerStatus::Normal {
            self.status_ticks = 0;
        }
    }

    fn select_anim(&self) -> PlayerAnim {
        if self.status.is_hit() {
            PlayerAnim::Hit
        } else if self.vel.y < 0.0 {
            match self.jump_count {
                0 => PlayerAnim::Idle,
                1 => PlayerAnim::Jump,
                _ => PlayerAnim::DoubleJump,
            }
        } else if self.vel.y > self.tuning.gravity * 1.5 {
            PlayerAnim::Fall
        } else if self.vel.x != 0.0 {
            PlayerAnim::Run
        } else {
            PlayerAnim::Idle
        }
    }

    fn update_sprite(&mut self, fps: u32) {
        self.anim = self.select_anim();
        let sprites = Arc::clone(&self.sprites);
        match resolve_frames(&sprites, self.anim, self.facing) {
            Ok((anim, facing, frames)) => {
                let delay = secs_to_ticks(self.tuning.animation_frame_secs, fps);
                let index = (self.animation_count / delay) as usize % frames.len();
                self.frame = Some(SpriteFrame { anim, facing, index });
                self.set_mask(frames[index].clone());
                self.animation_count += 1;
            }
            Err(err) => log::trace!("Player frame unchanged: {}", err),
        }
    }

    fn show_first_frame(&mut self) {
        let sprites = Arc::clone(&self.sprites);
        match resolve_frames(&sprites, PlayerAnim::Idle, self.facing) {
            Ok((anim, facing, frames)) => {
                self.frame = Some(SpriteFrame { anim, facing, index: 0 });
                self.set_mask(frames[0].clone());
            }
            Err(err) => {
                log::warn!("{}; drawing player as a placeholder", err);
                self.frame = None;
                self.set_mask(Mask::filled(PLAYER_SIZE as u32, PLAYER_SIZE as u32));
            }
        }
    }

    /// Swap in a new frame mask, keeping the top-left corner fixed
    fn set_mask(&mut self, mask: Mask) {
        self.rect.size = Vec2::new(mask.width() as f32, mask.height() as f32);
        self.mask = mask;
    }
}

/// Look up a sheet. A missing sheet falls back to facing right idle; an
/// empty one is reported so the caller keeps its current frame.
fn resolve_frames(
    sprites: &CharacterSprites,
    anim: PlayerAnim,
    facing: Facing,
) -> Result<(PlayerAnim, Facing, &[Mask])> {
    match sprites.frames(anim, facing) {
        Ok(frames) => Ok((anim, facing, frames)),
        Err(GameError::AssetMissing(_)) => sprites
            .frames(PlayerAnim::Idle, Facing::Right)
            .map(|frames| (PlayerAnim::Idle, Facing::Right, frames)),
        Err(err) => Err(err),
    }
}
