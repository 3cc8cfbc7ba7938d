//! Level objects: terrain, traps and the goal

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::mask::Mask;
use super::rect::Rect;
use crate::assets::TrapSprites;
use crate::secs_to_ticks;

/// Fire trap animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FireState {
    On,
    #[default]
    Off,
}

impl FireState {
    pub fn as_str(&self) -> &'static str {
        match self {
            FireState::On => "on",
            FireState::Off => "off",
        }
    }
}

/// Runtime animation of a fire trap
#[derive(Debug, Clone)]
pub struct FireAnimation {
    pub state: FireState,
    pub animation_count: u32,
    pub frame_index: usize,
    sprites: Arc<TrapSprites>,
}

/// Closed set of object behaviours
#[derive(Debug, Clone)]
pub enum ObjectKind {
    /// Solid, static terrain
    Block,
    /// Animated trap, harmful only while on
    Fire(FireAnimation),
    /// Static trap, always harmful
    Spike,
    /// Level exit
    Goal,
}

/// A placed object with its current collision mask
#[derive(Debug, Clone)]
pub struct Object {
    pub kind: ObjectKind,
    pub rect: Rect,
    mask: Mask,
}

impl Object {
    fn with_mask(kind: ObjectKind, pos: Vec2, mask: Mask) -> Self {
        let size = Vec2::new(mask.width() as f32, mask.height() as f32);
        Self {
            kind,
            rect: Rect { pos, size },
            mask,
        }
    }

    pub fn block(pos: Vec2, mask: Mask) -> Self {
        Self::with_mask(ObjectKind::Block, pos, mask)
    }

    pub fn spike(pos: Vec2, mask: Mask) -> Self {
        Self::with_mask(ObjectKind::Spike, pos, mask)
    }

    pub fn goal(pos: Vec2, mask: Mask) -> Self {
        Self::with_mask(ObjectKind::Goal, pos, mask)
    }

    /// A fire trap, initially off and showing its first "off" frame.
    /// `footprint` sizes the placeholder used when the sheets are missing.
    pub fn fire(pos: Vec2, footprint: Vec2, sprites: Arc<TrapSprites>) -> Self {
        let mask = match sprites.frames(FireState::Off) {
            Ok(frames) => frames[0].clone(),
            Err(err) => {
                log::warn!("{}; using placeholder fire", err);
                Mask::filled(footprint.x as u32, footprint.y as u32)
            }
        };
        let anim = FireAnimation {
            state: FireState::Off,
            animation_count: 0,
            frame_index: 0,
            sprites,
        };
        Self::with_mask(ObjectKind::Fire(anim), pos, mask)
    }

    /// Tag used by renderers and logs; blocks carry none
    pub fn name(&self) -> Option<&'static str> {
        match self.kind {
            ObjectKind::Block => None,
            ObjectKind::Fire(_) => Some("fire"),
            ObjectKind::Spike => Some("spike"),
            ObjectKind::Goal => Some("goal"),
        }
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Blocks player movement on contact
    pub fn is_solid(&self) -> bool {
        matches!(self.kind, ObjectKind::Block)
    }

    pub fn is_goal(&self) -> bool {
        matches!(self.kind, ObjectKind::Goal)
    }

    /// Fire or spike, whether or not currently active
    pub fn is_trap(&self) -> bool {
        matches!(self.kind, ObjectKind::Fire(_) | ObjectKind::Spike)
    }

    /// Damages the player on contact right now
    pub fn is_harmful(&self) -> bool {
        match &self.kind {
            ObjectKind::Fire(fire) => fire.state == FireState::On,
            ObjectKind::Spike => true,
            ObjectKind::Block | ObjectKind::Goal => false,
        }
    }

    /// Switch a fire trap on; other objects ignore this
    pub fn on(&mut self) {
        self.set_fire_state(FireState::On);
    }

    /// Switch a fire trap off
    pub fn off(&mut self) {
        self.set_fire_state(FireState::Off);
    }

    fn set_fire_state(&mut self, state: FireState) {
        if let ObjectKind::Fire(fire) = &mut self.kind {
            fire.state = state;
        }
    }

    /// Advance the animation one tick and refresh the mask.
    /// Each frame is held for `frame_secs`.
    pub fn animate(&mut self, fps: u32, frame_secs: f32) {
        let ObjectKind::Fire(fire) = &mut self.kind else {
            return;
        };
        let sprites = Arc::clone(&fire.sprites);
        let Ok(frames) = sprites.frames(fire.state) else {
            return;
        };

        let delay = secs_to_ticks(frame_secs, fps.max(1));
        let index = (fire.animation_count / delay) as usize % frames.len();
        fire.frame_index = index;
        fire.animation_count += 1;

        let mask = frames[index].clone();
        self.rect.size = Vec2::new(mask.width() as f32, mask.height() as f32);
        self.mask = mask;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetTable, FIRE_SIZE};
    use crate::consts::{ANIMATION_FRAME_SECS, FPS};

    fn fire() -> Object {
        Object::fire(
            Vec2::new(384.0, 544.0),
            FIRE_SIZE.as_vec2(),
            AssetTable::placeholder().fire_sprites(),
        )
    }

    #[test]
    fn test_fire_only_harms_while_on() {
        let mut f = fire();
        assert_eq!(f.name(), Some("fire"));
        assert!(!f.is_harmful());
        f.on();
        assert!(f.is_harmful());
        f.off();
        assert!(!f.is_harmful());
    }

    #[test]
    fn test_kinds() {
        let mask = Mask::filled(96, 96);
        let block = Object::block(Vec2::ZERO, mask.clone());
        assert!(block.is_solid());
        assert!(!block.is_harmful());
        assert_eq!(block.name(), None);
        assert_eq!(block.rect.size, Vec2::new(96.0, 96.0));

        let spike = Object::spike(Vec2::ZERO, mask.clone());
        assert!(spike.is_harmful());
        assert!(!spike.is_solid());

        let goal = Object::goal(Vec2::ZERO, mask);
        assert!(goal.is_goal());
        assert!(!goal.is_harmful());
        assert!(!goal.is_solid());
    }

    #[test]
    fn test_fire_cycles_frames() {
        let mut f = fire();
        f.on();
        let mut seen = Vec::new();
        for _ in 0..10 {
            f.animate(FPS, ANIMATION_FRAME_SECS);
            if let ObjectKind::Fire(anim) = &f.kind {
                seen.push(anim.frame_index);
            }
        }
        // Three "on" frames, three ticks each, then wrap
        assert_eq!(seen, vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 0]);
    }

    #[test]
    fn test_fire_cadence_follows_frame_time() {
        let mut f = fire();
        f.on();
        let mut seen = Vec::new();
        for _ in 0..8 {
            f.animate(FPS, 0.1);
            if let ObjectKind::Fire(anim) = &f.kind {
                seen.push(anim.frame_index);
            }
        }
        // 0.1 s at 60 Hz holds each frame for six ticks
        assert_eq!(seen, vec![0, 0, 0, 0, 0, 0, 1, 1]);
    }

    #[test]
    fn test_fire_frame_resizes_mask() {
        let mut sprites = TrapSprites::default();
        sprites.insert(FireState::Off, vec![Mask::filled(32, 64)]);
        sprites.insert(FireState::On, vec![Mask::filled(32, 48)]);
        let mut f = Object::fire(Vec2::new(10.0, 20.0), FIRE_SIZE.as_vec2(), Arc::new(sprites));
        assert_eq!(f.rect.size, Vec2::new(32.0, 64.0));
        f.on();
        f.animate(FPS, ANIMATION_FRAME_SECS);
        assert_eq!(f.rect.size, Vec2::new(32.0, 48.0));
        assert_eq!(f.rect.pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_fire_without_sprites_is_static_placeholder() {
        let mut f = Object::fire(Vec2::ZERO, FIRE_SIZE.as_vec2(), Arc::new(TrapSprites::default()));
        assert_eq!(f.mask().width(), FIRE_SIZE.x);
        f.on();
        f.animate(FPS, ANIMATION_FRAME_SECS);
        assert_eq!(f.mask().height(), FIRE_SIZE.y);
        assert!(f.is_harmful());
    }
}
