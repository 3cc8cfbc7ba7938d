//! Collision detection and response between the player and level objects
//!
//! Axes are resolved separately: a vertical pass snaps the player onto or
//! under solid terrain, then horizontal checks test the position the player
//! is *trying* to reach and gate the real move. Traps hurt on any contact,
//! including contact made by a side check in a direction the player cannot move.

use glam::IVec2;

use super::object::Object;
use super::player::{Facing, Player};
use super::rect::Rect;

/// Damage dealt by a single trap contact
pub const TRAP_DAMAGE: u8 = 1;

/// Integer offset of `other`'s top-left corner from `base`'s
#[inline]
pub fn mask_offset(base: &Rect, other: &Rect) -> IVec2 {
    (other.pos - base.pos).round().as_ivec2()
}

/// Pixel-accurate overlap between the player and an object
pub fn player_overlaps(player: &Player, obj: &Object) -> bool {
    player.rect.intersects(&obj.rect)
        && player
            .mask()
            .overlaps(obj.mask(), mask_offset(&player.rect, &obj.rect))
}

/// Traps that have already touched the player this tick.
///
/// Both the vertical pass and the horizontal checks can touch the same trap
/// in one tick; only the first contact applies damage.
#[derive(Debug, Default, Clone)]
pub struct ContactLedger {
    touched: Vec<usize>,
}

impl ContactLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.touched.clear();
    }

    pub fn has_touched(&self, index: usize) -> bool {
        self.touched.contains(&index)
    }

    /// Apply trap damage for a contact with `objects[index]`.
    /// Returns true if health was taken.
    pub fn strike(&mut self, player: &mut Player, index: usize, obj: &Object) -> bool {
        if !obj.is_harmful() || self.has_touched(index) {
            return false;
        }
        self.touched.push(index);
        let hurt = player.take_damage(TRAP_DAMAGE);
        if hurt {
            log::debug!(
                "Player hit by {} at ({}, {}), health {}",
                obj.name().unwrap_or("object"),
                obj.rect.left(),
                obj.rect.top(),
                player.health()
            );
        }
        hurt
    }
}

/// Resolve overlaps caused by vertical motion `dy`.
///
/// Returns the indices of every object involved, in scan order.
pub fn handle_vertical_collision(
    player: &mut Player,
    objects: &[Object],
    dy: f32,
    ledger: &mut ContactLedger,
) -> Vec<usize> {
    let mut involved = Vec::new();

    for (index, obj) in objects.iter().enumerate() {
        if !player_overlaps(player, obj) {
            continue;
        }

        let mut resolved = false;
        if dy > 0.0 {
            if obj.is_solid() {
                player.rect.set_bottom(obj.rect.top());
                player.landed();
                resolved = true;
            } else if obj.is_trap() {
                ledger.strike(player, index, obj);
                resolved = true;
            }
        } else if dy < 0.0 {
            if obj.is_solid() {
                player.rect.set_top(obj.rect.bottom());
                player.hit_head();
                resolved = true;
            } else if obj.is_trap() {
                ledger.strike(player, index, obj);
                resolved = true;
            }
        }

        // Side brush: overlap that was not resolved vertically but sits
        // under the player's centre line
        if !resolved
            && (obj.is_solid() || obj.is_trap())
            && obj.rect.spans_x(player.rect.center_x())
        {
            if obj.is_trap() {
                ledger.strike(player, index, obj);
            }
            resolved = true;
        }

        if resolved {
            involved.push(index);
        }
    }

    involved
}

/// Tentatively move the player by `dx` and test what it would touch.
///
/// Traps touched by the check deal damage. Returns the first solid object
/// found; scanning stops there. The player is always moved back.
pub fn check_horizontal(
    player: &mut Player,
    objects: &[Object],
    dx: f32,
    ledger: &mut ContactLedger,
) -> Option<usize> {
    player.rect.pos.x += dx;

    let mut blocking = None;
    for (index, obj) in objects.iter().enumerate() {
        if !player_overlaps(player, obj) {
            continue;
        }
        if obj.is_trap() {
            ledger.strike(player, index, obj);
        }
        if obj.is_solid() {
            blocking = Some(index);
            break;
        }
    }

    player.rect.pos.x -= dx;
    blocking
}

/// Independent scan for contact with the level's goal
pub fn goal_reached(player: &Player, objects: &[Object]) -> bool {
    objects
        .iter()
        .any(|obj| obj.is_goal() && player_overlaps(player, obj))
}

/// Held horizontal intents for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
}

/// What the movement step found
#[derive(Debug, Clone, Default)]
pub struct MoveOutcome {
    /// Objects involved in vertical resolution
    pub vertical: Vec<usize>,
    pub blocked_left: Option<usize>,
    pub blocked_right: Option<usize>,
}

/// Full movement step: vertical pass, both side checks, then the gated
/// horizontal move. Right wins when both directions are held.
pub fn handle_move(
    player: &mut Player,
    objects: &[Object],
    intent: MoveIntent,
    speed: f32,
    ledger: &mut ContactLedger,
) -> MoveOutcome {
    let dy = player.vel.y;
    let vertical = handle_vertical_collision(player, objects, dy, ledger);

    let blocked_left = check_horizontal(player, objects, -speed, ledger);
    let blocked_right = check_horizontal(player, objects, speed, ledger);

    let mut direction = None;
    if intent.left && blocked_left.is_none() {
        direction = Some(Facing::Left);
    }
    if intent.right && blocked_right.is_none() {
        direction = Some(Facing::Right);
    }
    player.apply_horizontal_intent(direction, speed);
    player.commit_horizontal();

    MoveOutcome {
        vertical,
        blocked_left,
        blocked_right,
    }
}
