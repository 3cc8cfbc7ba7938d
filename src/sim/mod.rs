//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Durations counted in ticks, derived from seconds and the tick rate
//! - Stable iteration order (objects in level load order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod mask;
pub mod object;
pub mod player;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{ContactLedger, MoveIntent, MoveOutcome, goal_reached, handle_move};
pub use level::{Level, load_level};
pub use mask::Mask;
pub use object::{FireState, Object, ObjectKind};
pub use player::{Facing, Player, PlayerAnim, PlayerStatus, PlayerTuning};
pub use rect::Rect;
pub use state::{GameEvent, GamePhase, GameSession};
pub use tick::{TickInput, tick};
