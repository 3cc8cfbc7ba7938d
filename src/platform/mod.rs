//! Platform abstraction layer
//!
//! Handles the pieces that sit between a host event loop and the
//! simulation:
//! - Time: fixed-step accumulation of wall-clock frame time
//! - Input: key events latched into per-tick snapshots

pub mod input;
pub mod time;

pub use input::{InputLatch, Key};
pub use time::FixedClock;
