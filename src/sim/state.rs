//! Game session state
//!
//! Owns the level table, the asset table and the currently loaded level,
//! and carries the phase machine that [`super::tick`] drives.

use serde::{Deserialize, Serialize};

use super::level::{Level, load_level};
use crate::assets::AssetTable;
use crate::error::{GameError, Result};
use crate::levels::LevelTable;
use crate::settings::Settings;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Between-level banner; reserved, no transition enters it
    LevelTransition,
    /// Player ran out of health, waiting for restart
    GameOver,
    /// Every level cleared
    GameWon,
}

/// Something that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Damaged { health: u8 },
    Jumped,
    /// Level `index` (0-based) was cleared and the next one loaded
    LevelCompleted { index: usize },
    GameOver,
    GameWon,
    Restarted,
    Quit,
}

/// Everything the loop needs to run a game
#[derive(Debug, Clone)]
pub struct GameSession {
    pub phase: GamePhase,
    pub level: Level,
    /// Horizontal camera offset in world pixels
    pub scroll_offset: f32,
    /// Cleared on quit; the loop stops once this is false
    pub running: bool,
    /// Ticks simulated since the session started
    pub time_ticks: u64,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    levels: LevelTable,
    assets: AssetTable,
    settings: Settings,
}

impl GameSession {
    /// Start a session on the first level
    pub fn new(levels: LevelTable, assets: AssetTable, settings: Settings) -> Result<Self> {
        let level = load_level(&levels, &assets, settings.player_tuning(), 0)?;
        log::info!("Session started with {} levels", levels.len());
        Ok(Self {
            phase: GamePhase::Playing,
            level,
            scroll_offset: 0.0,
            running: true,
            time_ticks: 0,
            events: Vec::new(),
            levels,
            assets,
            settings,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn assets(&self) -> &AssetTable {
        &self.assets
    }

    #[inline]
    pub fn level_index(&self) -> usize {
        self.level.index
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn load(&self, index: usize) -> Result<Level> {
        load_level(&self.levels, &self.assets, self.settings.player_tuning(), index)
    }

    /// Stop the session. Nothing else changes.
    pub fn quit(&mut self) {
        self.running = false;
        self.events.push(GameEvent::Quit);
        log::info!("Quit requested");
    }

    /// Player health reached zero
    pub fn game_over(&mut self) {
        self.set_phase(GamePhase::GameOver);
        self.events.push(GameEvent::GameOver);
    }

    /// Back to the first level with a fresh player and camera
    pub fn restart(&mut self) -> Result<()> {
        self.level = self.load(0)?;
        self.scroll_offset = 0.0;
        self.set_phase(GamePhase::Playing);
        self.events.push(GameEvent::Restarted);
        Ok(())
    }

    /// Goal reached: load the next level, or win if there is none
    pub fn advance_level(&mut self) -> Result<()> {
        let cleared = self.level.index;
        match self.load(cleared + 1) {
            Ok(level) => {
                self.level = level;
                self.scroll_offset = 0.0;
                self.events.push(GameEvent::LevelCompleted { index: cleared });
                log::info!("Level {} complete", cleared + 1);
                Ok(())
            }
            Err(GameError::LevelIndexOutOfRange { .. }) => {
                self.set_phase(GamePhase::GameWon);
                self.events.push(GameEvent::GameWon);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Follow the player once it moves into a scroll margin
    pub fn update_scroll(&mut self) {
        let player = &self.level.player;
        let margin = self.settings.scroll_area_width;
        let width = self.settings.viewport_width;
        let vx = player.vel.x;

        let near_right = player.rect.right() - self.scroll_offset >= width - margin && vx > 0.0;
        let near_left = player.rect.left() - self.scroll_offset <= margin && vx < 0.0;
        if near_right || near_left {
            self.scroll_offset += vx;
        }
    }
}
