//! Runtime tuning
//!
//! Defaults mirror `consts`; a JSON file may override any subset of fields.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, Result};
use crate::sim::player::PlayerTuning;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Simulation ticks per second
    pub fps: u32,

    // === Viewport / camera ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Distance from a viewport edge at which the camera follows
    pub scroll_area_width: f32,

    // === Player ===
    /// Horizontal speed in pixels per tick
    pub player_speed: f32,
    pub gravity: f32,
    pub jump_strength: f32,
    pub max_health: u8,
    pub invincibility_secs: f32,
    pub hit_animation_secs: f32,
    /// Seconds each animation frame is held (player and fire traps)
    pub animation_frame_secs: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: FPS,

            viewport_width: WIDTH,
            viewport_height: HEIGHT,
            scroll_area_width: SCROLL_AREA_WIDTH,

            player_speed: PLAYER_VEL,
            gravity: GRAVITY,
            jump_strength: JUMP_STRENGTH,
            max_health: MAX_HEALTH,
            invincibility_secs: INVINCIBILITY_SECS,
            hit_animation_secs: HIT_ANIMATION_SECS,
            animation_frame_secs: ANIMATION_FRAME_SECS,
        }
    }
}

impl Settings {
    /// Player parameters derived from these settings
    pub fn player_tuning(&self) -> PlayerTuning {
        PlayerTuning {
            gravity: self.gravity,
            jump_strength: self.jump_strength,
            max_health: self.max_health,
            invincibility_secs: self.invincibility_secs,
            hit_animation_secs: self.hit_animation_secs,
            animation_frame_secs: self.animation_frame_secs,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.viewport_width, self.viewport_height)
    }

    /// Fixed simulation timestep in seconds
    pub fn sim_dt(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// Whole ticks in `secs` seconds, computed wide so large rates cannot overflow
    pub fn ticks_in(&self, secs: u32) -> u64 {
        u64::from(secs) * u64::from(self.fps)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(GameError::InvalidSettings(msg.to_string()));
        if self.fps == 0 {
            return invalid("fps must be positive");
        }
        if self.max_health == 0 {
            return invalid("max_health must be positive");
        }
        if self.viewport_width <= 2.0 * self.scroll_area_width {
            return invalid("scroll area wider than half the viewport");
        }
        if self.player_speed < 0.0 || self.gravity <= 0.0 || self.jump_strength < 0.0 {
            return invalid("speeds and gravity must not be negative");
        }
        Ok(())
    }

    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("{}; using default settings", err);
                Self::default()
            }
        }
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.player_tuning(), PlayerTuning::default());
        assert!((settings.sim_dt() - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_ticks_in_does_not_overflow() {
        assert_eq!(Settings::default().ticks_in(180), 10_800);
        let fast = Settings {
            fps: u32::MAX,
            ..Default::default()
        };
        assert_eq!(fast.ticks_in(180), 180 * u64::from(u32::MAX));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"fps": 120, "player_speed": 3.5}"#).unwrap();
        assert_eq!(settings.fps, 120);
        assert_eq!(settings.player_speed, 3.5);
        assert_eq!(settings.max_health, MAX_HEALTH);
    }

    #[test]
    fn test_validate_rejects_zero_fps() {
        let settings = Settings {
            fps: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(GameError::InvalidSettings(_))));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("side-scroller-settings-{}.json", std::process::id()));
        let settings = Settings {
            fps: 30,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let settings = Settings::load_or_default(Some(Path::new("/nonexistent/settings.json")));
        assert_eq!(settings, Settings::default());
    }
}
