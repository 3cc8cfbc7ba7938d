//! Level descriptors
//!
//! A level is plain data: background name, spawn point, and the top-left
//! grid coordinates of every block, trap and the goal. Coordinates are in
//! screen pixels with y growing downward. Tables come either from
//! [`LevelTable::builtin`] or from JSON with the same shape.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BLOCK_SIZE, HEIGHT};
use crate::error::{GameError, Result};

/// Fire trap placement; `width`/`height` are unscaled art dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireDef {
    pub x: f32,
    pub y: f32,
    #[serde(default = "FireDef::default_width")]
    pub width: f32,
    #[serde(default = "FireDef::default_height")]
    pub height: f32,
}

impl FireDef {
    fn default_width() -> f32 {
        16.0
    }

    fn default_height() -> f32 {
        32.0
    }

    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: Self::default_width(),
            height: Self::default_height(),
        }
    }

    /// On-screen footprint (art is drawn at 2x)
    pub fn footprint(&self) -> Vec2 {
        Vec2::new(self.width * 2.0, self.height * 2.0)
    }
}

/// One hand-authored level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub background: String,
    pub player_start: Vec2,
    pub blocks: Vec<Vec2>,
    #[serde(default)]
    pub fires: Vec<FireDef>,
    #[serde(default)]
    pub spikes: Vec<Vec2>,
    /// Exactly one goal per level
    pub goal: Vec2,
}

/// Ordered list of levels played in sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTable {
    levels: Vec<LevelDef>,
}

/// Grid helpers: column `i`, `rows` cells up from the bottom of the screen
fn cell(i: i32, rows: i32) -> Vec2 {
    Vec2::new(i as f32 * BLOCK_SIZE, HEIGHT - BLOCK_SIZE * rows as f32)
}

fn floor(cols: std::ops::Range<i32>) -> impl Iterator<Item = Vec2> {
    cols.map(|i| cell(i, 1))
}

/// Fire standing on top of the block in row `rows`
fn fire_on(i: i32, rows: i32) -> FireDef {
    let base = cell(i, rows);
    FireDef::new(base.x, base.y - 64.0)
}

impl LevelTable {
    pub fn new(levels: Vec<LevelDef>) -> Result<Self> {
        if levels.is_empty() {
            return Err(GameError::InvalidLevelData("level table is empty".into()));
        }
        Ok(Self { levels })
    }

    /// The two shipped levels
    pub fn builtin() -> Self {
        let level_one = LevelDef {
            background: "Blue.png".into(),
            player_start: Vec2::new(100.0, HEIGHT - BLOCK_SIZE * 2.0),
            blocks: floor(-5..15)
                .chain([
                    cell(0, 3),
                    cell(1, 3),
                    cell(3, 4),
                    cell(5, 5),
                    cell(7, 5),
                    cell(8, 5),
                ])
                .collect(),
            fires: vec![fire_on(4, 1)],
            spikes: vec![cell(6, 1)],
            goal: cell(9, 5),
        };

        let level_two = LevelDef {
            background: "Purple.png".into(),
            player_start: Vec2::new(50.0, HEIGHT - BLOCK_SIZE * 2.0),
            blocks: floor(-2..4)
                .chain(floor(8..18))
                .chain([
                    cell(5, 3),
                    cell(6, 4),
                    cell(7, 4),
                    cell(10, 5),
                    cell(10, 6),
                    cell(12, 7),
                ])
                .collect(),
            fires: vec![fire_on(3, 1), fire_on(9, 1), fire_on(6, 4)],
            spikes: vec![cell(4, 1), cell(7, 1), cell(11, 4)],
            goal: cell(14, 2),
        };

        Self {
            levels: vec![level_one, level_two],
        }
    }

    /// Parse a table from JSON (`{"levels": [...]}`)
    pub fn from_json(json: &str) -> Result<Self> {
        let table: LevelTable = serde_json::from_str(json)?;
        Self::new(table.levels)
    }

    /// Read a table from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let table = Self::from_json(&json)?;
        log::info!("Loaded {} levels from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Descriptor for `index`, or `LevelIndexOutOfRange`
    pub fn get(&self, index: usize) -> Result<&LevelDef> {
        self.levels.get(index).ok_or(GameError::LevelIndexOutOfRange {
            index,
            count: self.levels.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDef> {
        self.levels.iter()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::builtin()
    }
}
