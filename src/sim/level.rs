//! Level instantiation
//!
//! Turns a [`LevelDef`] into live entities. Every call builds fresh objects
//! and a fresh player, so loading the same index twice yields two
//! independent, identical worlds.

use glam::Vec2;

use super::mask::Mask;
use super::object::Object;
use super::player::{Player, PlayerTuning};
use crate::assets::{AssetTable, PLACEHOLDER_SIZE};
use crate::consts::BLOCK_SIZE;
use crate::error::Result;
use crate::levels::{LevelDef, LevelTable};

/// A loaded, playable level
#[derive(Debug, Clone)]
pub struct Level {
    pub index: usize,
    pub background: String,
    pub player: Player,
    /// Blocks, then fires, then spikes, then the goal
    pub objects: Vec<Object>,
}

/// Load level `index` from `table`.
///
/// Fails with `LevelIndexOutOfRange` past the end of the table; callers
/// treat that as every level having been cleared.
pub fn load_level(
    table: &LevelTable,
    assets: &AssetTable,
    tuning: PlayerTuning,
    index: usize,
) -> Result<Level> {
    let def = table.get(index)?;
    let level = build_level(def, assets, tuning, index);
    log::info!(
        "Loaded level {} ({} objects, background {})",
        index + 1,
        level.objects.len(),
        level.background
    );
    Ok(level)
}

fn build_level(def: &LevelDef, assets: &AssetTable, tuning: PlayerTuning, index: usize) -> Level {
    let block_size = BLOCK_SIZE as u32;
    let block_mask = footprint(assets.block(), Mask::filled(block_size, block_size));
    let spike_mask = footprint(assets.spike(), placeholder());
    let goal_mask = footprint(assets.goal(), placeholder());

    let mut objects =
        Vec::with_capacity(def.blocks.len() + def.fires.len() + def.spikes.len() + 1);

    for &pos in &def.blocks {
        objects.push(Object::block(grid_aligned(pos, &block_mask), block_mask.clone()));
    }

    let fire_sprites = assets.fire_sprites();
    for fire in &def.fires {
        let mut obj = Object::fire(
            Vec2::new(fire.x, fire.y),
            fire.footprint(),
            fire_sprites.clone(),
        );
        obj.on();
        objects.push(obj);
    }

    for &pos in &def.spikes {
        objects.push(Object::spike(grid_aligned(pos, &spike_mask), spike_mask.clone()));
    }

    objects.push(Object::goal(grid_aligned(def.goal, &goal_mask), goal_mask));

    Level {
        index,
        background: def.background.clone(),
        player: Player::new(def.player_start, assets.player_sprites(), tuning),
        objects,
    }
}

/// Shift down so the sprite's bottom sits on the bottom of its grid cell
fn grid_aligned(cell_top_left: Vec2, mask: &Mask) -> Vec2 {
    Vec2::new(
        cell_top_left.x,
        cell_top_left.y + BLOCK_SIZE - mask.height() as f32,
    )
}

fn placeholder() -> Mask {
    Mask::filled(PLACEHOLDER_SIZE.x, PLACEHOLDER_SIZE.y)
}

fn footprint(found: Result<Mask>, fallback: Mask) -> Mask {
    found.unwrap_or_else(|err| {
        log::warn!("{}; using placeholder", err);
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::sim::object::ObjectKind;

    fn load(index: usize) -> Result<Level> {
        load_level(
            &LevelTable::builtin(),
            &AssetTable::placeholder(),
            PlayerTuning::default(),
            index,
        )
    }

    #[test]
    fn test_object_order_and_single_goal() {
        let level = load(0).unwrap();
        let kinds: Vec<_> = level.objects.iter().map(|o| o.name()).collect();
        assert_eq!(kinds.iter().filter(|k| k.is_none()).count(), 26);
        assert_eq!(kinds[26], Some("fire"));
        assert_eq!(kinds[27], Some("spike"));
        assert_eq!(kinds[28], Some("goal"));
        assert_eq!(level.objects.iter().filter(|o| o.is_goal()).count(), 1);
    }

    #[test]
    fn test_fires_start_lit() {
        let level = load(1).unwrap();
        let fires: Vec<_> = level
            .objects
            .iter()
            .filter(|o| matches!(o.kind, ObjectKind::Fire(_)))
            .collect();
        assert_eq!(fires.len(), 3);
        assert!(fires.iter().all(|f| f.is_harmful()));
    }

    #[test]
    fn test_footprints_align_to_cell_bottom() {
        let level = load(0).unwrap();
        let spike = level.objects.iter().find(|o| o.name() == Some("spike")).unwrap();
        // Spike cell top is 704; a 32px spike sits on the cell bottom
        assert_eq!(spike.rect.top(), 768.0);
        assert_eq!(spike.rect.bottom(), 800.0);

        let goal = level.objects.iter().find(|o| o.is_goal()).unwrap();
        assert_eq!(goal.rect.pos, Vec2::new(864.0, 288.0));

        // Blocks fill their cell exactly
        assert_eq!(level.objects[0].rect.pos, Vec2::new(-480.0, 704.0));
    }

    #[test]
    fn test_reload_is_independent_and_identical() {
        let mut first = load(0).unwrap();
        let second = load(0).unwrap();

        assert_eq!(first.player.rect, second.player.rect);
        assert_eq!(first.player.health(), second.player.health());
        for (a, b) in first.objects.iter().zip(&second.objects) {
            assert_eq!(a.rect, b.rect);
            assert_eq!(a.is_harmful(), b.is_harmful());
        }

        // Mutating one leaves the other untouched
        first.player.take_damage(1);
        first.objects[26].off();
        assert_eq!(second.player.health(), 3);
        assert!(second.objects[26].is_harmful());
    }

    #[test]
    fn test_past_last_level() {
        assert!(matches!(
            load(2),
            Err(GameError::LevelIndexOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_missing_assets_use_placeholders() {
        let level = load_level(
            &LevelTable::builtin(),
            &AssetTable::new(),
            PlayerTuning::default(),
            0,
        )
        .unwrap();
        assert_eq!(level.objects[0].rect.size, Vec2::new(BLOCK_SIZE, BLOCK_SIZE));
        let goal = level.objects.last().unwrap();
        assert_eq!(goal.rect.size, PLACEHOLDER_SIZE.as_vec2());
        assert!(level.player.frame().is_none());
    }
}
