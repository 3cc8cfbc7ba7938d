//! Fixed timestep simulation tick
//!
//! Core game loop step: intents first, then physics, hazards, movement,
//! death, goal and camera, in that order.

use super::collision::{ContactLedger, MoveIntent, goal_reached, handle_move};
use super::state::{GameEvent, GamePhase, GameSession};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held
    pub left: bool,
    /// Held
    pub right: bool,
    /// Pressed this tick
    pub jump: bool,
    /// Pressed this tick; only honoured on the game over screen
    pub restart: bool,
    /// Pressed this tick; honoured in every phase
    pub quit: bool,
}

impl TickInput {
    pub fn intent(&self) -> MoveIntent {
        MoveIntent {
            left: self.left,
            right: self.right,
        }
    }
}

/// Advance the session by one fixed timestep
pub fn tick(session: &mut GameSession, input: &TickInput) {
    session.events.clear();

    if !session.running {
        return;
    }
    if input.quit {
        session.quit();
        return;
    }
    session.time_ticks += 1;

    if input.jump && session.phase == GamePhase::Playing && session.level.player.jump() {
        session.events.push(GameEvent::Jumped);
    }

    // The fresh level starts simulating on the next tick
    if input.restart && session.phase == GamePhase::GameOver {
        if let Err(err) = session.restart() {
            log::error!("Restart failed: {}", err);
        }
        return;
    }

    if session.phase != GamePhase::Playing {
        return;
    }

    let fps = session.settings().fps;
    let speed = session.settings().player_speed;
    let frame_secs = session.settings().animation_frame_secs;
    let level = &mut session.level;
    let health_before = level.player.health();

    level.player.tick(fps);

    for obj in &mut level.objects {
        obj.animate(fps, frame_secs);
    }

    let mut ledger = ContactLedger::new();
    handle_move(
        &mut level.player,
        &level.objects,
        input.intent(),
        speed,
        &mut ledger,
    );

    let health = level.player.health();
    if health < health_before {
        session.events.push(GameEvent::Damaged { health });
    }

    // Dying on the goal still counts as dying
    if session.level.player.is_dead() {
        session.game_over();
        return;
    }

    if goal_reached(&session.level.player, &session.level.objects) {
        if let Err(err) = session.advance_level() {
            log::error!("Could not load next level: {}", err);
        }
        return;
    }

    session.update_scroll();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetTable;
    use crate::levels::{FireDef, LevelDef, LevelTable};
    use crate::settings::Settings;
    use crate::sim::object::ObjectKind;
    use glam::Vec2;

    const FLOOR_Y: f32 = 704.0;

    fn flat_level(goal: Vec2, fires: Vec<FireDef>) -> LevelDef {
        LevelDef {
            background: "Gray.png".into(),
            player_start: Vec2::new(100.0, 608.0),
            blocks: (-2..12).map(|i| Vec2::new(i as f32 * 96.0, FLOOR_Y)).collect(),
            fires,
            spikes: Vec::new(),
            goal,
        }
    }

    fn far_goal() -> Vec2 {
        Vec2::new(5000.0, 608.0)
    }

    fn session_with(levels: Vec<LevelDef>) -> GameSession {
        GameSession::new(
            LevelTable::new(levels).unwrap(),
            AssetTable::placeholder(),
            Settings::default(),
        )
        .unwrap()
    }

    fn run(session: &mut GameSession, input: TickInput, ticks: u32) {
        for _ in 0..ticks {
            tick(session, &input);
        }
    }

    fn right() -> TickInput {
        TickInput {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_player_settles_on_floor() {
        let mut s = session_with(vec![flat_level(far_goal(), vec![])]);
        run(&mut s, TickInput::default(), 60);
        // Sub-pixel gravity creep is snapped back once it rounds into the floor
        let bottom = s.level.player.rect.bottom();
        assert!((FLOOR_Y - 0.5..=FLOOR_Y).contains(&bottom), "bottom {}", bottom);
        assert_eq!(s.level.player.jump_count, 0);
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_quit_stops_before_anything_else() {
        let mut s = session_with(vec![flat_level(far_goal(), vec![])]);
        let before = s.level.player.rect;
        tick(
            &mut s,
            &TickInput {
                quit: true,
                jump: true,
                right: true,
                ..Default::default()
            },
        );
        assert!(!s.running);
        assert_eq!(s.events, vec![GameEvent::Quit]);
        assert_eq!(s.level.player.rect, before);
        assert_eq!(s.level.player.jump_count, 0);
        assert_eq!(s.time_ticks, 0);

        // Further ticks are ignored
        run(&mut s, right(), 5);
        assert_eq!(s.level.player.rect, before);
    }

    #[test]
    fn test_jump_only_while_playing() {
        let mut s = session_with(vec![flat_level(far_goal(), vec![])]);
        run(&mut s, TickInput::default(), 60);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut s, &jump);
        assert_eq!(s.level.player.jump_count, 1);
        assert!(s.events.contains(&GameEvent::Jumped));
        assert!(s.level.player.rect.bottom() < FLOOR_Y);

        s.game_over();
        let y = s.level.player.rect.pos.y;
        tick(&mut s, &jump);
        assert_eq!(s.level.player.jump_count, 1);
        assert_eq!(s.level.player.rect.pos.y, y);
    }

    #[test]
    fn test_goal_on_last_level_wins() {
        // Goal overlaps the spawn point
        let mut s = session_with(vec![flat_level(Vec2::new(100.0, 608.0), vec![])]);
        tick(&mut s, &TickInput::default());
        assert_eq!(s.phase, GamePhase::GameWon);
        assert!(s.events.contains(&GameEvent::GameWon));

        // Frozen afterwards
        let pos = s.level.player.rect.pos;
        run(&mut s, right(), 10);
        assert_eq!(s.level.player.rect.pos, pos);
        assert_eq!(s.phase, GamePhase::GameWon);
    }

    #[test]
    fn test_goal_advances_to_next_level() {
        let mut s = session_with(vec![
            flat_level(Vec2::new(100.0, 608.0), vec![]),
            flat_level(far_goal(), vec![]),
        ]);
        s.scroll_offset = 40.0;
        tick(&mut s, &TickInput::default());
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.level_index(), 1);
        assert_eq!(s.scroll_offset, 0.0);
        assert_eq!(s.level.player.rect.pos, Vec2::new(100.0, 608.0));
        assert!(s.events.contains(&GameEvent::LevelCompleted { index: 0 }));
    }

    #[test]
    fn test_death_beats_goal() {
        // Last health point, spawning on the goal with a lit fire beside it
        let fire = FireDef::new(116.0, 640.0);
        let settings = Settings {
            max_health: 1,
            ..Default::default()
        };
        let mut s = GameSession::new(
            LevelTable::new(vec![flat_level(Vec2::new(100.0, 608.0), vec![fire])]).unwrap(),
            AssetTable::placeholder(),
            settings,
        )
        .unwrap();
        assert_eq!(s.level.player.health(), 1);
        assert!(!s.level.player.is_invincible());

        tick(&mut s, &TickInput::default());
        assert!(goal_reached(&s.level.player, &s.level.objects));
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(
            s.events,
            vec![GameEvent::Damaged { health: 0 }, GameEvent::GameOver]
        );
    }

    #[test]
    fn test_restart_only_from_game_over() {
        let mut s = session_with(vec![
            flat_level(Vec2::new(100.0, 608.0), vec![]),
            flat_level(far_goal(), vec![]),
        ]);
        tick(&mut s, &TickInput::default());
        assert_eq!(s.level_index(), 1);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        // Ignored while playing
        tick(&mut s, &restart);
        assert_eq!(s.level_index(), 1);

        s.level.player.take_damage(3);
        tick(&mut s, &TickInput::default());
        assert_eq!(s.phase, GamePhase::GameOver);

        tick(&mut s, &restart);
        assert!(s.events.contains(&GameEvent::Restarted));
        assert_eq!(s.level_index(), 0);
        assert_eq!(s.scroll_offset, 0.0);
        assert_eq!(s.level.player.max_health(), s.level.player.health());
    }

    #[test]
    fn test_fire_contact_and_invincibility_window() {
        let fire = FireDef::new(116.0, 640.0);
        let mut s = session_with(vec![flat_level(far_goal(), vec![fire])]);

        tick(&mut s, &TickInput::default());
        assert_eq!(s.level.player.health(), 2);
        assert_eq!(s.events, vec![GameEvent::Damaged { health: 2 }]);

        // Standing in the fire: 1.5 s of invincibility at 60 Hz
        for t in 2..=90 {
            tick(&mut s, &TickInput::default());
            assert_eq!(s.level.player.health(), 2, "tick {}", t);
        }
        tick(&mut s, &TickInput::default());
        assert_eq!(s.level.player.health(), 1);
    }

    #[test]
    fn test_frame_time_setting_drives_fire() {
        let fire = FireDef::new(600.0, 640.0);
        let settings = Settings {
            animation_frame_secs: 0.1,
            ..Default::default()
        };
        let mut s = GameSession::new(
            LevelTable::new(vec![flat_level(far_goal(), vec![fire])]).unwrap(),
            AssetTable::placeholder(),
            settings,
        )
        .unwrap();

        run(&mut s, TickInput::default(), 6);
        let fire_frame = s.level.objects.iter().find_map(|o| match &o.kind {
            ObjectKind::Fire(anim) => Some(anim.frame_index),
            _ => None,
        });
        assert_eq!(fire_frame, Some(0));

        tick(&mut s, &TickInput::default());
        let fire_frame = s.level.objects.iter().find_map(|o| match &o.kind {
            ObjectKind::Fire(anim) => Some(anim.frame_index),
            _ => None,
        });
        assert_eq!(fire_frame, Some(1));
    }

    #[test]
    fn test_burning_to_death_ends_game() {
        let fire = FireDef::new(116.0, 640.0);
        let mut s = session_with(vec![flat_level(far_goal(), vec![fire])]);
        run(&mut s, TickInput::default(), 200);
        assert_eq!(s.phase, GamePhase::GameOver);
        assert_eq!(s.level.player.health(), 0);
    }

    #[test]
    fn test_wall_blocks_running() {
        let mut def = flat_level(far_goal(), vec![]);
        // Wall one cell to the right of the spawn, on the floor
        def.blocks.push(Vec2::new(192.0, 608.0));
        let mut s = session_with(vec![def]);
        run(&mut s, right(), 120);
        assert!(s.level.player.rect.right() <= 192.0);
        assert_eq!(s.level.player.vel.x, 0.0);
    }

    #[test]
    fn test_camera_scrolls_while_running_right() {
        let mut s = session_with(vec![flat_level(far_goal(), vec![])]);
        run(&mut s, right(), 200);
        let p = &s.level.player;
        assert!(s.scroll_offset > 0.0);
        // Player held at the edge of the scroll margin
        let screen_right = p.rect.right() - s.scroll_offset;
        assert!((795.0..=805.0).contains(&screen_right), "screen right {}", screen_right);
    }

    #[test]
    fn test_builtin_run_never_enters_transition() {
        let mut s = GameSession::new(
            LevelTable::builtin(),
            AssetTable::placeholder(),
            Settings::default(),
        )
        .unwrap();
        for t in 0..1200u32 {
            let input = TickInput {
                right: true,
                jump: t % 40 == 0,
                restart: true,
                ..Default::default()
            };
            tick(&mut s, &input);
            assert_ne!(s.phase, GamePhase::LevelTransition);
            assert!(s.level.player.health() <= s.level.player.max_health());
        }
    }
}
