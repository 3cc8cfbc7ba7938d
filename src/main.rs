//! Side Scroller entry point
//!
//! Runs the simulation headless with placeholder art and a simple
//! autopilot driving the keyboard latch. A windowed host would replace the
//! autopilot with real key events and `FrameStats` with a real canvas.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use glam::Vec2;

    use side_scroller::platform::{FixedClock, InputLatch, Key};
    use side_scroller::renderer::{Canvas, Color, SpriteRef, draw_scene};
    use side_scroller::sim::{GameEvent, GamePhase, GameSession, Rect, tick};
    use side_scroller::{AssetTable, LevelTable, Settings};

    /// Stop after this many simulated seconds if nobody quits
    const DEMO_SECONDS: u32 = 180;
    /// Game overs tolerated before the autopilot gives up
    const MAX_RESTARTS: u32 = 3;

    /// Canvas that only counts what would have been drawn
    #[derive(Debug, Default)]
    struct FrameStats {
        frames: u64,
        blits: u64,
        fills: u64,
        last_banner: Option<String>,
    }

    impl Canvas for FrameStats {
        fn blit(&mut self, _sprite: SpriteRef, _pos: Vec2) {
            self.blits += 1;
        }

        fn fill_rect(&mut self, _rect: Rect, _color: Color) {
            self.fills += 1;
        }

        fn text(&mut self, text: &str, _pos: Vec2, _color: Color) {
            if !text.starts_with("Level:") {
                self.last_banner = Some(text.to_string());
            }
        }

        fn present(&mut self) {
            self.frames += 1;
        }
    }

    /// Runs right, hops when stuck and periodically otherwise
    #[derive(Debug, Default)]
    struct Autopilot {
        last_x: f32,
        stuck_ticks: u32,
        restarts: u32,
    }

    impl Autopilot {
        fn drive(&mut self, session: &GameSession, latch: &mut InputLatch) {
            match session.phase {
                GamePhase::GameWon => latch.key_down(Key::Quit),
                GamePhase::GameOver if self.restarts >= MAX_RESTARTS => latch.key_down(Key::Quit),
                GamePhase::GameOver => {
                    self.restarts += 1;
                    latch.key_down(Key::Restart);
                }
                GamePhase::Playing | GamePhase::LevelTransition => {
                    latch.key_down(Key::Right);
                    let x = session.level.player.rect.left();
                    if (x - self.last_x).abs() < f32::EPSILON {
                        self.stuck_ticks += 1;
                    } else {
                        self.stuck_ticks = 0;
                    }
                    self.last_x = x;
                    if self.stuck_ticks > 2 || session.time_ticks % 50 == 0 {
                        latch.key_down(Key::Jump);
                        latch.key_up(Key::Jump);
                    }
                }
            }
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Side Scroller (native, headless) starting...");

        let settings = Settings::load_or_default(std::env::args_os().nth(1).map(PathBuf::from).as_deref());
        let mut session = match GameSession::new(
            LevelTable::builtin(),
            AssetTable::placeholder(),
            settings.clone(),
        ) {
            Ok(session) => session,
            Err(err) => {
                log::error!("Failed to start: {}", err);
                std::process::exit(1);
            }
        };

        let mut clock = FixedClock::new(settings.fps);
        let mut latch = InputLatch::new();
        let mut pilot = Autopilot::default();
        let mut stats = FrameStats::default();
        let max_ticks = settings.ticks_in(DEMO_SECONDS);
        // Host presents at the simulation rate
        let frame_secs = clock.step();

        while session.running && session.time_ticks < max_ticks {
            for _ in 0..clock.advance(frame_secs) {
                pilot.drive(&session, &mut latch);
                tick(&mut session, &latch.consume());
                for event in &session.events {
                    match event {
                        GameEvent::Damaged { health } => log::info!("Ouch! health {}", health),
                        GameEvent::Jumped => log::trace!("Jump"),
                        other => log::info!("{:?}", other),
                    }
                }
                if !session.running {
                    break;
                }
            }
            if session.running {
                draw_scene(&mut stats, &session);
            }
        }

        log::info!(
            "Finished after {} ticks in {:?} on level {} ({} frames, {} blits, {} fills, banner {:?})",
            session.time_ticks,
            session.phase,
            session.level_index() + 1,
            stats.frames,
            stats.blits,
            stats.fills,
            stats.last_banner
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host yet; the library builds for wasm32 on its own
}
