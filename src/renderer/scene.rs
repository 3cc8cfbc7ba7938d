//! Per-frame scene composition

use glam::Vec2;

use super::{Canvas, Color, SpriteRef};
use crate::sim::{GamePhase, GameSession, Object, ObjectKind, Player, Rect};

/// Heart icon edge length in the health HUD
pub const HEART_SIZE: f32 = 32.0;
const HEART_GAP: f32 = 5.0;
const HUD_MARGIN: f32 = 10.0;

/// Length of one invincibility flash cycle; the first half is hidden
const FLASH_PERIOD_MS: u64 = 200;

/// Draw background, objects, player, HUD and banners, then present
pub fn draw_scene(canvas: &mut impl Canvas, session: &GameSession) {
    let offset_x = session.scroll_offset;
    let viewport = session.settings().viewport();

    draw_background(canvas, session, viewport);

    for obj in &session.level.objects {
        draw_object(canvas, obj, offset_x);
    }

    let fps = u64::from(session.settings().fps.max(1));
    let elapsed_ms = session.time_ticks * 1000 / fps;
    draw_player(canvas, &session.level.player, offset_x, elapsed_ms);

    draw_hud(canvas, session);
    draw_banner(canvas, session, viewport);

    canvas.present();
}

fn draw_background(canvas: &mut impl Canvas, session: &GameSession, viewport: Vec2) {
    let background = session.assets().background(&session.level.background);
    if background.placeholder {
        canvas.fill_rect(Rect::new(0.0, 0.0, viewport.x, viewport.y), Color::BACKDROP);
        return;
    }
    for tile in background.tile_positions(viewport) {
        canvas.blit(SpriteRef::Background(background.name.clone()), tile);
    }
}

fn draw_object(canvas: &mut impl Canvas, obj: &Object, offset_x: f32) {
    let sprite = match &obj.kind {
        ObjectKind::Block => SpriteRef::Block,
        ObjectKind::Fire(fire) => SpriteRef::Fire {
            state: fire.state,
            index: fire.frame_index,
        },
        ObjectKind::Spike => SpriteRef::Spike,
        ObjectKind::Goal => SpriteRef::Goal,
    };
    canvas.blit(sprite, obj.rect.scrolled(offset_x).pos);
}

fn draw_player(canvas: &mut impl Canvas, player: &Player, offset_x: f32, elapsed_ms: u64) {
    if player.is_invincible() && elapsed_ms % FLASH_PERIOD_MS < FLASH_PERIOD_MS / 2 {
        return;
    }
    let rect = player.rect.scrolled(offset_x);
    match player.frame() {
        Some(frame) => canvas.blit(
            SpriteRef::Player {
                anim: frame.anim,
                facing: frame.facing,
                index: frame.index,
            },
            rect.pos,
        ),
        None => canvas.fill_rect(rect, Color::MAGENTA),
    }
}

fn draw_hud(canvas: &mut impl Canvas, session: &GameSession) {
    for i in 0..session.level.player.health() {
        let x = HUD_MARGIN + f32::from(i) * (HEART_SIZE + HEART_GAP);
        canvas.blit(SpriteRef::Heart, Vec2::new(x, HUD_MARGIN));
    }
    canvas.text(
        &format!("Level: {}", session.level_index() + 1),
        Vec2::new(HUD_MARGIN, 50.0),
        Color::WHITE,
    );
}

fn draw_banner(canvas: &mut impl Canvas, session: &GameSession, viewport: Vec2) {
    let center = viewport / 2.0;
    let headline = Vec2::new(center.x - 100.0, center.y - 50.0);
    let hint = Vec2::new(center.x - 150.0, center.y);

    match session.phase {
        GamePhase::Playing => {}
        GamePhase::GameOver => {
            canvas.text("GAME OVER", headline, Color::RED);
            canvas.text("Press R to Restart", hint, Color::WHITE);
        }
        GamePhase::GameWon => {
            canvas.text("YOU WON!", headline, Color::GREEN);
            canvas.text("Press Q to Quit", hint, Color::WHITE);
        }
        GamePhase::LevelTransition => {
            canvas.text(
                &format!("Level {} Complete!", session.level_index() + 1),
                Vec2::new(center.x - 150.0, center.y - 50.0),
                Color::YELLOW,
            );
        }
    }
}
