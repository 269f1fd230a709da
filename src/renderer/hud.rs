//! Screen-space overlays: menu, HUD, minimap, fog, banners

use glam::Vec2;

use super::{Surface, palette, text_centered};
use crate::consts::LEADERBOARD_TOP;
use crate::sim::{GameState, Reserve};

/// Shadowed, framed panel centred on screen. Returns its top-left corner.
fn center_panel(surface: &mut impl Surface, screen: Vec2, size: Vec2) -> Vec2 {
    let at = (screen - size) * 0.5;

    surface.set_draw_color(palette::SHADOW);
    surface.fill_rect(at + Vec2::new(6.0, 8.0), size);

    surface.set_draw_color(palette::PANEL);
    surface.fill_rect(at, size);

    surface.set_draw_color(palette::FRAME);
    surface.draw_rect(at, size);
    at
}

/// Framed progress bar filled to `t` (clamped to [0, 1])
fn bar(surface: &mut impl Surface, pos: Vec2, size: Vec2, t: f32, fill: super::Rgba) {
    surface.set_draw_color(palette::FRAME);
    surface.draw_rect(pos - Vec2::splat(2.0), size + Vec2::splat(4.0));

    surface.set_draw_color(palette::BAR_BACK);
    surface.fill_rect(pos, size);

    surface.set_draw_color(fill);
    surface.fill_rect(pos, Vec2::new(size.x * t.clamp(0.0, 1.0), size.y));
}

pub(super) fn menu(state: &GameState, surface: &mut impl Surface) {
    let top = center_panel(surface, state.screen, Vec2::new(600.0, 380.0)).y;
    let cx = state.screen.x * 0.5;

    surface.set_draw_color(palette::TITLE);
    text_centered(surface, cx, top + 55.0, "MARK");

    surface.set_draw_color(palette::TEXT);
    let caret = if state.name_locked { "" } else { "_" };
    text_centered(surface, cx, top + 105.0, &format!("NAME: {}{caret}", state.name));
    text_centered(surface, cx, top + 135.0, &format!("LAST RUN: {}", state.last_run_kills));
    text_centered(
        surface,
        cx,
        top + 160.0,
        &format!("YOUR BEST: {}", state.ledger.best_for(&state.name)),
    );

    text_centered(surface, cx, top + 195.0, &format!("LEADERBOARD (TOP {LEADERBOARD_TOP})"));
    for (i, entry) in state.ledger.top(LEADERBOARD_TOP).iter().enumerate() {
        let row = format!("{}) {}  -  {}", i + 1, entry.name, entry.best_kills);
        text_centered(surface, cx, top + 220.0 + i as f32 * 18.0, &row);
    }

    text_centered(surface, cx, top + 320.0, "ENTER: Start");
    text_centered(surface, cx, top + 345.0, "Backspace: delete   Esc: clear");
}

/// Darkened border hinting at the view edge
pub(super) fn fog(state: &GameState, surface: &mut impl Surface) {
    let Vec2 { x: w, y: h } = state.screen;
    let (fw, fh) = (55.0, 45.0);

    surface.set_draw_color(palette::FOG);
    surface.fill_rect(Vec2::ZERO, Vec2::new(fw, h));
    surface.fill_rect(Vec2::new(w - fw, 0.0), Vec2::new(fw, h));
    surface.fill_rect(Vec2::ZERO, Vec2::new(w, fh));
    surface.fill_rect(Vec2::new(0.0, h - fh), Vec2::new(w, fh));
}

/// Whole-world overview in the bottom-right corner
pub(super) fn minimap(state: &GameState, surface: &mut impl Surface) {
    let size = Vec2::splat(150.0);
    let at = state.screen - size - Vec2::new(16.0, 16.0 + 45.0);

    surface.set_draw_color(palette::DIM);
    surface.fill_rect(at, size);
    surface.set_draw_color(palette::FRAME);
    surface.draw_rect(at, size);

    let to_map = |p: Vec2| at + p / state.world * size;

    surface.set_draw_color(palette::PLAYER);
    surface.fill_rect(to_map(state.player.pos) - Vec2::splat(2.0), Vec2::splat(4.0));

    surface.set_draw_color(super::enemy_color(crate::sim::EnemyKind::Grunt));
    for (_, e) in state.enemies.iter() {
        surface.fill_rect(to_map(e.pos) - Vec2::splat(2.0), Vec2::splat(3.0));
    }

    if let Some(boss) = &state.boss.boss {
        surface.set_draw_color(palette::MARKED);
        surface.fill_rect(to_map(boss.pos) - Vec2::splat(3.0), Vec2::splat(6.0));
    }
}

/// Top panel: hp, kills, ammo or reload progress, control hints
pub(super) fn status(state: &GameState, surface: &mut impl Surface) {
    let p = &state.player;
    let panel = Vec2::new(720.0, 64.0);
    let at = Vec2::new((state.screen.x - panel.x) * 0.5, 16.0);

    surface.set_draw_color(palette::DIM);
    surface.fill_rect(at, panel);
    surface.set_draw_color(palette::FRAME);
    surface.draw_rect(at, panel);

    let hp01 = if p.hp_max > 0 {
        p.hp as f32 / p.hp_max as f32
    } else {
        0.0
    };
    bar(surface, at + Vec2::new(18.0, 22.0), Vec2::new(220.0, 18.0), hp01, palette::HP);

    let text_y = at.y + 6.0;
    surface.set_draw_color(palette::TEXT);
    surface.draw_text(Vec2::new(at.x + 18.0, text_y), &format!("HP {}/{}", p.hp, p.hp_max));
    surface.draw_text(
        Vec2::new(at.x + panel.x * 0.5 - 70.0, text_y),
        &format!("KILLS {}", state.kills),
    );

    let ammo_x = at.x + panel.x - 300.0;
    let ammo = match (p.reloading, p.reserve) {
        (true, _) => "RELOADING...".to_string(),
        (false, Reserve::Infinite) => format!("AMMO {}/INF", p.mag),
        (false, Reserve::Rounds(left)) => format!("AMMO {}/{}", p.mag, left),
    };
    surface.draw_text(Vec2::new(ammo_x, text_y), &ammo);

    if p.reloading {
        let progress = 1.0 - p.reload_timer / p.reload_time;
        bar(
            surface,
            at + Vec2::new(panel.x - 210.0, 40.0),
            Vec2::new(180.0, 10.0),
            progress,
            palette::BULLET,
        );
    }

    surface.set_draw_color(palette::TEXT);
    surface.draw_text(
        Vec2::new(state.screen.x * 0.5 - 260.0, at.y + panel.y + 8.0),
        "LMB/CTRL shoot  |  R reload  |  SPACE dash (invuln)  |  ENTER menu",
    );
}

/// Boss health across the top of the screen
pub(super) fn boss_bar(state: &GameState, surface: &mut impl Surface, hp01: f32) {
    let size = Vec2::new(420.0, 10.0);
    let at = Vec2::new((state.screen.x - size.x) * 0.5, 96.0);

    surface.set_draw_color(palette::DIM);
    surface.fill_rect(at, size);
    surface.set_draw_color(palette::FRAME);
    surface.draw_rect(at, size);

    surface.set_draw_color(palette::BULLET);
    surface.fill_rect(at, Vec2::new(size.x * hp01.clamp(0.0, 1.0), size.y));
}

pub(super) fn banner(state: &GameState, surface: &mut impl Surface, text: &str) {
    let size = Vec2::new(460.0, 86.0);
    let top = center_panel(surface, state.screen, size).y;
    surface.set_draw_color(palette::BOSS);
    text_centered(surface, state.screen.x * 0.5, top + 55.0, text);
}

pub(super) fn death(state: &GameState, surface: &mut impl Surface) {
    let top = center_panel(surface, state.screen, Vec2::new(560.0, 240.0)).y;
    let cx = state.screen.x * 0.5;

    surface.set_draw_color(palette::TITLE);
    text_centered(surface, cx, top + 60.0, "YOU DIED");

    surface.set_draw_color(palette::TEXT);
    text_centered(surface, cx, top + 105.0, &format!("Kills: {}", state.kills));
    text_centered(surface, cx, top + 155.0, "Press ENTER to return to menu");
}
