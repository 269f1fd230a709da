//! Rendering module
//!
//! Draws the game through a minimal immediate-mode `Surface` (colour, filled
//! and outlined rectangles, fixed-width text). Rendering only reads the state.

mod hud;
pub mod recording;

use glam::Vec2;

use crate::sim::enemy::EnemyKind;
use crate::sim::{GamePhase, GameState};

pub use recording::{DrawCommand, RecordingSurface};

/// Width of one glyph of the debug font
pub const CHAR_WIDTH: f32 = 8.0;

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(r, g, b, 255)
    }
}

/// Drawing primitives provided by the platform
pub trait Surface {
    fn set_draw_color(&mut self, color: Rgba);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2);
    fn draw_rect(&mut self, pos: Vec2, size: Vec2);
    /// Text with its top-left corner at `pos`
    fn draw_text(&mut self, pos: Vec2, text: &str);
}

pub(crate) mod palette {
    use super::Rgba;

    pub const BACKGROUND: Rgba = Rgba::rgb(14, 14, 18);
    pub const PLAYER: Rgba = Rgba::rgb(80, 200, 255);
    pub const PLAYER_DASH: Rgba = Rgba::rgb(255, 80, 80);
    pub const PLAYER_IFRAME: Rgba = Rgba::rgb(180, 220, 255);
    pub const BULLET: Rgba = Rgba::rgb(240, 240, 240);
    pub const ENEMY_BULLET: Rgba = Rgba::rgb(170, 255, 170);
    pub const TELEGRAPH: Rgba = Rgba::rgb(255, 240, 150);
    pub const BOSS: Rgba = Rgba::rgb(210, 210, 210);
    pub const MARKED: Rgba = Rgba::rgb(235, 235, 245);
    pub const DAMAGE_TAKEN: Rgba = Rgba::rgb(255, 120, 120);
    pub const DAMAGE_DEALT: Rgba = Rgba::rgb(240, 240, 240);
    pub const SHADOW: Rgba = Rgba(0, 0, 0, 120);
    pub const PANEL: Rgba = Rgba(18, 18, 22, 245);
    pub const FRAME: Rgba = Rgba(255, 255, 255, 45);
    pub const DIM: Rgba = Rgba(0, 0, 0, 150);
    pub const FOG: Rgba = Rgba(0, 0, 0, 45);
    pub const TITLE: Rgba = Rgba::rgb(245, 245, 245);
    pub const TEXT: Rgba = Rgba::rgb(220, 220, 220);
    pub const HP: Rgba = Rgba::rgb(220, 80, 80);
    pub const BAR_BACK: Rgba = Rgba::rgb(30, 30, 34);
}

fn enemy_color(kind: EnemyKind) -> Rgba {
    match kind {
        EnemyKind::Grunt => Rgba::rgb(200, 60, 60),
        EnemyKind::Runner => Rgba::rgb(240, 110, 110),
        EnemyKind::Tank => Rgba::rgb(160, 50, 50),
        EnemyKind::Archer => Rgba::rgb(140, 220, 140),
        EnemyKind::Wizard => Rgba::rgb(190, 160, 255),
    }
}

/// Draw one frame
pub fn render(state: &GameState, surface: &mut impl Surface) {
    surface.set_draw_color(palette::BACKGROUND);
    surface.fill_rect(Vec2::ZERO, state.screen);

    if state.phase == GamePhase::Menu {
        hud::menu(state, surface);
        return;
    }

    world(state, surface);
    hud::fog(state, surface);
    hud::minimap(state, surface);
    hud::status(state, surface);

    if let Some(banner) = state.boss.banner {
        hud::banner(state, surface, banner.text);
    }
    if state.phase == GamePhase::Dead {
        hud::death(state, surface);
    }
}

/// Entities, in world space shifted by the camera
fn world(state: &GameState, surface: &mut impl Surface) {
    let cam = &state.camera;

    for (_, e) in state.enemies.iter() {
        let color = if e.winding_up() {
            palette::TELEGRAPH
        } else {
            enemy_color(e.kind)
        };
        surface.set_draw_color(color);
        surface.fill_rect(cam.world_to_screen(e.pos), Vec2::splat(e.size));
    }

    surface.set_draw_color(palette::BULLET);
    for (_, b) in state.bullets.iter() {
        surface.fill_rect(cam.world_to_screen(b.pos) - Vec2::splat(2.0), Vec2::splat(4.0));
    }

    surface.set_draw_color(palette::ENEMY_BULLET);
    for (_, b) in state.enemy_bullets.iter() {
        surface.fill_rect(cam.world_to_screen(b.pos) - Vec2::splat(2.0), Vec2::splat(4.0));
    }

    let p = &state.player;
    let color = if p.is_dashing() {
        palette::PLAYER_DASH
    } else if p.iframe_timer > 0.0 {
        palette::PLAYER_IFRAME
    } else {
        palette::PLAYER
    };
    surface.set_draw_color(color);
    surface.fill_rect(cam.world_to_screen(p.pos), Vec2::splat(p.size));

    if let Some(boss) = &state.boss.boss {
        let color = if boss.kind.is_miniboss() {
            palette::BOSS
        } else {
            palette::MARKED
        };
        surface.set_draw_color(color);
        surface.fill_rect(cam.world_to_screen(boss.pos), Vec2::splat(boss.size));
        hud::boss_bar(state, surface, boss.hp_fraction());
    }

    for (_, n) in state.damage_nums.iter() {
        let color = if n.value < 0 {
            palette::DAMAGE_TAKEN
        } else {
            palette::DAMAGE_DEALT
        };
        surface.set_draw_color(color);
        let text = n.value.to_string();
        let half = text.len() as f32 * CHAR_WIDTH * 0.5;
        surface.draw_text(cam.world_to_screen(n.pos) - Vec2::new(half, 0.0), &text);
    }
}

/// Horizontally centred text
pub(crate) fn text_centered(surface: &mut impl Surface, cx: f32, y: f32, text: &str) {
    let w = text.len() as f32 * CHAR_WIDTH;
    surface.draw_text(Vec2::new(cx - w * 0.5, y), text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::boss::Boss;
    use crate::sim::boss::BossKind;
    use crate::sim::enemy::Enemy;
    use crate::sim::state::test_state;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_menu_frame() {
        let mut state = test_state();
        state.ledger.submit("AMY", 9);
        state.ledger.submit("BOB", 5);

        let mut surface = RecordingSurface::default();
        render(&state, &mut surface);

        assert!(surface.has_text("MARK"));
        assert!(surface.has_text("NAME: MARK_"));
        assert!(surface.has_text("LEADERBOARD (TOP 5)"));
        assert!(surface.has_text("1) AMY  -  9"));
        assert!(surface.has_text("2) BOB  -  5"));
        assert!(surface.has_text("ENTER: Start"));
        // No world drawn in the menu
        assert!(!surface.has_text_containing("KILLS"));
    }

    #[test]
    fn test_locked_name_has_no_caret() {
        let mut state = test_state();
        state.name_locked = true;
        let mut surface = RecordingSurface::default();
        render(&state, &mut surface);
        assert!(surface.has_text("NAME: MARK"));
        assert!(!surface.has_text("NAME: MARK_"));
    }

    #[test]
    fn test_play_frame() {
        let mut state = test_state();
        state.start_run();
        state.kills = 7;
        state.player.mag = 11;
        let mut rng = Pcg32::seed_from_u64(1);
        state
            .enemies
            .spawn(Enemy::new(EnemyKind::Tank, state.player.pos + Vec2::new(100.0, 0.0), &mut rng));

        let mut surface = RecordingSurface::default();
        render(&state, &mut surface);

        assert!(surface.has_text("HP 100/100"));
        assert!(surface.has_text("KILLS 7"));
        assert!(surface.has_text("AMMO 11/INF"));
        // Tank drawn relative to the camera
        let tank_at = state.camera.world_to_screen(state.player.pos + Vec2::new(100.0, 0.0));
        assert!(surface.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Fill { pos, size } if *pos == tank_at && *size == Vec2::splat(44.0)
        )));
    }

    #[test]
    fn test_reload_and_death_overlays() {
        let mut state = test_state();
        state.start_run();
        state.player.reloading = true;
        state.player.reload_timer = state.player.reload_time * 0.5;
        state.phase = GamePhase::Dead;
        state.kills = 3;

        let mut surface = RecordingSurface::default();
        render(&state, &mut surface);
        assert!(surface.has_text("RELOADING..."));
        assert!(surface.has_text("YOU DIED"));
        assert!(surface.has_text("Kills: 3"));
    }

    #[test]
    fn test_boss_bar_and_banner() {
        let mut state = test_state();
        state.start_run();
        state.kills = 150;
        let mut rng = Pcg32::seed_from_u64(1);
        state.boss.boss = Some(Boss::spawn(BossKind::Marked, state.player.pos, state.world, &mut rng));
        state.boss.banner = Some(crate::sim::Banner::new("THE MARKED HAS ARRIVED", 1.2));
        if let Some(boss) = state.boss.boss.as_mut() {
            boss.take_damage(450);
        }

        let mut surface = RecordingSurface::default();
        render(&state, &mut surface);
        assert!(surface.has_text("THE MARKED HAS ARRIVED"));
        // Half-depleted bar
        assert!(surface.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Fill { size, .. } if *size == Vec2::new(210.0, 10.0)
        )));
    }
}
