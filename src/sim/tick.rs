//! Per-frame simulation tick
//!
//! Advances the game by one variable `dt` step in a fixed order: name entry,
//! state machine, player, camera, firing, boss triggers, spawning, then the
//! combat passes and cosmetic timers.

use std::cmp::Ordering;

use glam::Vec2;

use super::boss::check_triggers;
use super::combat::{
    apply_contact_damage, integrate_projectiles, regenerate, resolve_boss, resolve_enemies,
    resolve_enemy_bullets, update_damage_nums,
};
use super::spawn::tick_spawner;
use super::state::{Bullet, GamePhase, GameState, Motion};
use crate::clamp_to_world;
use crate::platform::{InputFrame, Key, TextEvent};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Key table and mouse for this frame
    pub frame: InputFrame,
    /// Name-entry events since the last tick, in arrival order
    pub events: Vec<TextEvent>,
    /// Idle/demo mode - autopilot plays the run
    pub idle_mode: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    for event in &input.events {
        state.handle_text_event(event);
    }

    let mut frame = input.frame;
    if input.idle_mode {
        autopilot(state, &mut frame);
    }

    let confirm = state.confirm_latch.pressed(frame.is_down(Key::Confirm));
    match state.phase {
        GamePhase::Menu => {
            if confirm {
                state.start_run();
            }
            return;
        }
        GamePhase::Dead => {
            if confirm {
                state.reset_run();
                state.phase = GamePhase::Menu;
            }
            return;
        }
        GamePhase::Playing => {
            if confirm {
                log::info!("Run abandoned at {} kills", state.kills);
                state.phase = GamePhase::Menu;
                return;
            }
        }
    }

    let reload = state.reload_latch.pressed(frame.is_down(Key::Reload));
    step_player(state, &frame, reload, dt);
    state
        .camera
        .follow(state.player.center(), state.screen, state.world, dt);
    aim_and_fire(state, &frame);

    check_triggers(state);
    tick_spawner(state, dt);

    integrate_projectiles(state, dt);
    resolve_enemy_bullets(state);
    resolve_enemies(state, dt);
    resolve_boss(state, dt);
    apply_contact_damage(state, dt);
    regenerate(state, dt);

    state.boss.tick_banner(dt);
    update_damage_nums(&mut state.damage_nums, dt);
}

/// Timers, reload, movement and dash
fn step_player(state: &mut GameState, frame: &InputFrame, reload: bool, dt: f32) {
    let world = state.world;
    let p = &mut state.player;

    p.tick_cooldowns(dt);
    if reload {
        p.start_reload();
    }
    p.advance_reload(dt);

    let axis = frame.move_axis();
    if !p.is_dashing() && p.dash_cooldown_timer <= 0.0 && frame.is_down(Key::Dash) && axis != Vec2::ZERO {
        p.motion = Motion::Dashing {
            remaining: p.dash_time,
        };
        p.dash_cooldown_timer = p.dash_cooldown;
    }

    p.dir = axis.normalize_or_zero();
    let speed = if p.is_dashing() { p.dash_speed } else { p.speed };
    p.pos += p.dir * speed * dt;

    // Dash cooldown only recovers while walking
    if let Motion::Dashing { remaining } = p.motion {
        let left = remaining - dt;
        p.motion = if left <= 0.0 {
            Motion::Walking
        } else {
            Motion::Dashing { remaining: left }
        };
    } else if p.dash_cooldown_timer > 0.0 {
        p.dash_cooldown_timer -= dt;
    }

    p.pos = clamp_to_world(p.pos, p.size, world);
}

/// Fire toward the mouse while the trigger is held
fn aim_and_fire(state: &mut GameState, frame: &InputFrame) {
    if !frame.fire_held() || !state.player.can_fire() {
        return;
    }
    let origin = state.player.center();
    let Some(dir) = (state.camera.screen_to_world(frame.mouse) - origin).try_normalize() else {
        return;
    };
    // A full pool drops the shot without spending the round
    if state.bullets.spawn(Bullet::new(origin, dir)).is_some() {
        state.player.spend_round();
    }
}

const AUTOPILOT_COMFORT: f32 = 320.0;
const AUTOPILOT_CROWD_RADIUS: f32 = 140.0;
const AUTOPILOT_CROWD: usize = 3;

/// Demo driver: back away from the nearest threat, shoot it, dash when crowded
fn autopilot(state: &GameState, frame: &mut InputFrame) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let me = state.player.center();

    let nearest = state
        .enemies
        .iter()
        .map(|(_, e)| e.center())
        .chain(state.boss.boss.as_ref().map(|b| b.center()))
        .min_by(|a, b| {
            a.distance_squared(me)
                .partial_cmp(&b.distance_squared(me))
                .unwrap_or(Ordering::Equal)
        });

    // Drift back toward the middle so retreats don't end in a corner
    let mut steer = (state.world * 0.5 - me).normalize_or_zero() * 0.6;
    if let Some(target) = nearest {
        *frame = frame.with_mouse(state.camera.world_to_screen(target), true);
        if target.distance(me) < AUTOPILOT_COMFORT {
            steer += (me - target).normalize_or_zero();
        }
    }

    frame.set(Key::Right, steer.x > 0.3);
    frame.set(Key::Left, steer.x < -0.3);
    frame.set(Key::Down, steer.y > 0.3);
    frame.set(Key::Up, steer.y < -0.3);

    let crowd = state
        .enemies
        .iter()
        .filter(|(_, e)| e.center().distance(me) < AUTOPILOT_CROWD_RADIUS)
        .count();
    frame.set(Key::Dash, crowd >= AUTOPILOT_CROWD);
}
