//! Combat resolution
//!
//! Projectile integration, hit tests, the player's immunity gate, contact
//! damage cadence, regeneration and floating damage numbers.

use glam::Vec2;

use super::boss::defeat_boss;
use super::collision::outside_world;
use super::enemy::Shot;
use super::pool::Pool;
use super::state::{DamageNum, EnemyBullet, GamePhase, GameState};
use crate::consts::*;

/// Apply damage to the player through the immunity gate. Returns whether it
/// landed. A hit that empties hp ends the run and records the score once.
pub fn damage_player(state: &mut GameState, dmg: u32) -> bool {
    if state.phase != GamePhase::Playing || !state.player.can_take_damage() {
        return false;
    }

    let player = &mut state.player;
    player.hp = player.hp.saturating_sub(dmg);
    player.iframe_timer = player.iframe_time;
    state.regen.time_since_hit = 0.0;
    state.regen.acc = 0.0;

    let at = Vec2::new(player.center().x, player.pos.y - 6.0);
    spawn_damage_num(&mut state.damage_nums, at, -(dmg as i32));

    if state.player.hp == 0 {
        end_run(state);
    }
    true
}

fn end_run(state: &mut GameState) {
    state.phase = GamePhase::Dead;
    state.last_run_kills = state.kills;
    log::info!("Run ended: {} with {} kills", state.name, state.kills);

    if !state.score_submitted {
        state.score_submitted = true;
        state.ledger.submit(&state.name, state.kills);
    }
}

/// Queue floating text; dropped silently when the pool is full
pub fn spawn_damage_num(pool: &mut Pool<DamageNum>, pos: Vec2, value: i32) {
    pool.spawn(DamageNum {
        pos,
        value,
        ttl: DAMAGE_NUM_TTL,
    });
}

/// Float damage numbers upward and expire them
pub fn update_damage_nums(pool: &mut Pool<DamageNum>, dt: f32) {
    pool.retain(|n| {
        n.ttl -= dt;
        n.pos.y -= DAMAGE_NUM_RISE * dt;
        n.ttl > 0.0
    });
}

/// Turn requested shots into enemy bullets. Shots beyond capacity are lost.
pub fn fire_shots(pool: &mut Pool<EnemyBullet>, shots: &[Shot]) {
    for shot in shots {
        let fired = pool.spawn(EnemyBullet {
            pos: shot.origin,
            vel: shot.dir * shot.speed,
            radius: ENEMY_BULLET_RADIUS,
            damage: shot.damage,
        });
        if fired.is_none() {
            break;
        }
    }
}

/// Move every projectile and cull the ones that left the world margin
pub fn integrate_projectiles(state: &mut GameState, dt: f32) {
    let world = state.world;
    state.bullets.retain(|b| {
        b.pos += b.vel * dt;
        !outside_world(b.pos, world, BULLET_CULL_MARGIN)
    });
    state.enemy_bullets.retain(|b| {
        b.pos += b.vel * dt;
        !outside_world(b.pos, world, ENEMY_BULLET_CULL_MARGIN)
    });
}

/// Enemy bullets inside the player box are consumed whether or not the
/// player is currently immune
pub fn resolve_enemy_bullets(state: &mut GameState) {
    let player = state.player.bounds();
    let mut hits = Vec::new();
    state.enemy_bullets.retain(|b| {
        if player.contains(b.pos) {
            hits.push(b.damage);
            false
        } else {
            true
        }
    });
    for dmg in hits {
        damage_player(state, dmg);
    }
}

/// Run enemy behaviors, then contact and bullet tests for each enemy
pub fn resolve_enemies(state: &mut GameState, dt: f32) {
    state.contact.touched = false;
    state.contact.pending = DEFAULT_CONTACT_DAMAGE;

    let env = state.surroundings();
    let player = state.player.bounds();

    for i in 0..state.enemies.capacity() {
        let Some(enemy) = state.enemies.get_mut(i) else {
            continue;
        };
        let shots = enemy.tick(&env, &mut state.rng, dt);
        let bounds = enemy.bounds();
        let touch_damage = enemy.touch_damage;
        let hp = enemy.hp;
        fire_shots(&mut state.enemy_bullets, &shots);

        // Contact consumes the enemy; the last one to touch sets the damage.
        // A consumed enemy still soaks up a bullet this tick.
        if bounds.overlaps(&player) {
            state.contact.touched = true;
            state.contact.pending = touch_damage;
            state.enemies.kill(i);
        }

        let hit = state
            .bullets
            .iter()
            .find(|(_, b)| bounds.contains(b.pos))
            .map(|(j, _)| j);
        let Some(j) = hit else {
            continue;
        };
        state.bullets.kill(j);

        let at = Vec2::new(bounds.center().x, bounds.min.y);
        spawn_damage_num(&mut state.damage_nums, at, BULLET_ENEMY_DAMAGE);

        let hp = hp - BULLET_ENEMY_DAMAGE;
        if let Some(enemy) = state.enemies.get_mut(i) {
            enemy.hp = hp;
        }
        if hp <= 0 {
            state.enemies.kill(i);
            state.kills += 1;
        }
    }
}

/// Bullets into the boss, boss behavior, boss contact and defeat
pub fn resolve_boss(state: &mut GameState, dt: f32) {
    let env = state.surroundings();
    let player = state.player.bounds();

    let Some(boss) = state.boss.boss.as_mut() else {
        return;
    };

    // Every bullet inside the box lands, not only the first
    let bounds = boss.bounds();
    let mut hits = 0;
    state.bullets.retain(|b| {
        let inside = bounds.contains(b.pos);
        if inside {
            hits += 1;
        }
        !inside
    });
    let at = Vec2::new(bounds.center().x, bounds.min.y);
    for _ in 0..hits {
        boss.take_damage(BULLET_BOSS_DAMAGE);
        spawn_damage_num(&mut state.damage_nums, at, BULLET_BOSS_DAMAGE);
    }

    let shots = boss.tick(&env, &mut state.rng, dt);
    let touching = boss.bounds().overlaps(&player);
    let contact_damage = boss.kind.contact_damage();
    let defeated = boss.is_defeated();

    fire_shots(&mut state.enemy_bullets, &shots);
    if touching {
        damage_player(state, contact_damage);
    }
    if defeated {
        defeat_boss(state);
    }
}

/// At most one contact hit per interval, gated like any other damage
pub fn apply_contact_damage(state: &mut GameState, dt: f32) {
    state.contact.cooldown -= dt;
    if state.contact.touched && state.contact.cooldown <= 0.0 {
        state.contact.cooldown = CONTACT_DAMAGE_INTERVAL;
        let pending = state.contact.pending;
        damage_player(state, pending);
    }
}

/// Heal in whole points after a quiet period, carrying the remainder
pub fn regenerate(state: &mut GameState, dt: f32) {
    let regen = &mut state.regen;
    let player = &mut state.player;

    regen.time_since_hit += dt;
    if regen.time_since_hit < regen.delay || player.hp == 0 || player.hp >= player.hp_max {
        return;
    }

    regen.acc += regen.rate * dt;
    let add = regen.acc.floor();
    if add >= 1.0 {
        player.hp = (player.hp + add as u32).min(player.hp_max);
        regen.acc -= add;
    }
}
