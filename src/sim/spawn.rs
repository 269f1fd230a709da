//! Spawn director
//!
//! Picks what to spawn from the kill count, keeps ranged units from
//! swarming the screen, scales speed with difficulty and places new enemies
//! just outside the camera view.

use glam::Vec2;
use rand::Rng;

use super::enemy::{ARCHER_COOLDOWN_MIN, Behavior, Enemy, EnemyKind};
use super::state::GameState;
use crate::clamp_to_world;
use crate::consts::{DIFFICULTY_CAP, SPAWN_BASE_INTERVAL, SPAWN_MARGIN, SPAWN_MIN_INTERVAL};

/// Speed multiplier for a kill count. Rises 1% per kill up to 80 kills,
/// then 0.2% per kill, capped at 2x.
pub fn difficulty_scale(kills: u32) -> f32 {
    let s = if kills <= 80 {
        1.0 + 0.010 * kills as f32
    } else {
        1.8 + 0.0020 * (kills - 80) as f32
    };
    s.min(DIFFICULTY_CAP)
}

/// Type mix by difficulty tier. `roll` is uniform in [0, 100).
pub fn roll_kind(kills: u32, roll: u32) -> EnemyKind {
    use EnemyKind::*;

    let bands: &[(u32, EnemyKind)] = match kills {
        0..5 => &[(85, Grunt), (97, Runner), (100, Archer)],
        5..15 => &[(55, Grunt), (80, Runner), (92, Archer), (100, Tank)],
        15..60 => &[(42, Grunt), (63, Runner), (82, Archer), (92, Wizard), (100, Tank)],
        _ => &[(38, Grunt), (56, Runner), (78, Archer), (84, Wizard), (100, Tank)],
    };
    bands
        .iter()
        .find(|(upper, _)| roll < *upper)
        .map_or(Tank, |(_, kind)| *kind)
}

/// Most archers allowed on screen at once
pub fn archer_cap(kills: u32) -> usize {
    match kills {
        0..80 => 3,
        80..140 => 4,
        _ => 5,
    }
}

/// Most wizards allowed on screen at once
pub fn wizard_cap(kills: u32) -> usize {
    match kills {
        0..80 => 1,
        80..140 => 2,
        _ => 3,
    }
}

/// Swap a capped ranged pick for a grunt so spawn pressure stays the same
pub fn apply_soft_cap(kind: EnemyKind, kills: u32, on_screen: usize) -> EnemyKind {
    let cap = match kind {
        EnemyKind::Archer => archer_cap(kills),
        EnemyKind::Wizard => wizard_cap(kills),
        _ => return kind,
    };
    if on_screen >= cap { EnemyKind::Grunt } else { kind }
}

/// Delay before the next spawn after a successful one
pub fn spawn_interval(kills: u32) -> f32 {
    let faster = if kills > 20 {
        0.75
    } else if kills > 10 {
        0.85
    } else {
        1.0
    };
    (SPAWN_BASE_INTERVAL * faster).max(SPAWN_MIN_INTERVAL)
}

/// Apply difficulty to a freshly created enemy: speed scaled then capped per
/// type, archer fire rate scaled with a floor and a desync jitter.
pub fn scale_enemy(enemy: &mut Enemy, kills: u32, rng: &mut impl Rng) {
    let s = difficulty_scale(kills);
    enemy.speed = (enemy.speed * s).min(enemy.kind.speed_cap());

    if let Behavior::Archer(ref mut archer) = enemy.behavior {
        archer.shoot_cooldown = (archer.shoot_cooldown / (0.85 + 0.15 * s)).max(ARCHER_COOLDOWN_MIN);
        archer.shoot_timer += rng.random_range(0..40) as f32 / 100.0;
    }
}

/// Random point on the ring just outside the viewport, clamped into the world
pub fn edge_spawn_point(rng: &mut impl Rng, camera: Vec2, screen: Vec2, world: Vec2, size: f32) -> Vec2 {
    let left = camera.x - SPAWN_MARGIN;
    let right = camera.x + screen.x + SPAWN_MARGIN;
    let top = camera.y - SPAWN_MARGIN;
    let bottom = camera.y + screen.y + SPAWN_MARGIN;

    let span_x = (screen.x + 2.0 * SPAWN_MARGIN).max(1.0) as u32;
    let span_y = (screen.y + 2.0 * SPAWN_MARGIN).max(1.0) as u32;

    let pos = match rng.random_range(0..4) {
        0 => Vec2::new(left, top + rng.random_range(0..span_y) as f32),
        1 => Vec2::new(right, top + rng.random_range(0..span_y) as f32),
        2 => Vec2::new(left + rng.random_range(0..span_x) as f32, top),
        _ => Vec2::new(left + rng.random_range(0..span_x) as f32, bottom),
    };
    clamp_to_world(pos, size, world)
}

/// Spawn one enemy if a slot is free. Returns the slot used.
pub fn spawn_enemy(state: &mut GameState) -> Option<usize> {
    if state.enemies.is_full() {
        return None;
    }

    let kills = state.kills;
    let rolled = roll_kind(kills, state.rng.random_range(0..100));
    let kind = apply_soft_cap(rolled, kills, state.count_on_screen(rolled));

    let mut enemy = Enemy::new(kind, Vec2::ZERO, &mut state.rng);
    scale_enemy(&mut enemy, kills, &mut state.rng);
    enemy.pos = edge_spawn_point(&mut state.rng, state.camera.pos, state.screen, state.world, enemy.size);

    log::debug!("Spawning {} (speed {:.0}) at {:?}", kind.name(), enemy.speed, enemy.pos);

    let slot = state.enemies.spawn(enemy);
    state.spawn_timer = spawn_interval(kills);
    slot
}

/// Advance the spawn timer; suppressed entirely while a boss holds the lock
pub fn tick_spawner(state: &mut GameState, dt: f32) {
    if state.boss.spawns_locked() {
        return;
    }
    state.spawn_timer -= dt;
    if state.spawn_timer <= 0.0 {
        spawn_enemy(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::test_state;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_difficulty_breakpoints() {
        assert_eq!(difficulty_scale(0), 1.0);
        assert!((difficulty_scale(50) - 1.5).abs() < 1e-6);
        assert!((difficulty_scale(80) - 1.8).abs() < 1e-6);
        assert!((difficulty_scale(130) - 1.9).abs() < 1e-6);
        assert_eq!(difficulty_scale(180), 2.0);
        assert_eq!(difficulty_scale(10_000), 2.0);
    }

    #[test]
    fn test_type_mix_tiers() {
        assert_eq!(roll_kind(0, 84), EnemyKind::Grunt);
        assert_eq!(roll_kind(0, 85), EnemyKind::Runner);
        assert_eq!(roll_kind(4, 99), EnemyKind::Archer);
        assert_eq!(roll_kind(5, 95), EnemyKind::Tank);
        assert_eq!(roll_kind(14, 91), EnemyKind::Archer);
        assert_eq!(roll_kind(15, 90), EnemyKind::Wizard);
        assert_eq!(roll_kind(59, 93), EnemyKind::Tank);
        assert_eq!(roll_kind(60, 83), EnemyKind::Wizard);
        assert_eq!(roll_kind(60, 84), EnemyKind::Tank);
        // No wizards before 15 kills
        assert!((0..100).all(|r| roll_kind(14, r) != EnemyKind::Wizard));
    }

    #[test]
    fn test_soft_caps() {
        assert_eq!(apply_soft_cap(EnemyKind::Archer, 0, 2), EnemyKind::Archer);
        assert_eq!(apply_soft_cap(EnemyKind::Archer, 0, 3), EnemyKind::Grunt);
        assert_eq!(apply_soft_cap(EnemyKind::Archer, 80, 3), EnemyKind::Archer);
        assert_eq!(apply_soft_cap(EnemyKind::Archer, 140, 5), EnemyKind::Grunt);
        assert_eq!(apply_soft_cap(EnemyKind::Wizard, 20, 1), EnemyKind::Grunt);
        assert_eq!(apply_soft_cap(EnemyKind::Wizard, 100, 1), EnemyKind::Wizard);
        assert_eq!(apply_soft_cap(EnemyKind::Tank, 0, 99), EnemyKind::Tank);
    }

    #[test]
    fn test_capped_archer_spawns_grunt() {
        let mut state = test_state();
        let mut rng = Pcg32::seed_from_u64(2);
        let center = state.player.pos;
        for _ in 0..3 {
            state.enemies.spawn(Enemy::new(EnemyKind::Archer, center, &mut rng));
        }
        assert_eq!(state.count_on_screen(EnemyKind::Archer), 3);

        // Find a seed whose first roll picks an archer at 0 kills (roll >= 97)
        let seed = (0..10_000u64)
            .find(|s| Pcg32::seed_from_u64(*s).random_range(0..100) >= 97)
            .unwrap();
        state.rng = Pcg32::seed_from_u64(seed);
        let slot = spawn_enemy(&mut state).unwrap();
        assert_eq!(state.enemies.get(slot).unwrap().kind, EnemyKind::Grunt);
    }

    #[test]
    fn test_off_screen_archers_not_counted() {
        let mut state = test_state();
        let mut rng = Pcg32::seed_from_u64(2);
        state.enemies.spawn(Enemy::new(EnemyKind::Archer, Vec2::new(10.0, 10.0), &mut rng));
        assert_eq!(state.count_on_screen(EnemyKind::Archer), 0);
    }

    #[test]
    fn test_spawn_cadence() {
        assert_eq!(spawn_interval(0), 1.0);
        assert_eq!(spawn_interval(11), 0.85);
        assert_eq!(spawn_interval(21), 0.75);
    }

    #[test]
    fn test_spawn_outside_view() {
        let state = test_state();
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..200 {
            let p = edge_spawn_point(&mut rng, state.camera.pos, state.screen, state.world, 28.0);
            let cam = state.camera.pos;
            let inside_view = p.x > cam.x && p.x < cam.x + state.screen.x - 28.0
                && p.y > cam.y && p.y < cam.y + state.screen.y - 28.0;
            assert!(!inside_view, "{p:?} spawned inside the viewport");
            assert!(p.x >= 0.0 && p.y >= 0.0 && p.x <= 2400.0 - 28.0 && p.y <= 2400.0 - 28.0);
        }
    }

    #[test]
    fn test_full_pool_skips_spawn() {
        let mut state = test_state();
        let mut rng = Pcg32::seed_from_u64(2);
        while state.enemies.spawn(Enemy::new(EnemyKind::Grunt, Vec2::ZERO, &mut rng)).is_some() {}
        state.spawn_timer = 0.0;
        tick_spawner(&mut state, 0.016);
        assert!(state.spawn_timer <= 0.0, "timer stays expired so the next tick retries");
    }

    #[test]
    fn test_boss_lock_suppresses_spawning() {
        let mut state = test_state();
        state.kills = 30;
        crate::sim::boss::check_triggers(&mut state);
        assert!(state.boss.spawns_locked());

        state.spawn_timer = 0.0;
        for _ in 0..100 {
            tick_spawner(&mut state, 0.05);
        }
        assert_eq!(state.enemies.live_count(), 0);
    }

    #[test]
    fn test_archer_cooldown_floor() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut e = Enemy::new(EnemyKind::Archer, Vec2::ZERO, &mut rng);
        scale_enemy(&mut e, 500, &mut rng);
        match e.behavior {
            Behavior::Archer(a) => {
                assert!(a.shoot_cooldown >= ARCHER_COOLDOWN_MIN);
                assert!((a.shoot_cooldown - 1.35 / 1.15).abs() < 1e-5);
            }
            _ => unreachable!(),
        }
    }

    proptest! {
        #[test]
        fn prop_difficulty_monotonic(a in 0u32..5000, b in 0u32..5000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(difficulty_scale(lo) <= difficulty_scale(hi));
            prop_assert!(difficulty_scale(hi) <= DIFFICULTY_CAP);
        }

        #[test]
        fn prop_speed_never_exceeds_ceiling(kills in 0u32..2000, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            for kind in EnemyKind::ALL {
                let mut e = Enemy::new(kind, Vec2::ZERO, &mut rng);
                scale_enemy(&mut e, kills, &mut rng);
                prop_assert!(e.speed <= kind.speed_cap());
                prop_assert!(e.speed >= kind.stats().speed);
            }
        }

        #[test]
        fn prop_spawned_enemies_respect_ceiling(kills in 0u32..400, seed in any::<u64>()) {
            let mut state = test_state();
            state.rng = Pcg32::seed_from_u64(seed);
            state.kills = kills;
            for _ in 0..8 {
                if let Some(slot) = spawn_enemy(&mut state) {
                    let e = state.enemies.get(slot).unwrap();
                    prop_assert!(e.speed <= e.kind.speed_cap());
                }
            }
        }
    }
}
