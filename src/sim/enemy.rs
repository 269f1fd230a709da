//! Enemy types and per-type behavior
//!
//! Melee types (grunt, runner, tank) chase the player. Archers kite at a
//! standoff distance and fire telegraphed single shots. Wizards blink around
//! the player and cast a cone plus a ring of slow projectiles.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::ENEMY_BULLET_SPEED;
use crate::{annulus_point, clamp_to_world, perpendicular, square_center};

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Grunt,
    Runner,
    Tank,
    Archer,
    Wizard,
}

/// Base stats before difficulty scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub size: f32,
    pub speed: f32,
    pub hp: i32,
    pub touch_damage: u32,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Grunt,
        EnemyKind::Runner,
        EnemyKind::Tank,
        EnemyKind::Archer,
        EnemyKind::Wizard,
    ];

    pub fn stats(self) -> EnemyStats {
        let (size, speed, hp, touch_damage) = match self {
            EnemyKind::Grunt => (28.0, 125.0, 50, 14),
            EnemyKind::Runner => (18.0, 245.0, 25, 12),
            EnemyKind::Tank => (44.0, 88.0, 150, 24),
            EnemyKind::Archer => (24.0, 105.0, 45, 14),
            EnemyKind::Wizard => (26.0, 95.0, 70, 16),
        };
        EnemyStats {
            size,
            speed,
            hp,
            touch_damage,
        }
    }

    /// Absolute speed ceiling, whatever the difficulty
    pub fn speed_cap(self) -> f32 {
        match self {
            EnemyKind::Grunt => 190.0,
            EnemyKind::Runner => 320.0,
            EnemyKind::Tank => 125.0,
            EnemyKind::Archer => 150.0,
            EnemyKind::Wizard => 135.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Grunt => "grunt",
            EnemyKind::Runner => "runner",
            EnemyKind::Tank => "tank",
            EnemyKind::Archer => "archer",
            EnemyKind::Wizard => "wizard",
        }
    }
}

// Archer tuning
pub const ARCHER_COOLDOWN: f32 = 1.35;
pub const ARCHER_COOLDOWN_MIN: f32 = 0.75;
const ARCHER_FIRST_SHOT: f32 = 0.55;
const ARCHER_STANDOFF: f32 = 240.0;
const ARCHER_TOO_CLOSE: f32 = 30.0;
const ARCHER_TOO_FAR: f32 = 60.0;
const ARCHER_APPROACH_WEIGHT: f32 = 0.55;
const ARCHER_STRAFE_WEIGHT: f32 = 0.75;
const ARCHER_WINDUP: f32 = 0.18;
const ARCHER_SHOT_DAMAGE: u32 = 10;

// Wizard tuning
const WIZARD_COOLDOWN: f32 = 2.10;
const WIZARD_FIRST_CAST: f32 = 0.70;
const WIZARD_WINDUP: f32 = 0.28;
const WIZARD_BLINK_MIN_RADIUS: f32 = 320.0;
const WIZARD_CONE_SPREAD: f32 = 0.85;

/// Kiting archer state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcherState {
    pub shoot_cooldown: f32,
    pub shoot_timer: f32,
    /// +1 or -1
    pub strafe_dir: f32,
    pub strafe_timer: f32,
    /// Remaining telegraph time; 0 when idle
    pub windup: f32,
    /// Player center when the windup began
    pub aim_target: Vec2,
}

/// Blinking spellcaster state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    pub cast_cooldown: f32,
    pub cast_timer: f32,
    pub blink_timer: f32,
    pub windup: f32,
}

/// Behavior family, each with its own scratch state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Behavior {
    Chase,
    Archer(ArcherState),
    Wizard(WizardState),
}

/// A projectile an actor wants to fire this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub origin: Vec2,
    /// Unit direction
    pub dir: Vec2,
    pub speed: f32,
    pub damage: u32,
}

impl Shot {
    /// Single shot at the default enemy bullet speed
    pub fn aimed(origin: Vec2, dir: Vec2, damage: u32) -> Self {
        Self {
            origin,
            dir,
            speed: ENEMY_BULLET_SPEED,
            damage,
        }
    }

    /// `count` shots evenly spaced around a full circle, starting at angle 0
    pub fn ring(origin: Vec2, count: u32, speed: f32, damage: u32) -> Vec<Shot> {
        (0..count)
            .map(|i| Shot {
                origin,
                dir: Vec2::from_angle(i as f32 * TAU / count as f32),
                speed,
                damage,
            })
            .collect()
    }

    /// `count` shots evenly spread over `spread` radians, centered on `dir`
    pub fn cone(origin: Vec2, dir: Vec2, count: u32, spread: f32, speed: f32, damage: u32) -> Vec<Shot> {
        let base = dir.y.atan2(dir.x);
        let step = if count <= 1 {
            0.0
        } else {
            spread / (count - 1) as f32
        };
        let start = if count <= 1 { base } else { base - spread * 0.5 };
        (0..count)
            .map(|i| Shot {
                origin,
                dir: Vec2::from_angle(start + step * i as f32),
                speed,
                damage,
            })
            .collect()
    }
}

/// What an enemy can see of the world this tick
#[derive(Debug, Clone, Copy)]
pub struct Surroundings {
    /// Player top-left corner
    pub player_pos: Vec2,
    pub player_center: Vec2,
    pub world: Vec2,
}

/// An enemy entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub hp: i32,
    pub touch_damage: u32,
    pub behavior: Behavior,
}

impl Enemy {
    /// Fresh enemy with base stats (no difficulty scaling)
    pub fn new(kind: EnemyKind, pos: Vec2, rng: &mut impl Rng) -> Self {
        let stats = kind.stats();
        let behavior = match kind {
            EnemyKind::Grunt | EnemyKind::Runner | EnemyKind::Tank => Behavior::Chase,
            EnemyKind::Archer => Behavior::Archer(ArcherState {
                shoot_cooldown: ARCHER_COOLDOWN,
                shoot_timer: ARCHER_FIRST_SHOT,
                strafe_dir: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
                strafe_timer: strafe_interval(rng),
                windup: 0.0,
                aim_target: Vec2::ZERO,
            }),
            EnemyKind::Wizard => Behavior::Wizard(WizardState {
                cast_cooldown: WIZARD_COOLDOWN,
                cast_timer: WIZARD_FIRST_CAST,
                blink_timer: 0.0,
                windup: 0.0,
            }),
        };
        Self {
            kind,
            pos,
            size: stats.size,
            speed: stats.speed,
            hp: stats.hp,
            touch_damage: stats.touch_damage,
            behavior,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        square_center(self.pos, self.size)
    }

    /// True while a telegraphed attack is pending
    pub fn winding_up(&self) -> bool {
        match self.behavior {
            Behavior::Chase => false,
            Behavior::Archer(a) => a.windup > 0.0,
            Behavior::Wizard(w) => w.windup > 0.0,
        }
    }

    /// Move and attack for one tick. Returns projectiles to spawn.
    pub fn tick(&mut self, env: &Surroundings, rng: &mut impl Rng, dt: f32) -> Vec<Shot> {
        match self.behavior {
            Behavior::Chase => {
                self.chase(env, dt);
                Vec::new()
            }
            Behavior::Archer(mut state) => {
                let shots = self.kite(&mut state, env, rng, dt);
                self.behavior = Behavior::Archer(state);
                shots
            }
            Behavior::Wizard(mut state) => {
                let shots = self.cast(&mut state, env, rng, dt);
                self.behavior = Behavior::Wizard(state);
                shots
            }
        }
    }

    /// Straight line toward the player's corner
    fn chase(&mut self, env: &Surroundings, dt: f32) {
        let away = (self.pos - env.player_pos).normalize_or_zero();
        self.pos -= away * self.speed * dt;
        self.pos = clamp_to_world(self.pos, self.size, env.world);
    }

    fn kite(&mut self, s: &mut ArcherState, env: &Surroundings, rng: &mut impl Rng, dt: f32) -> Vec<Shot> {
        let to_player = env.player_center - self.center();
        let dist = to_player.length();
        let n = to_player.normalize_or_zero();

        s.strafe_timer -= dt;
        if s.strafe_timer <= 0.0 {
            s.strafe_dir = -s.strafe_dir;
            s.strafe_timer = strafe_interval(rng);
        }

        let mut movement = Vec2::ZERO;
        if dist < ARCHER_STANDOFF - ARCHER_TOO_CLOSE {
            movement -= n;
        } else if dist > ARCHER_STANDOFF + ARCHER_TOO_FAR {
            movement += n * ARCHER_APPROACH_WEIGHT;
        }
        movement += perpendicular(n) * s.strafe_dir * ARCHER_STRAFE_WEIGHT;

        self.pos += movement.normalize_or_zero() * self.speed * dt;
        self.pos = clamp_to_world(self.pos, self.size, env.world);

        if s.windup > 0.0 {
            s.windup -= dt;
            if s.windup <= 0.0 {
                s.windup = 0.0;
                s.shoot_timer = s.shoot_cooldown;
                let origin = self.center();
                let dir = match (s.aim_target - origin).try_normalize() {
                    Some(dir) => dir,
                    None => n,
                };
                return vec![Shot::aimed(origin, dir, ARCHER_SHOT_DAMAGE)];
            }
        } else {
            s.shoot_timer -= dt;
            if s.shoot_timer <= 0.0 {
                s.windup = ARCHER_WINDUP;
                s.aim_target = env.player_center;
            }
        }
        Vec::new()
    }

    fn cast(&mut self, s: &mut WizardState, env: &Surroundings, rng: &mut impl Rng, dt: f32) -> Vec<Shot> {
        s.blink_timer -= dt;
        if s.blink_timer <= 0.0 {
            let angle = rng.random_range(0..628) as f32 / 100.0;
            let radius = WIZARD_BLINK_MIN_RADIUS + rng.random_range(0..90) as f32;
            let landing = annulus_point(env.player_center, angle, radius);
            self.pos = clamp_to_world(landing - Vec2::splat(self.size * 0.5), self.size, env.world);
            s.blink_timer = 2.6 + rng.random_range(0..80) as f32 / 100.0;
        }

        if s.windup > 0.0 {
            s.windup -= dt;
            if s.windup <= 0.0 {
                s.windup = 0.0;
                let origin = self.center();
                let n = (env.player_center - origin).normalize_or_zero();

                let mut shots = Shot::cone(origin, n, 5, WIZARD_CONE_SPREAD, 260.0, 10);
                shots.extend(Shot::ring(origin, 6, 180.0, 8));

                s.cast_timer = s.cast_cooldown + rng.random_range(0..35) as f32 / 100.0;
                return shots;
            }
            return Vec::new();
        }

        s.cast_timer -= dt;
        if s.cast_timer <= 0.0 {
            s.windup = WIZARD_WINDUP;
        }
        Vec::new()
    }
}

/// 0.6 - 1.2 s between strafe flips
fn strafe_interval(rng: &mut impl Rng) -> f32 {
    0.6 + rng.random_range(0..60) as f32 / 100.0
}
