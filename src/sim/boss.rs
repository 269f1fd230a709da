//! Boss director
//!
//! Three one-shot minibosses and a repeatable final boss, triggered by kill
//! count. At most one boss is alive at a time and normal spawning is locked
//! while it is.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::enemy::{Shot, Surroundings};
use super::state::GameState;
use crate::{annulus_point, clamp_to_world, perpendicular, square_center};

/// Boss variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    Brute,
    Warden,
    Hunter,
    Marked,
}

impl BossKind {
    pub fn size(self) -> f32 {
        match self {
            BossKind::Brute => 64.0,
            BossKind::Warden => 58.0,
            BossKind::Hunter => 52.0,
            BossKind::Marked => 96.0,
        }
    }

    pub fn max_hp(self) -> i32 {
        match self {
            BossKind::Brute => 420,
            BossKind::Warden => 360,
            BossKind::Hunter => 340,
            BossKind::Marked => 900,
        }
    }

    /// Damage dealt on touching the player
    pub fn contact_damage(self) -> u32 {
        match self {
            BossKind::Marked => 18,
            _ => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BossKind::Brute => "Brute",
            BossKind::Warden => "Warden",
            BossKind::Hunter => "Hunter",
            BossKind::Marked => "The Marked",
        }
    }

    pub fn is_miniboss(self) -> bool {
        self != BossKind::Marked
    }

    fn arrival_banner(self) -> Banner {
        match self {
            BossKind::Brute => Banner::new("MINIBOSS: BRUTE", 1.1),
            BossKind::Warden => Banner::new("MINIBOSS: WARDEN", 1.1),
            BossKind::Hunter => Banner::new("MINIBOSS: HUNTER", 1.1),
            BossKind::Marked => Banner::new("THE MARKED HAS ARRIVED", 1.2),
        }
    }

    fn defeat_banner(self) -> Banner {
        match self {
            BossKind::Marked => Banner::new("THE MARKED IS DOWN", 1.2),
            _ => Banner::new("BOSS DEFEATED", 1.0),
        }
    }
}

/// Final boss phase, derived from the hp fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarkedPhase {
    One,
    Two,
    Three,
}

impl MarkedPhase {
    pub fn from_fraction(hp01: f32) -> Self {
        if hp01 <= 0.35 {
            MarkedPhase::Three
        } else if hp01 <= 0.70 {
            MarkedPhase::Two
        } else {
            MarkedPhase::One
        }
    }

    pub fn number(self) -> u8 {
        match self {
            MarkedPhase::One => 1,
            MarkedPhase::Two => 2,
            MarkedPhase::Three => 3,
        }
    }

    fn speed(self) -> f32 {
        match self {
            MarkedPhase::One => 105.0,
            MarkedPhase::Two => 120.0,
            MarkedPhase::Three => 135.0,
        }
    }

    /// (ring count, ring speed, ring damage, aimed shot damage, cadence)
    fn volley(self) -> (u32, f32, u32, Option<u32>, f32) {
        match self {
            MarkedPhase::One => (14, 235.0, 10, None, 1.65),
            MarkedPhase::Two => (16, 255.0, 11, Some(14), 1.45),
            MarkedPhase::Three => (18, 270.0, 12, Some(16), 1.15),
        }
    }
}

// Brute
const BRUTE_CHARGE_EVERY: f32 = 1.2;
const BRUTE_CHARGE_TIME: f32 = 0.28;
const BRUTE_CHARGE_SPEED: f32 = 420.0;
const BRUTE_DRIFT_SPEED: f32 = 130.0;

// Warden
const WARDEN_TELEPORT_EVERY: f32 = 2.0;
const WARDEN_RADIUS: f32 = 300.0;
const WARDEN_PULSE: (u32, f32, u32) = (14, 230.0, 10);

// Hunter
const HUNTER_SIDE_EVERY: f32 = 0.75;
const HUNTER_OFFSET: f32 = 260.0;
const HUNTER_SPEED: f32 = 200.0;
const HUNTER_BURST_EVERY: f32 = 1.35;
const HUNTER_BURST: usize = 3;
const HUNTER_SHOT_DAMAGE: u32 = 12;

const MARKED_STANDOFF: f32 = 260.0;

/// Per-kind attack state. Every timer starts at zero so a fresh boss acts on
/// its first tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossPattern {
    Brute {
        next_charge: f32,
        charge_left: f32,
    },
    Warden {
        next_teleport: f32,
    },
    Hunter {
        next_side: f32,
        /// +1 or -1 once chosen
        side: f32,
        next_burst: f32,
    },
    Marked {
        phase: MarkedPhase,
        next_volley: f32,
    },
}

impl BossPattern {
    fn fresh(kind: BossKind) -> Self {
        match kind {
            BossKind::Brute => BossPattern::Brute {
                next_charge: 0.0,
                charge_left: 0.0,
            },
            BossKind::Warden => BossPattern::Warden { next_teleport: 0.0 },
            BossKind::Hunter => BossPattern::Hunter {
                next_side: 0.0,
                side: 0.0,
                next_burst: 0.0,
            },
            BossKind::Marked => BossPattern::Marked {
                phase: MarkedPhase::One,
                next_volley: 0.0,
            },
        }
    }
}

/// The active boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub kind: BossKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub hp: i32,
    pub hp_max: i32,
    pub pattern: BossPattern,
}

impl Boss {
    /// Place a boss diagonally off the player, in a random quadrant
    pub fn spawn(kind: BossKind, player_pos: Vec2, world: Vec2, rng: &mut impl Rng) -> Self {
        let ox = if rng.random_range(0..2) == 1 { 420.0 } else { -420.0 };
        let oy = if rng.random_range(0..2) == 1 { 240.0 } else { -240.0 };
        let size = kind.size();
        Self {
            kind,
            pos: clamp_to_world(player_pos + Vec2::new(ox, oy), size, world),
            size,
            hp: kind.max_hp(),
            hp_max: kind.max_hp(),
            pattern: BossPattern::fresh(kind),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        square_center(self.pos, self.size)
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.hp_max > 0 {
            self.hp as f32 / self.hp_max as f32
        } else {
            0.0
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }

    /// Current phase of the Marked, `None` for minibosses
    pub fn phase(&self) -> Option<MarkedPhase> {
        match self.pattern {
            BossPattern::Marked { phase, .. } => Some(phase),
            _ => None,
        }
    }

    /// Apply damage (hp floors at zero) and recompute the Marked's phase
    pub fn take_damage(&mut self, dmg: i32) {
        self.hp = (self.hp - dmg).max(0);

        let hp01 = self.hp_fraction();
        if let BossPattern::Marked { ref mut phase, .. } = self.pattern {
            let next = MarkedPhase::from_fraction(hp01);
            if next != *phase {
                log::debug!("The Marked enters phase {}", next.number());
                *phase = next;
            }
        }
    }

    /// Steer toward `target` (compared against the boss corner)
    fn move_toward(&mut self, target: Vec2, speed: f32, world: Vec2, dt: f32) {
        let dir = (target - self.pos).normalize_or_zero();
        self.pos = clamp_to_world(self.pos + dir * speed * dt, self.size, world);
    }

    /// Move and attack for one tick. Returns projectiles to spawn.
    pub fn tick(&mut self, env: &Surroundings, rng: &mut impl Rng, dt: f32) -> Vec<Shot> {
        let center = self.center();
        let n = (env.player_center - center).normalize_or_zero();
        let mut shots = Vec::new();

        let mut pattern = self.pattern;
        match pattern {
            BossPattern::Brute {
                ref mut next_charge,
                ref mut charge_left,
            } => {
                *next_charge -= dt;
                if *next_charge <= 0.0 {
                    *next_charge = BRUTE_CHARGE_EVERY;
                    *charge_left = BRUTE_CHARGE_TIME;
                }
                let speed = if *charge_left > 0.0 {
                    *charge_left -= dt;
                    BRUTE_CHARGE_SPEED
                } else {
                    BRUTE_DRIFT_SPEED
                };
                self.move_toward(env.player_pos, speed, env.world, dt);
            }
            BossPattern::Warden { ref mut next_teleport } => {
                *next_teleport -= dt;
                if *next_teleport <= 0.0 {
                    *next_teleport = WARDEN_TELEPORT_EVERY;

                    let angle = rng.random_range(0..628) as f32 / 100.0;
                    let radius = WARDEN_RADIUS + rng.random_range(0..90) as f32;
                    let landing = annulus_point(env.player_center, angle, radius);
                    self.pos = clamp_to_world(landing - Vec2::splat(self.size * 0.5), self.size, env.world);

                    let (count, speed, damage) = WARDEN_PULSE;
                    shots.extend(Shot::ring(self.center(), count, speed, damage));
                }
            }
            BossPattern::Hunter {
                ref mut next_side,
                ref mut side,
                ref mut next_burst,
            } => {
                *next_side -= dt;
                if *next_side <= 0.0 {
                    *next_side = HUNTER_SIDE_EVERY;
                    *side = if rng.random_range(0..2) == 1 { 1.0 } else { -1.0 };
                }
                let target = env.player_pos + perpendicular(n) * *side * HUNTER_OFFSET;
                self.move_toward(target, HUNTER_SPEED, env.world, dt);

                *next_burst -= dt;
                if *next_burst <= 0.0 {
                    shots.extend(std::iter::repeat_n(Shot::aimed(center, n, HUNTER_SHOT_DAMAGE), HUNTER_BURST));
                    *next_burst = HUNTER_BURST_EVERY;
                }
            }
            BossPattern::Marked {
                phase,
                ref mut next_volley,
            } => {
                let target = env.player_pos - n * MARKED_STANDOFF;
                self.move_toward(target, phase.speed(), env.world, dt);

                *next_volley -= dt;
                if *next_volley <= 0.0 {
                    let (count, speed, damage, aimed, cadence) = phase.volley();
                    shots.extend(Shot::ring(self.center(), count, speed, damage));
                    if let Some(damage) = aimed {
                        shots.push(Shot::aimed(center, n, damage));
                    }
                    *next_volley = cadence;
                }
            }
        }
        self.pattern = pattern;
        shots
    }
}

/// Timed on-screen message
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Banner {
    pub text: &'static str,
    /// Seconds left
    pub timer: f32,
}

impl Banner {
    pub fn new(text: &'static str, timer: f32) -> Self {
        Self { text, timer }
    }
}

/// Kill thresholds. Minibosses fire once (`None` afterwards); the Marked
/// re-arms further out after every defeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BossTriggers {
    pub brute: Option<u32>,
    pub warden: Option<u32>,
    pub hunter: Option<u32>,
    pub marked: u32,
}

const MARKED_REARM: u32 = 120;

impl Default for BossTriggers {
    fn default() -> Self {
        Self {
            brute: Some(30),
            warden: Some(65),
            hunter: Some(100),
            marked: 150,
        }
    }
}

impl BossTriggers {
    /// First boss whose threshold is met, in priority order
    pub fn due(&self, kills: u32) -> Option<BossKind> {
        let met = |t: Option<u32>| t.is_some_and(|t| kills >= t);
        if met(self.brute) {
            Some(BossKind::Brute)
        } else if met(self.warden) {
            Some(BossKind::Warden)
        } else if met(self.hunter) {
            Some(BossKind::Hunter)
        } else if kills >= self.marked {
            Some(BossKind::Marked)
        } else {
            None
        }
    }

    fn consume(&mut self, kind: BossKind) {
        match kind {
            BossKind::Brute => self.brute = None,
            BossKind::Warden => self.warden = None,
            BossKind::Hunter => self.hunter = None,
            BossKind::Marked => {}
        }
    }
}

/// Boss slot, triggers and banner
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BossDirector {
    pub boss: Option<Boss>,
    pub triggers: BossTriggers,
    pub banner: Option<Banner>,
}

impl BossDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the start-of-run thresholds with no boss or banner
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Normal spawning is suppressed exactly while a boss is alive
    pub fn spawns_locked(&self) -> bool {
        self.boss.is_some()
    }

    /// Spawn the next due boss if none is active. Returns the spawned kind.
    pub fn try_trigger(&mut self, kills: u32, player_pos: Vec2, world: Vec2, rng: &mut impl Rng) -> Option<BossKind> {
        if self.boss.is_some() {
            return None;
        }
        let kind = self.triggers.due(kills)?;
        self.triggers.consume(kind);

        let boss = Boss::spawn(kind, player_pos, world, rng);
        log::info!("Boss spawned: {} at {} kills ({} hp)", kind.name(), kills, boss.hp);
        self.boss = Some(boss);
        self.banner = Some(kind.arrival_banner());
        Some(kind)
    }

    /// Remove the active boss, show the defeat banner and re-arm the Marked
    pub fn defeat(&mut self) -> Option<BossKind> {
        let kind = self.boss.take()?.kind;
        if kind == BossKind::Marked {
            self.triggers.marked += MARKED_REARM;
        }
        self.banner = Some(kind.defeat_banner());
        log::info!("Boss defeated: {}", kind.name());
        Some(kind)
    }

    pub fn tick_banner(&mut self, dt: f32) {
        if let Some(banner) = &mut self.banner {
            banner.timer -= dt;
            if banner.timer <= 0.0 {
                self.banner = None;
            }
        }
    }
}

/// Trigger check against the running kill count
pub fn check_triggers(state: &mut GameState) -> Option<BossKind> {
    state
        .boss
        .try_trigger(state.kills, state.player.pos, state.world, &mut state.rng)
}

/// Defeat cleanup: the boss's projectiles vanish with it
pub fn defeat_boss(state: &mut GameState) {
    if state.boss.defeat().is_some() {
        state.enemy_bullets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{EnemyBullet, test_state};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const WORLD: Vec2 = Vec2::new(2400.0, 2400.0);
    const DT: f32 = 1.0 / 60.0;

    fn env_at(player_pos: Vec2) -> Surroundings {
        Surroundings {
            player_pos,
            player_center: player_pos + Vec2::splat(16.0),
            world: WORLD,
        }
    }

    fn spawn_at(kind: BossKind, pos: Vec2) -> Boss {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut boss = Boss::spawn(kind, Vec2::ZERO, WORLD, &mut rng);
        boss.pos = pos;
        boss
    }

    #[test]
    fn test_trigger_priority_order() {
        let mut dir = BossDirector::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let p = Vec2::new(1200.0, 1200.0);

        // 70 kills meets both Brute and Warden: Brute first, Warden after
        assert_eq!(dir.try_trigger(70, p, WORLD, &mut rng), Some(BossKind::Brute));
        assert_eq!(dir.try_trigger(70, p, WORLD, &mut rng), None, "one boss at a time");
        dir.defeat();
        assert_eq!(dir.try_trigger(70, p, WORLD, &mut rng), Some(BossKind::Warden));
        dir.defeat();
        assert_eq!(dir.try_trigger(70, p, WORLD, &mut rng), None);
        assert_eq!(dir.triggers.brute, None);
        assert_eq!(dir.triggers.warden, None);
        assert_eq!(dir.triggers.hunter, Some(100));
    }

    #[test]
    fn test_marked_rearms() {
        let mut dir = BossDirector::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let p = Vec2::new(1200.0, 1200.0);
        let mut order = Vec::new();
        while let Some(kind) = dir.try_trigger(200, p, WORLD, &mut rng) {
            order.push(kind);
            dir.defeat();
        }
        assert_eq!(
            order,
            vec![BossKind::Brute, BossKind::Warden, BossKind::Hunter, BossKind::Marked]
        );
        assert_eq!(dir.triggers.marked, 270);
        assert_eq!(dir.try_trigger(270, p, WORLD, &mut rng), Some(BossKind::Marked));
    }

    #[test]
    fn test_spawn_offset_and_lock() {
        let mut dir = BossDirector::new();
        let mut rng = Pcg32::seed_from_u64(8);
        let p = Vec2::new(1200.0, 1200.0);
        dir.try_trigger(30, p, WORLD, &mut rng);
        assert!(dir.spawns_locked());

        let boss = dir.boss.as_ref().unwrap();
        let d = (boss.pos - p).abs();
        assert_eq!(d, Vec2::new(420.0, 240.0));
        assert_eq!(boss.hp, 420);
        assert_eq!(dir.banner.unwrap().text, "MINIBOSS: BRUTE");
    }

    #[test]
    fn test_spawn_clamped_near_corner() {
        let mut rng = Pcg32::seed_from_u64(8);
        let boss = Boss::spawn(BossKind::Marked, Vec2::new(2380.0, 5.0), WORLD, &mut rng);
        assert!(boss.pos.x >= 0.0 && boss.pos.x <= 2400.0 - 96.0);
        assert!(boss.pos.y >= 0.0 && boss.pos.y <= 2400.0 - 96.0);
    }

    #[test]
    fn test_marked_phase_transitions() {
        let mut boss = spawn_at(BossKind::Marked, Vec2::new(500.0, 500.0));
        assert_eq!(boss.phase(), Some(MarkedPhase::One));

        boss.take_damage(269);
        assert_eq!(boss.phase(), Some(MarkedPhase::One));
        boss.take_damage(1);
        assert_eq!(boss.phase(), Some(MarkedPhase::Two), "630/900 is exactly 70%");

        boss.take_damage(315);
        assert_eq!(boss.phase(), Some(MarkedPhase::Three));

        boss.take_damage(10_000);
        assert_eq!(boss.hp, 0);
        assert!(boss.is_defeated());
    }

    #[test]
    fn test_miniboss_has_no_phase() {
        let mut boss = spawn_at(BossKind::Hunter, Vec2::new(500.0, 500.0));
        boss.take_damage(300);
        assert_eq!(boss.phase(), None);
        assert_eq!(boss.hp, 40);
    }

    #[test]
    fn test_brute_charges_on_first_tick() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut boss = spawn_at(BossKind::Brute, Vec2::new(1000.0, 1000.0));
        let env = env_at(Vec2::new(1500.0, 1000.0));
        boss.tick(&env, &mut rng, DT);
        assert!((boss.pos.x - (1000.0 + 420.0 * DT)).abs() < 1e-3);

        // Charge lasts 0.28 s, then drift
        for _ in 0..20 {
            boss.tick(&env, &mut rng, DT);
        }
        let before = boss.pos.x;
        boss.tick(&env, &mut rng, DT);
        assert!((boss.pos.x - before - 130.0 * DT).abs() < 1e-3);
    }

    #[test]
    fn test_warden_teleports_and_pulses() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut boss = spawn_at(BossKind::Warden, Vec2::new(100.0, 100.0));
        let env = env_at(Vec2::new(1200.0, 1200.0));
        let shots = boss.tick(&env, &mut rng, DT);

        assert_eq!(shots.len(), 14);
        assert!(shots.iter().all(|s| s.speed == 230.0 && s.damage == 10));
        let d = boss.center().distance(env.player_center);
        assert!((299.0..=390.0).contains(&d), "teleport distance {d}");

        // Quiet until the next teleport
        assert!(boss.tick(&env, &mut rng, DT).is_empty());
    }

    #[test]
    fn test_hunter_burst() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut boss = spawn_at(BossKind::Hunter, Vec2::new(800.0, 1000.0));
        let env = env_at(Vec2::new(1200.0, 1000.0));
        let shots = boss.tick(&env, &mut rng, DT);
        assert_eq!(shots.len(), 3);
        assert!(shots.iter().all(|s| s.damage == 12 && s.speed == 470.0));
        assert!(shots[0].dir.x > 0.99);

        let mut fired = 0;
        for _ in 0..90 {
            fired += boss.tick(&env, &mut rng, DT).len();
        }
        assert_eq!(fired, 3, "next burst after 1.35 s");
    }

    #[test]
    fn test_marked_volleys_by_phase() {
        let mut rng = Pcg32::seed_from_u64(4);
        let env = env_at(Vec2::new(1200.0, 1200.0));

        let mut boss = spawn_at(BossKind::Marked, Vec2::new(700.0, 700.0));
        let shots = boss.tick(&env, &mut rng, DT);
        assert_eq!(shots.len(), 14);

        let mut boss = spawn_at(BossKind::Marked, Vec2::new(700.0, 700.0));
        boss.take_damage(400);
        let shots = boss.tick(&env, &mut rng, DT);
        assert_eq!(shots.len(), 17);
        assert_eq!(shots[16].damage, 14);

        let mut boss = spawn_at(BossKind::Marked, Vec2::new(700.0, 700.0));
        boss.take_damage(700);
        let shots = boss.tick(&env, &mut rng, DT);
        assert_eq!(shots.len(), 19);
        assert!(shots[..18].iter().all(|s| s.speed == 270.0 && s.damage == 12));
        assert_eq!(shots[18].damage, 16);
    }

    #[test]
    fn test_defeat_clears_projectiles_and_unlocks() {
        let mut state = test_state();
        state.kills = 150;
        assert_eq!(check_triggers(&mut state), Some(BossKind::Brute));
        state.enemy_bullets.spawn(EnemyBullet {
            pos: Vec2::ZERO,
            vel: Vec2::X,
            radius: 3.5,
            damage: 10,
        });

        defeat_boss(&mut state);
        assert!(!state.boss.spawns_locked());
        assert_eq!(state.enemy_bullets.live_count(), 0);
        assert_eq!(state.boss.banner.unwrap().text, "BOSS DEFEATED");
    }

    #[test]
    fn test_banner_expires() {
        let mut dir = BossDirector::new();
        dir.banner = Some(Banner::new("THE MARKED IS DOWN", 1.2));
        dir.tick_banner(1.0);
        assert!(dir.banner.is_some());
        dir.tick_banner(0.3);
        assert!(dir.banner.is_none());
    }

    #[test]
    fn test_reset_restores_thresholds() {
        let mut dir = BossDirector::new();
        let mut rng = Pcg32::seed_from_u64(3);
        dir.try_trigger(30, Vec2::ZERO, WORLD, &mut rng);
        dir.reset();
        assert_eq!(dir, BossDirector::new());
    }
}
