//! Game state and core simulation types
//!
//! `GameState` is the single owned root of the simulation. The update and
//! render entry points take it by reference; nothing lives in globals.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::BossDirector;
use super::camera::Camera;
use super::collision::Aabb;
use super::enemy::{Enemy, EnemyKind, Surroundings};
use super::pool::Pool;
use crate::consts::*;
use crate::highscores::{ScoreLedger, is_name_char};
use crate::platform::{EdgeLatch, TextEvent};
use crate::settings::Settings;
use crate::square_center;

/// Top-level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Name entry and leaderboard
    Menu,
    /// Active run
    Playing,
    /// Run ended, waiting for confirm
    Dead,
}

/// Spare ammunition outside the magazine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reserve {
    Infinite,
    Rounds(u32),
}

impl Reserve {
    pub fn is_empty(&self) -> bool {
        matches!(self, Reserve::Rounds(0))
    }
}

/// Player movement mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    Walking,
    /// Invulnerable burst of speed
    Dashing { remaining: f32 },
}

/// The player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    /// Normalized movement direction this tick
    pub dir: Vec2,

    pub motion: Motion,
    pub dash_speed: f32,
    pub dash_time: f32,
    pub dash_cooldown: f32,
    /// Counts down only while walking
    pub dash_cooldown_timer: f32,

    pub hp: u32,
    pub hp_max: u32,

    pub mag: u32,
    pub mag_max: u32,
    pub reserve: Reserve,

    pub fire_cooldown: f32,
    pub fire_timer: f32,

    pub reload_time: f32,
    pub reload_timer: f32,
    pub reloading: bool,

    pub iframe_time: f32,
    pub iframe_timer: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            dir: Vec2::ZERO,

            motion: Motion::Walking,
            dash_speed: PLAYER_DASH_SPEED,
            dash_time: PLAYER_DASH_TIME,
            dash_cooldown: PLAYER_DASH_COOLDOWN,
            dash_cooldown_timer: 0.0,

            hp: PLAYER_HP,
            hp_max: PLAYER_HP,

            mag: PLAYER_MAG,
            mag_max: PLAYER_MAG,
            reserve: Reserve::Infinite,

            fire_cooldown: PLAYER_FIRE_COOLDOWN,
            fire_timer: 0.0,

            reload_time: PLAYER_RELOAD_TIME,
            reload_timer: 0.0,
            reloading: false,

            iframe_time: PLAYER_IFRAME_TIME,
            iframe_timer: 0.0,
        }
    }
}

impl Player {
    /// Restore per-run values, keeping the configured stats
    pub fn reset(&mut self, pos: Vec2) {
        self.pos = pos;
        self.dir = Vec2::ZERO;
        self.motion = Motion::Walking;
        self.dash_cooldown_timer = 0.0;
        self.hp = self.hp_max;
        self.mag = self.mag_max;
        self.reserve = Reserve::Infinite;
        self.fire_timer = 0.0;
        self.reloading = false;
        self.reload_timer = 0.0;
        self.iframe_timer = 0.0;
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        square_center(self.pos, self.size)
    }

    pub fn is_dashing(&self) -> bool {
        matches!(self.motion, Motion::Dashing { .. })
    }

    /// Damage is ignored while dashing or during i-frames
    pub fn can_take_damage(&self) -> bool {
        !self.is_dashing() && self.iframe_timer <= 0.0
    }

    /// I-frame and fire-rate countdowns
    pub fn tick_cooldowns(&mut self, dt: f32) {
        if self.iframe_timer > 0.0 {
            self.iframe_timer -= dt;
        }
        if self.fire_timer > 0.0 {
            self.fire_timer -= dt;
        }
    }

    /// Begin a reload. Refused while already reloading, with a full
    /// magazine, or with nothing left in reserve.
    pub fn start_reload(&mut self) -> bool {
        if self.reloading || self.mag >= self.mag_max || self.reserve.is_empty() {
            return false;
        }
        self.reloading = true;
        self.reload_timer = self.reload_time;
        log::debug!("Reload started ({}/{})", self.mag, self.mag_max);
        true
    }

    /// Count down an active reload and refill the magazine when it ends
    pub fn advance_reload(&mut self, dt: f32) {
        if !self.reloading {
            return;
        }
        self.reload_timer -= dt;
        if self.reload_timer <= 0.0 {
            self.reloading = false;
            self.reload_timer = 0.0;
            self.refill();
            log::debug!("Reload finished ({}/{})", self.mag, self.mag_max);
        }
    }

    /// Move rounds from the reserve into the magazine
    fn refill(&mut self) {
        let need = self.mag_max.saturating_sub(self.mag);
        if need == 0 {
            return;
        }
        match self.reserve {
            Reserve::Infinite => self.mag = self.mag_max,
            Reserve::Rounds(left) => {
                let take = left.min(need);
                self.mag += take;
                self.reserve = Reserve::Rounds(left - take);
            }
        }
    }

    /// Ready to shoot right now
    pub fn can_fire(&self) -> bool {
        !self.reloading && self.mag > 0 && self.fire_timer <= 0.0
    }

    /// Account for one fired round; an empty magazine starts a reload
    pub fn spend_round(&mut self) {
        self.mag = self.mag.saturating_sub(1);
        self.fire_timer = self.fire_cooldown;
        if self.mag == 0 {
            self.start_reload();
        }
    }
}

/// Player projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Bullet {
    pub fn new(pos: Vec2, dir: Vec2) -> Self {
        Self {
            pos,
            vel: dir * BULLET_SPEED,
            radius: BULLET_RADIUS,
        }
    }
}

/// Enemy or boss projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: u32,
}

/// Floating combat text. Negative values are damage taken by the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageNum {
    pub pos: Vec2,
    pub value: i32,
    /// Seconds left
    pub ttl: f32,
}

/// Single-instance contact damage bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactDamage {
    /// Something touched the player this tick
    pub touched: bool,
    /// Damage of the last enemy that touched
    pub pending: u32,
    /// Time until contact damage may apply again
    pub cooldown: f32,
}

impl Default for ContactDamage {
    fn default() -> Self {
        Self {
            touched: false,
            pending: DEFAULT_CONTACT_DAMAGE,
            cooldown: 0.0,
        }
    }
}

/// Out-of-combat healing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regen {
    pub time_since_hit: f32,
    pub delay: f32,
    /// HP per second
    pub rate: f32,
    /// Fractional HP not yet applied
    pub acc: f32,
}

impl Default for Regen {
    fn default() -> Self {
        Self {
            time_since_hit: 0.0,
            delay: REGEN_DELAY,
            rate: REGEN_RATE,
            acc: 0.0,
        }
    }
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    /// Viewport size
    pub screen: Vec2,
    /// World size
    pub world: Vec2,
    pub camera: Camera,

    pub phase: GamePhase,

    pub player: Player,
    pub enemies: Pool<Enemy>,
    pub bullets: Pool<Bullet>,
    pub enemy_bullets: Pool<EnemyBullet>,
    pub damage_nums: Pool<DamageNum>,

    /// Time until the next spawn attempt
    pub spawn_timer: f32,
    pub contact: ContactDamage,

    pub kills: u32,
    pub last_run_kills: u32,
    pub regen: Regen,

    /// Player name being edited in the menu
    pub name: String,
    /// Set once the first run starts
    pub name_locked: bool,
    pub ledger: ScoreLedger,
    /// This run's result has already been recorded
    pub score_submitted: bool,

    pub boss: BossDirector,

    pub confirm_latch: EdgeLatch,
    pub reload_latch: EdgeLatch,

    pub rng: Pcg32,
}

impl GameState {
    /// Initialize the game in the menu, with the ledger already loaded
    pub fn new(settings: &Settings, ledger: ScoreLedger) -> Self {
        let mut name = settings.default_name.clone();
        truncate_to_name_len(&mut name);

        let mut state = Self {
            screen: settings.screen_size(),
            world: settings.world_size(),
            camera: Camera::default(),
            phase: GamePhase::Menu,
            player: Player::default(),
            enemies: Pool::new(MAX_ENEMIES),
            bullets: Pool::new(MAX_BULLETS),
            enemy_bullets: Pool::new(MAX_ENEMY_BULLETS),
            damage_nums: Pool::new(MAX_DAMAGE_NUMS),
            spawn_timer: SPAWN_FIRST_DELAY,
            contact: ContactDamage::default(),
            kills: 0,
            last_run_kills: 0,
            regen: Regen::default(),
            name,
            name_locked: false,
            ledger,
            score_submitted: false,
            boss: BossDirector::new(),
            confirm_latch: EdgeLatch::default(),
            reload_latch: EdgeLatch::default(),
            rng: Pcg32::seed_from_u64(settings.seed),
        };
        state.reset_run();
        state
    }

    /// Put everything back to the start-of-run state (phase is left alone)
    pub fn reset_run(&mut self) {
        self.player.reset(self.world * 0.5);
        self.regen = Regen::default();

        self.enemies.clear();
        self.bullets.clear();
        self.enemy_bullets.clear();
        self.damage_nums.clear();

        self.spawn_timer = SPAWN_FIRST_DELAY;
        self.contact = ContactDamage::default();
        self.kills = 0;
        self.score_submitted = false;

        self.boss.reset();

        self.camera.snap(self.player.center(), self.screen, self.world);
    }

    /// Menu -> Playing
    pub fn start_run(&mut self) {
        self.name_locked = true;
        self.reset_run();
        self.phase = GamePhase::Playing;
        log::info!("Run started as {}", self.name);
    }

    /// Apply a name-entry event. Only accepted in the menu before the name
    /// is locked.
    pub fn handle_text_event(&mut self, event: &TextEvent) {
        if self.phase != GamePhase::Menu || self.name_locked {
            return;
        }
        match event {
            TextEvent::Text(text) => {
                for c in text.chars().filter(|&c| is_name_char(c)) {
                    if self.name.len() >= NAME_MAX_LEN {
                        break;
                    }
                    self.name.push(c);
                }
            }
            TextEvent::Backspace => {
                self.name.pop();
            }
            TextEvent::Clear => self.name.clear(),
        }
    }

    /// What enemies and bosses see of the player
    pub fn surroundings(&self) -> Surroundings {
        Surroundings {
            player_pos: self.player.pos,
            player_center: self.player.center(),
            world: self.world,
        }
    }

    /// Live enemies of `kind` inside the camera view plus the spawn margin
    pub fn count_on_screen(&self, kind: EnemyKind) -> usize {
        let min = self.camera.pos - Vec2::splat(SPAWN_MARGIN);
        let max = self.camera.pos + self.screen + Vec2::splat(SPAWN_MARGIN);
        self.enemies
            .iter()
            .filter(|(_, e)| e.kind == kind)
            .filter(|(_, e)| {
                let far = e.pos + Vec2::splat(e.size);
                !(far.x < min.x || e.pos.x > max.x || far.y < min.y || e.pos.y > max.y)
            })
            .count()
    }
}

/// Names hold printable ASCII only, so byte length equals char count
fn truncate_to_name_len(name: &mut String) {
    name.retain(is_name_char);
    name.truncate(NAME_MAX_LEN);
}

#[cfg(test)]
pub(crate) fn test_state() -> GameState {
    use crate::persistence::MemoryScoreStore;
    GameState::new(
        &Settings::default(),
        ScoreLedger::open(Box::new(MemoryScoreStore::new())),
    )
}
