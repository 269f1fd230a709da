//! Mark - a top-down survival arena shooter
//!
//! Core modules:
//! - `sim`: Simulation (player, enemies, bosses, combat, camera)
//! - `renderer`: Draw-call issuing over an abstract surface
//! - `platform`: Input snapshot and text events
//! - `persistence`: Score record storage
//! - `highscores`: Best-kills leaderboard

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use highscores::ScoreLedger;
pub use settings::Settings;

use glam::Vec2;

/// Game tuning constants
pub mod consts {
    /// Player defaults
    pub const PLAYER_SIZE: f32 = 32.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_DASH_SPEED: f32 = 900.0;
    pub const PLAYER_DASH_TIME: f32 = 0.15;
    pub const PLAYER_DASH_COOLDOWN: f32 = 0.8;
    pub const PLAYER_HP: u32 = 100;
    pub const PLAYER_MAG: u32 = 18;
    pub const PLAYER_FIRE_COOLDOWN: f32 = 0.10;
    pub const PLAYER_RELOAD_TIME: f32 = 0.55;
    pub const PLAYER_IFRAME_TIME: f32 = 0.35;

    /// Player bullets
    pub const BULLET_RADIUS: f32 = 4.0;
    pub const BULLET_SPEED: f32 = 900.0;
    pub const BULLET_CULL_MARGIN: f32 = 50.0;
    /// Damage dealt by one player bullet
    pub const BULLET_ENEMY_DAMAGE: i32 = 25;
    pub const BULLET_BOSS_DAMAGE: i32 = 18;

    /// Enemy bullets
    pub const ENEMY_BULLET_RADIUS: f32 = 3.5;
    pub const ENEMY_BULLET_SPEED: f32 = 470.0;
    pub const ENEMY_BULLET_CULL_MARGIN: f32 = 60.0;

    /// Pool capacities
    pub const MAX_ENEMIES: usize = 32;
    pub const MAX_BULLETS: usize = 128;
    pub const MAX_ENEMY_BULLETS: usize = 128;
    pub const MAX_DAMAGE_NUMS: usize = 64;

    /// Contact damage is applied at most once per this many seconds
    pub const CONTACT_DAMAGE_INTERVAL: f32 = 0.25;
    pub const DEFAULT_CONTACT_DAMAGE: u32 = 14;

    /// Regeneration
    pub const REGEN_DELAY: f32 = 3.0;
    pub const REGEN_RATE: f32 = 3.0;

    /// Floating damage numbers
    pub const DAMAGE_NUM_TTL: f32 = 0.75;
    pub const DAMAGE_NUM_RISE: f32 = 45.0;

    /// Camera follow stiffness (higher = snappier)
    pub const CAMERA_STIFFNESS: f32 = 10.0;

    /// Spawning
    pub const SPAWN_MARGIN: f32 = 120.0;
    pub const SPAWN_BASE_INTERVAL: f32 = 1.0;
    pub const SPAWN_MIN_INTERVAL: f32 = 0.65;
    pub const SPAWN_FIRST_DELAY: f32 = 0.35;
    pub const DIFFICULTY_CAP: f32 = 2.0;

    /// Name entry
    pub const NAME_MAX_LEN: usize = 15;
    /// Leaderboard
    pub const SCORE_MAX: usize = 32;
    pub const LEADERBOARD_TOP: usize = 5;

    /// Fixed step used by the headless driver and tests
    pub const SIM_DT: f32 = 1.0 / 60.0;
}

/// Clamp a square's top-left corner so the whole square stays inside the world
#[inline]
pub fn clamp_to_world(pos: Vec2, size: f32, world: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, (world.x - size).max(0.0)),
        pos.y.clamp(0.0, (world.y - size).max(0.0)),
    )
}

/// Center of a square given its top-left corner
#[inline]
pub fn square_center(pos: Vec2, size: f32) -> Vec2 {
    pos + Vec2::splat(size * 0.5)
}

/// Point at `radius` from `center` in direction `angle`
#[inline]
pub fn annulus_point(center: Vec2, angle: f32, radius: f32) -> Vec2 {
    center + Vec2::from_angle(angle) * radius
}

/// Unit vector perpendicular to `dir` (rotated +90 degrees)
#[inline]
pub fn perpendicular(dir: Vec2) -> Vec2 {
    Vec2::new(-dir.y, dir.x)
}
