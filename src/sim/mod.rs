//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given the same seed, inputs and frame
//! times it produces the same run:
//! - Seeded RNG only, owned by `GameState`
//! - Stable iteration order (pool slot order)
//! - No rendering or platform dependencies

pub mod boss;
pub mod camera;
pub mod collision;
pub mod combat;
pub mod enemy;
pub mod pool;
pub mod spawn;
pub mod state;
pub mod tick;

pub use boss::{Banner, Boss, BossDirector, BossKind, BossPattern, BossTriggers, MarkedPhase};
pub use camera::Camera;
pub use collision::Aabb;
pub use enemy::{Behavior, Enemy, EnemyKind, Shot};
pub use pool::Pool;
pub use state::{Bullet, DamageNum, EnemyBullet, GamePhase, GameState, Motion, Player, Reserve};
pub use tick::{TickInput, tick};
