//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (collection order)
//! - No audio, file or platform dependencies

pub mod ai;
pub mod collision;
pub mod entity;
pub mod item;
pub mod state;
pub mod tank;
pub mod tick;
pub mod wave;

pub use ai::EnemyBrain;
pub use collision::{Aabb, intersects};
pub use entity::{Arena, Body, Bullet, Direction, GameObject, Wall, WallKind};
pub use item::{Item, ItemKind, TimedBuff};
pub use state::{GamePhase, GameState};
pub use tank::{EnemyTank, PlayerTank, Tank, TankUnit};
pub use tick::{apply_move_intent, player_fire, tick};
pub use wave::load_level;
