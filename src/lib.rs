//! Tank Battle - simulation core of a top-down arcade tank game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, AI, game state)
//! - `simulation`: Frame-driven controller that owns the state and its services
//! - `levels`: Level descriptions and providers (built-in and JSON files)
//! - `persistence`: Save/load service
//! - `audio`: Fire-and-forget sound event sinks
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod levels;
pub mod persistence;
pub mod sim;
pub mod simulation;
pub mod tuning;

pub use audio::{SoundEffect, SoundSink};
pub use error::Error;
pub use levels::{LevelDescription, LevelProvider};
pub use persistence::{SaveRecord, SaveStore};
pub use simulation::{Services, Simulation};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless driver (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;

    /// Arena dimensions (pixels)
    pub const ARENA_WIDTH: u32 = 800;
    pub const ARENA_HEIGHT: u32 = 600;
    /// Level layout grid cell
    pub const GRID_SIZE: u32 = 40;

    /// Tank defaults
    pub const TANK_SIZE: u32 = 40;
    pub const TANK_ACCELERATION: f64 = 350.0;
    pub const TANK_DECELERATION: f64 = 350.0;
    /// Fixed backward nudge when a tank bumps into something
    pub const TANK_BUMP_DISTANCE: f64 = 2.0;
    /// Speed multiplier applied when a tank scrapes the arena edge
    pub const EDGE_SPEED_DAMPING: f64 = 0.8;

    pub const PLAYER_SPEED: f64 = 150.0;
    pub const PLAYER_SHOOT_COOLDOWN: f64 = 0.3;
    pub const PLAYER_LIVES: u32 = 3;
    pub const RESPAWN_INVINCIBILITY: f64 = 3.0;

    pub const ENEMY_SPEED: f64 = 80.0;
    pub const ENEMY_SHOOT_COOLDOWN: f64 = 1.0;

    /// Bullet defaults
    pub const BULLET_SPEED: f64 = 300.0;
    pub const BULLET_SIZE: u32 = 10;
    pub const POWERED_BULLET_SIZE: u32 = 14;
    pub const POWERED_BULLET_SPEED_FACTOR: f64 = 1.2;

    /// Item defaults
    pub const ITEM_SIZE: u32 = 30;
    pub const ITEM_LIFETIME: f64 = 10.0;
    pub const SHIELD_DURATION: f64 = 5.0;
    pub const SPEED_BOOST_DURATION: f64 = 7.0;
    pub const FIRE_POWER_DURATION: f64 = 10.0;
    pub const SPEED_BOOST_FACTOR: f64 = 1.5;

    /// Score per destroyed enemy
    pub const KILL_SCORE: u64 = 100;
}
