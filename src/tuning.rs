//! Data-driven game balance
//!
//! The balance knobs (arena, player and enemy speeds, cooldowns, lives, AI
//! odds, wave caps, item cadence, scoring) live here so a JSON file can
//! rebalance the game without a rebuild. Missing fields keep their
//! defaults. Physical constants (entity sizes, tank acceleration, bullet
//! speed, buff durations) stay fixed in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::Result;

/// How the per-frame "random shot" of an enemy is rolled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyFireMode {
    /// Fixed chance every frame (frame-rate dependent)
    PerFrame { chance: f64 },
    /// Poisson rate in attempts per second: p = 1 - e^(-rate * dt)
    PerSecond { rate: f64 },
}

impl EnemyFireMode {
    /// Probability of a fire attempt for a frame of length `dt`
    pub fn chance(&self, dt: f64) -> f64 {
        match *self {
            EnemyFireMode::PerFrame { chance } => chance,
            EnemyFireMode::PerSecond { rate } => 1.0 - (-rate * dt).exp(),
        }
    }
}

impl Default for EnemyFireMode {
    fn default() -> Self {
        EnemyFireMode::PerFrame { chance: 0.01 }
    }
}

/// Game balance knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: u32,
    pub arena_height: u32,
    pub grid_size: u32,

    // === Player ===
    pub player_speed: f64,
    pub player_shoot_cooldown: f64,
    pub player_lives: u32,
    pub respawn_invincibility: f64,

    // === Enemies ===
    pub enemy_speed: f64,
    pub enemy_shoot_cooldown: f64,
    /// Direction-change interval range (seconds)
    pub direction_interval: (f64, f64),
    /// Decision interval range (seconds)
    pub decision_interval: (f64, f64),
    /// Chance to turn toward the player on a decision
    pub track_player_chance: f64,
    /// Chance to fire on a decision
    pub decision_fire_chance: f64,
    pub enemy_fire_mode: EnemyFireMode,

    // === Waves ===
    pub max_live_enemies: usize,
    pub spawn_attempts: u32,
    /// Enemy max speed grows by this fraction per level (from level 2)
    pub level_speed_step: f64,
    /// Enemy cooldown multiplier from level 3
    pub level_cooldown_factor: f64,

    // === Items ===
    pub item_spawn_interval: f64,
    pub item_spawn_chance: f64,
    pub max_field_items: usize,
    pub item_drop_chance: f64,
    pub item_placement_attempts: u32,

    // === Scoring ===
    pub kill_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            grid_size: GRID_SIZE,

            player_speed: PLAYER_SPEED,
            player_shoot_cooldown: PLAYER_SHOOT_COOLDOWN,
            player_lives: PLAYER_LIVES,
            respawn_invincibility: RESPAWN_INVINCIBILITY,

            enemy_speed: ENEMY_SPEED,
            enemy_shoot_cooldown: ENEMY_SHOOT_COOLDOWN,
            direction_interval: (2.0, 5.0),
            decision_interval: (0.5, 2.0),
            track_player_chance: 0.3,
            decision_fire_chance: 0.2,
            enemy_fire_mode: EnemyFireMode::default(),

            max_live_enemies: 4,
            spawn_attempts: 10,
            level_speed_step: 0.1,
            level_cooldown_factor: 0.8,

            item_spawn_interval: 15.0,
            item_spawn_chance: 0.5,
            max_field_items: 3,
            item_drop_chance: 0.3,
            item_placement_attempts: 20,

            kill_score: KILL_SCORE,
        }
    }
}

impl Tuning {
    /// Parse tuning from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Write tuning as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Enemy max speed for a level
    pub fn enemy_speed_for_level(&self, level: u32) -> f64 {
        if level >= 2 {
            self.enemy_speed * (1.0 + level as f64 * self.level_speed_step)
        } else {
            self.enemy_speed
        }
    }

    /// Enemy shoot cooldown for a level
    pub fn enemy_cooldown_for_level(&self, level: u32) -> f64 {
        if level >= 3 {
            self.enemy_shoot_cooldown * self.level_cooldown_factor
        } else {
            self.enemy_shoot_cooldown
        }
    }
}
