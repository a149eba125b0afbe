//! Game state and core simulation types
//!
//! Everything a frame reads or writes lives in [`GameState`]. The controller
//! owns it exclusively; entities are created by spawn/fire and destroyed by
//! leaving their collection.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::entity::{Arena, Bullet, Wall};
use super::item::Item;
use super::tank::{EnemyTank, PlayerTank};
use crate::audio::SoundEffect;
use crate::tuning::Tuning;

/// Top-level game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing loaded yet
    #[default]
    Menu,
    /// Active gameplay
    Running,
    /// Frozen mid-level
    Paused,
    /// Last level cleared
    Victory,
    /// Player out of lives
    GameOver,
    /// Level cleared, more remain
    LevelComplete,
}

impl GamePhase {
    /// Phases where no further input changes the outcome
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Victory | GamePhase::GameOver)
    }
}

/// Default player spawn point
pub const DEFAULT_PLAYER_SPAWN: DVec2 = DVec2::new(400.0, 520.0);

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub tuning: Tuning,
    pub arena: Arena,
    /// Current level (1-based)
    pub level: u32,
    /// Number of levels the provider knows about
    pub level_count: u32,
    pub score: u64,
    /// Enemies still to be spawned this level
    pub remaining_enemies: u32,
    pub player: PlayerTank,
    pub player_spawn: DVec2,
    /// Candidate enemy spawn points (empty means the defaults)
    pub enemy_spawns: Vec<DVec2>,
    pub enemies: Vec<EnemyTank>,
    pub bullets: Vec<Bullet>,
    pub walls: Vec<Wall>,
    pub items: Vec<Item>,
    /// Seconds accumulated toward the next periodic item roll
    pub item_timer: f64,
    /// Frames simulated while running
    pub frames: u64,
    /// Sound events raised since the last drain
    #[serde(skip)]
    pub sounds: Vec<SoundEffect>,
}

impl GameState {
    pub fn new(tuning: Tuning) -> Self {
        let arena = Arena {
            width: tuning.arena_width,
            height: tuning.arena_height,
        };
        let player = Self::fresh_player(&tuning, DEFAULT_PLAYER_SPAWN);
        Self {
            phase: GamePhase::Menu,
            tuning,
            arena,
            level: 1,
            level_count: 1,
            score: 0,
            remaining_enemies: 0,
            player,
            player_spawn: DEFAULT_PLAYER_SPAWN,
            enemy_spawns: Vec::new(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            walls: Vec::new(),
            items: Vec::new(),
            item_timer: 0.0,
            frames: 0,
            sounds: Vec::new(),
        }
    }

    /// A new player with full lives at `spawn`
    pub fn fresh_player(tuning: &Tuning, spawn: DVec2) -> PlayerTank {
        PlayerTank::new(
            spawn,
            tuning.player_speed,
            tuning.player_shoot_cooldown,
            tuning.player_lives,
        )
    }

    /// Enemy spawn candidates, falling back to the top row defaults
    pub fn enemy_spawn_candidates(&self) -> Vec<DVec2> {
        if !self.enemy_spawns.is_empty() {
            return self.enemy_spawns.clone();
        }
        let g = self.tuning.grid_size as f64;
        let w = self.arena.width as f64;
        vec![
            DVec2::new(g, g),
            DVec2::new(w / 2.0, g),
            DVec2::new(w - 2.0 * g, g),
        ]
    }

    pub fn has_next_level(&self) -> bool {
        self.level < self.level_count
    }

    /// No live enemies and nothing left to spawn
    pub fn is_level_cleared(&self) -> bool {
        self.remaining_enemies == 0 && self.enemies.iter().all(|e| !e.tank.body.alive)
    }

    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.tank.body.alive).count()
    }

    pub fn add_kill_score(&mut self, kills: u64) {
        self.score += kills * self.tuning.kill_score;
    }

    /// Change phase, logging the transition
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!(
                "Phase {:?} -> {:?} (level {}, score {})",
                self.phase,
                phase,
                self.level,
                self.score
            );
            self.phase = phase;
        }
    }

    /// Queue a sound event for the sink
    pub fn emit(&mut self, sound: SoundEffect) {
        self.sounds.push(sound);
    }

    /// Reset per-level collections
    pub fn clear_field(&mut self) {
        self.enemies.clear();
        self.bullets.clear();
        self.walls.clear();
        self.items.clear();
        self.item_timer = 0.0;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}
