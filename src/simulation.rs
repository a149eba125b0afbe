//! Frame-driven controller
//!
//! [`Simulation`] owns the [`GameState`], the seeded RNG and the external
//! services (levels, saves, sound). Callers drive it with `update(dt)` once
//! per frame and feed it player intents in between.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{NullSink, SoundEffect, SoundSink};
use crate::levels::{BuiltinLevels, LevelDescription, LevelProvider};
use crate::persistence::{MemoryStore, SaveRecord, SaveStore};
use crate::sim::entity::{Bullet, Direction, Wall};
use crate::sim::item::{Item, ItemKind};
use crate::sim::state::{GamePhase, GameState};
use crate::sim::tank::{EnemyTank, PlayerTank};
use crate::sim::{tick, wave};
use crate::tuning::Tuning;

/// External collaborators handed to the controller at construction
pub struct Services {
    pub levels: Box<dyn LevelProvider>,
    pub saves: Box<dyn SaveStore>,
    pub sound: Box<dyn SoundSink>,
}

impl Default for Services {
    /// Built-in levels, in-memory saves, silent sound
    fn default() -> Self {
        Self {
            levels: Box::new(BuiltinLevels::new()),
            saves: Box::new(MemoryStore::new()),
            sound: Box::new(NullSink),
        }
    }
}

pub struct Simulation {
    state: GameState,
    services: Services,
    rng: Pcg32,
    seed: u64,
}

impl Simulation {
    pub fn new(services: Services, tuning: Tuning, seed: u64) -> Self {
        let mut state = GameState::new(tuning);
        state.level_count = services.levels.level_count().max(1);
        Self {
            state,
            services,
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// Fresh run from `level`: new player, zero score, level loaded
    pub fn start_game(&mut self, level: u32) {
        let state = &mut self.state;
        state.level = level.clamp(1, state.level_count);
        state.score = 0;
        state.player = GameState::fresh_player(&state.tuning, state.player_spawn);
        self.load_current_level();
        self.state.set_phase(GamePhase::Running);
        self.state.emit(SoundEffect::GameStart);
        self.flush_sounds();
        log::info!("Game started at level {} (seed {})", self.state.level, self.seed);
    }

    /// Load `desc` for the current level number and start running.
    /// `None` asks for the procedural fallback layout.
    pub fn initialize(&mut self, desc: Option<LevelDescription>) {
        wave::load_level(&mut self.state, desc.as_ref(), &mut self.rng);
        self.state.set_phase(GamePhase::Running);
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f64) {
        tick::tick(&mut self.state, dt, &mut self.rng);
        self.flush_sounds();
    }

    pub fn handle_move_intent(&mut self, direction: Direction, moving: bool) {
        tick::apply_move_intent(&mut self.state, direction, moving);
        self.flush_sounds();
    }

    /// Returns whether a bullet left the barrel
    pub fn request_fire(&mut self) -> bool {
        let fired = tick::player_fire(&mut self.state);
        self.flush_sounds();
        fired
    }

    pub fn pause(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.state.set_phase(GamePhase::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Paused {
            self.state.set_phase(GamePhase::Running);
        }
    }

    pub fn current_state(&self) -> GamePhase {
        self.state.phase
    }

    /// LevelComplete -> next level, or Victory when none remain
    pub fn advance_level(&mut self) {
        if self.state.phase != GamePhase::LevelComplete {
            return;
        }
        if !self.state.has_next_level() {
            self.state.set_phase(GamePhase::Victory);
            return;
        }
        self.state.level += 1;
        let spawn = self.state.player_spawn;
        let window = self.state.tuning.respawn_invincibility;
        self.state.player.respawn(spawn, Direction::Up, window);
        self.load_current_level();
        self.state.set_phase(GamePhase::Running);
        self.state.emit(SoundEffect::GameStart);
        self.flush_sounds();
    }

    /// Store progress under `name` (empty means auto-named)
    pub fn save_game(&mut self, name: &str) -> bool {
        let player = &self.state.player;
        let mut record = SaveRecord::new(name, self.state.level, self.state.score, player.lives);
        record.shield = player.has_shield();
        record.speed_boost = player.has_speed_boost();
        record.fire_power = player.has_fire_power();
        record.ensure_name();

        match self.services.saves.save(&record) {
            Ok(()) => {
                log::info!("Saved game '{}' at level {}", record.name, record.level);
                true
            }
            Err(e) => {
                log::warn!("Failed to save game '{}': {}", record.name, e);
                false
            }
        }
    }

    /// Restore progress from `name` and resume play at the saved level
    pub fn load_game(&mut self, name: &str) -> bool {
        let record = match self.services.saves.load(name) {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Failed to load game '{}': {}", name, e);
                return false;
            }
        };

        let state = &mut self.state;
        state.level = record.level.clamp(1, state.level_count);
        state.score = record.score;
        let mut player = GameState::fresh_player(&state.tuning, state.player_spawn);
        player.lives = record.lives;
        if record.shield {
            player.activate_shield(ItemKind::Shield.duration());
        }
        if record.speed_boost {
            player.activate_speed_boost(ItemKind::Speed.duration());
        }
        if record.fire_power {
            player.activate_fire_power(ItemKind::Power.duration());
        }
        state.player = player;

        self.load_current_level();
        self.state.set_phase(GamePhase::Running);
        log::info!("Loaded game '{}' at level {}", record.name, self.state.level);
        true
    }

    /// All stored saves; empty if the store cannot be read
    pub fn saves(&self) -> Vec<SaveRecord> {
        self.services.saves.list().unwrap_or_else(|e| {
            log::warn!("Failed to list saves: {}", e);
            Vec::new()
        })
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn level_count(&self) -> u32 {
        self.state.level_count
    }

    pub fn remaining_enemies(&self) -> u32 {
        self.state.remaining_enemies
    }

    pub fn player(&self) -> &PlayerTank {
        &self.state.player
    }

    pub fn enemies(&self) -> &[EnemyTank] {
        &self.state.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.state.bullets
    }

    pub fn walls(&self) -> &[Wall] {
        &self.state.walls
    }

    pub fn items(&self) -> &[Item] {
        &self.state.items
    }

    /// Full state for renderers and debugging
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable state access for scripted setups
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    fn load_current_level(&mut self) {
        let desc = self.services.levels.level(self.state.level);
        if desc.is_none() {
            log::info!("No description for level {}, generating one", self.state.level);
        }
        wave::load_level(&mut self.state, desc.as_ref(), &mut self.rng);
    }

    fn flush_sounds(&mut self) {
        for effect in self.state.sounds.drain(..) {
            self.services.sound.play(effect);
        }
    }
}
