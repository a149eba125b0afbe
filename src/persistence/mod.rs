//! Save/load service
//!
//! A save is a small versioned record of progress: level, score, lives
//! and which buffs were active. The simulation hands records to a
//! [`SaveStore`] and only learns whether that worked.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

/// Prefix for auto-generated save names
pub const AUTO_SAVE_PREFIX: &str = "TankBattle_";

/// Persisted progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub name: String,
    pub level: u32,
    pub score: u64,
    pub lives: u32,
    #[serde(default)]
    pub shield: bool,
    #[serde(default)]
    pub speed_boost: bool,
    #[serde(default)]
    pub fire_power: bool,
    pub version: u32,
    /// Unix seconds
    #[serde(default)]
    pub saved_at: u64,
}

impl SaveRecord {
    pub fn new(name: impl Into<String>, level: u32, score: u64, lives: u32) -> Self {
        Self {
            name: name.into(),
            level,
            score,
            lives,
            shield: false,
            speed_boost: false,
            fire_power: false,
            version: SAVE_VERSION,
            saved_at: unix_now(),
        }
    }

    /// Fill in a generated name if none was given
    pub fn ensure_name(&mut self) {
        if self.name.trim().is_empty() {
            self.name = format!("{}{}", AUTO_SAVE_PREFIX, self.saved_at);
        }
    }

    /// Reject records from a newer format
    pub fn validate(&self) -> Result<()> {
        if self.version > SAVE_VERSION {
            return Err(Error::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

/// Storage backend for save records
pub trait SaveStore {
    fn save(&mut self, record: &SaveRecord) -> Result<()>;

    fn load(&self, name: &str) -> Result<SaveRecord>;

    /// All readable records
    fn list(&self) -> Result<Vec<SaveRecord>>;

    fn delete(&mut self, name: &str) -> Result<()>;

    fn exists(&self, name: &str) -> bool {
        self.load(name).is_ok()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
