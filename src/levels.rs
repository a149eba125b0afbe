//! Level descriptions and their providers
//!
//! A level description carries the enemy quota, spawn points and wall
//! layout. The simulation asks a [`LevelProvider`] for one by number; a
//! missing description means "generate a layout procedurally".
//!
//! The JSON shape matches hand-written level files:
//!
//! ```json
//! {
//!   "levelNumber": 2,
//!   "levelName": "Level 2",
//!   "enemyTankCount": 12,
//!   "playerSpawn": { "x": 400, "y": 500 },
//!   "enemySpawns": [{ "x": 100, "y": 100 }],
//!   "walls": [{ "x": 250, "y": 300, "width": 40, "height": 40, "type": "brick" }]
//! }
//! ```

use std::path::{Path, PathBuf};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;
use crate::error::{Error, Result};
use crate::sim::entity::{Wall, WallKind};

/// Integer spawn coordinate (top-left of the tank)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub x: i32,
    pub y: i32,
}

impl SpawnPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_vec(self) -> DVec2 {
        DVec2::new(self.x as f64, self.y as f64)
    }
}

/// One wall in a level layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallPlacement {
    pub x: i32,
    pub y: i32,
    /// Non-positive means one grid cell
    #[serde(default)]
    pub width: i32,
    #[serde(default)]
    pub height: i32,
    #[serde(rename = "type")]
    pub kind: WallKind,
}

impl WallPlacement {
    pub fn new(x: i32, y: i32, kind: WallKind) -> Self {
        Self {
            x,
            y,
            width: GRID_SIZE as i32,
            height: GRID_SIZE as i32,
            kind,
        }
    }

    /// Build the wall, substituting `grid` for non-positive sizes
    pub fn to_wall(&self, grid: u32) -> Wall {
        let size = |v: i32| if v > 0 { v as u32 } else { grid };
        Wall::new(
            DVec2::new(self.x as f64, self.y as f64),
            size(self.width),
            size(self.height),
            self.kind,
        )
    }
}

/// A structured level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelDescription {
    pub level_number: u32,
    #[serde(default)]
    pub level_name: String,
    pub enemy_tank_count: u32,
    #[serde(default)]
    pub player_spawn: Option<SpawnPoint>,
    #[serde(default)]
    pub enemy_spawns: Vec<SpawnPoint>,
    #[serde(default)]
    pub walls: Vec<WallPlacement>,
}

impl LevelDescription {
    /// Parse a description from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a description from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }
}

/// Source of level descriptions
pub trait LevelProvider {
    /// Description for a 1-based level number, `None` if not defined
    fn level(&self, number: u32) -> Option<LevelDescription>;

    /// Number of levels available
    fn level_count(&self) -> u32;
}

/// The five stock levels
#[derive(Debug, Clone)]
pub struct BuiltinLevels {
    levels: Vec<LevelDescription>,
}

/// Number of stock levels
pub const BUILTIN_LEVEL_COUNT: u32 = 5;

impl BuiltinLevels {
    pub fn new() -> Self {
        Self {
            levels: (1..=BUILTIN_LEVEL_COUNT).map(builtin_level).collect(),
        }
    }
}

impl Default for BuiltinLevels {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelProvider for BuiltinLevels {
    fn level(&self, number: u32) -> Option<LevelDescription> {
        self.levels.iter().find(|l| l.level_number == number).cloned()
    }

    fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }
}

/// Stock level `n`: a fixed core plus one extra steel/brick pair per level
fn builtin_level(n: u32) -> LevelDescription {
    use WallKind::{Brick, Steel};

    let mut walls = vec![
        WallPlacement::new(250, 300, Brick),
        WallPlacement::new(290, 300, Brick),
        WallPlacement::new(330, 300, Brick),
        WallPlacement::new(450, 300, Brick),
        WallPlacement::new(490, 300, Brick),
        WallPlacement::new(530, 300, Brick),
        WallPlacement::new(370, 250, Steel),
        WallPlacement::new(410, 250, Steel),
    ];
    for i in 0..n as i32 {
        walls.push(WallPlacement::new(200 + i * 100, 200, Steel));
        walls.push(WallPlacement::new(200 + i * 100, 400, Brick));
    }

    LevelDescription {
        level_number: n,
        level_name: format!("Level {}", n),
        enemy_tank_count: 10 + (n - 1) * 2,
        player_spawn: Some(SpawnPoint::new(400, 500)),
        enemy_spawns: vec![
            SpawnPoint::new(100, 100),
            SpawnPoint::new(400, 100),
            SpawnPoint::new(700, 100),
        ],
        walls,
    }
}

/// Levels loaded from `*.json` files in a directory
#[derive(Debug, Clone)]
pub struct JsonLevelDir {
    dir: PathBuf,
    levels: Vec<LevelDescription>,
}

impl JsonLevelDir {
    /// Load every readable level file; falls back to the stock set when
    /// the directory is missing or yields nothing
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let levels = match Self::read_dir(&dir) {
            Ok(levels) if !levels.is_empty() => {
                log::info!("Loaded {} levels from {}", levels.len(), dir.display());
                levels
            }
            Ok(_) => {
                log::warn!("No level files in {}, using built-in levels", dir.display());
                BuiltinLevels::new().levels
            }
            Err(e) => {
                log::warn!("Cannot read level dir {}: {}, using built-in levels", dir.display(), e);
                BuiltinLevels::new().levels
            }
        };
        Self { dir, levels }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_dir(dir: &Path) -> Result<Vec<LevelDescription>> {
        if !dir.is_dir() {
            return Err(Error::NotFound(dir.display().to_string()));
        }
        let mut levels = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if !is_json {
                continue;
            }
            match LevelDescription::load(&path) {
                Ok(level) => {
                    log::debug!("Loaded level {} from {}", level.level_number, path.display());
                    levels.push(level);
                }
                Err(e) => log::warn!("Skipping level file {}: {}", path.display(), e),
            }
        }
        levels.sort_by_key(|l| l.level_number);
        Ok(levels)
    }
}

impl LevelProvider for JsonLevelDir {
    fn level(&self, number: u32) -> Option<LevelDescription> {
        self.levels.iter().find(|l| l.level_number == number).cloned()
    }

    fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }
}
