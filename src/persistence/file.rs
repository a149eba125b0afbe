//! One JSON file per save in a directory

use std::path::{Path, PathBuf};

use super::{SaveRecord, SaveStore};
use crate::error::{Error, Result};

const EXTENSION: &str = "json";

/// Directory-backed store writing `<name>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Use `dir`, creating it if needed
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, EXTENSION))
    }
}

impl SaveStore for JsonFileStore {
    fn save(&mut self, record: &SaveRecord) -> Result<()> {
        let path = self.path_for(&record.name);
        // Write to a temp file first so a crash never leaves half a save
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(record)?)?;
        std::fs::rename(&tmp, &path)?;
        log::info!("Game saved to {}", path.display());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<SaveRecord> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(Error::NotFound(name.to_string()));
        }
        let json = std::fs::read_to_string(&path)?;
        let record: SaveRecord = serde_json::from_str(&json)?;
        record.validate()?;
        Ok(record)
    }

    fn list(&self) -> Result<Vec<SaveRecord>> {
        let mut records = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.load(name) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("Skipping save {}: {}", path.display(), e),
            }
        }
        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(Error::NotFound(name.to_string()));
        }
        std::fs::remove_file(&path)?;
        log::info!("Deleted save {}", name);
        Ok(())
    }
}
