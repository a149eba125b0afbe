//! In-memory save store

use std::collections::BTreeMap;

use super::{SaveRecord, SaveStore};
use crate::error::{Error, Result};

/// Keeps saves in a map keyed by name; nothing touches disk
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<String, SaveRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SaveStore for MemoryStore {
    fn save(&mut self, record: &SaveRecord) -> Result<()> {
        self.records.insert(record.name.clone(), record.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<SaveRecord> {
        let record = self
            .records
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        record.validate()?;
        Ok(record)
    }

    fn list(&self) -> Result<Vec<SaveRecord>> {
        Ok(self.records.values().cloned().collect())
    }

    fn delete(&mut self, name: &str) -> Result<()> {
        self.records
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_delete() {
        let mut store = MemoryStore::new();
        store.save(&SaveRecord::new("b", 2, 200, 2)).unwrap();
        store.save(&SaveRecord::new("a", 1, 100, 3)).unwrap();

        assert_eq!(store.load("a").unwrap().score, 100);
        let names: Vec<_> = store.list().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["a", "b"]);

        store.delete("a").unwrap();
        assert!(matches!(store.load("a"), Err(Error::NotFound(_))));
        assert!(store.delete("a").is_err());
        assert!(store.exists("b"));
    }

    #[test]
    fn test_overwrite_same_name() {
        let mut store = MemoryStore::new();
        store.save(&SaveRecord::new("slot", 1, 100, 3)).unwrap();
        store.save(&SaveRecord::new("slot", 4, 900, 1)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load("slot").unwrap().level, 4);
    }
}
