use crate::error::CacheError;
use crate::snapshot::{CacheKey, CachedSnapshot};
use crate::SnapshotStore;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// An in-process store; entries live as long as the value.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<CacheKey, CachedSnapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &CacheKey) -> Result<Option<CachedSnapshot>, CacheError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, snapshot: CachedSnapshot) -> Result<(), CacheError> {
        self.entries.write().insert(snapshot.key(), snapshot);
        Ok(())
    }

    fn remove(&self, key: &CacheKey) -> Result<bool, CacheError> {
        Ok(self.entries.write().remove(key).is_some())
    }

    fn list(&self) -> Result<Vec<CachedSnapshot>, CacheError> {
        Ok(self.entries.read().values().cloned().collect())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.entries.write().clear();
        Ok(())
    }
}
