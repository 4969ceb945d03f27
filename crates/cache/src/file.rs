use crate::error::CacheError;
use crate::snapshot::{CacheKey, CachedSnapshot};
use crate::SnapshotStore;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Format version written into every cache file. Files with any other
/// version are discarded on read.
pub const CACHE_VERSION: &str = "1.0.0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a> {
    version: &'a str,
    saved_at: DateTime<Utc>,
    entries: Vec<&'a CachedSnapshot>,
}

// Version is checked before decoding; `savedAt` is informational.
#[derive(Deserialize)]
struct Envelope {
    entries: Vec<CachedSnapshot>,
}

type Entries = BTreeMap<CacheKey, CachedSnapshot>;

/// A store backed by a single JSON document on disk.
///
/// Every operation reads the whole file and writes it back through a
/// temporary file and a rename. A process-local mutex serialises the
/// read-modify-write cycle.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Entries, CacheError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(e) => return Err(e.into()),
        };

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Cache file is not valid JSON, ignoring it.");
                return Ok(Entries::new());
            }
        };

        let version = value.get("version").and_then(Value::as_str);
        if version != Some(CACHE_VERSION) {
            tracing::warn!(
                path = %self.path.display(),
                found = version.unwrap_or("none"),
                expected = CACHE_VERSION,
                "Cache version mismatch, clearing data."
            );
            self.delete_file()?;
            return Ok(Entries::new());
        }

        let envelope: Envelope = match serde_json::from_value(value) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Cache entries could not be decoded, ignoring them.");
                return Ok(Entries::new());
            }
        };

        Ok(envelope
            .entries
            .into_iter()
            .map(|snapshot| (snapshot.key(), snapshot))
            .collect())
    }

    fn save(&self, entries: &Entries) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let envelope = EnvelopeRef {
            version: CACHE_VERSION,
            saved_at: Utc::now(),
            entries: entries.values().collect(),
        };
        let bytes = serde_json::to_vec_pretty(&envelope)?;

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, bytes)?;
        fs::rename(&staging, &self.path)?;

        tracing::debug!(path = %self.path.display(), entries = entries.len(), "Cache file written.");
        Ok(())
    }

    fn delete_file(&self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn get(&self, key: &CacheKey) -> Result<Option<CachedSnapshot>, CacheError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    fn put(&self, snapshot: CachedSnapshot) -> Result<(), CacheError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        entries.insert(snapshot.key(), snapshot);
        self.save(&entries)
    }

    fn remove(&self, key: &CacheKey) -> Result<bool, CacheError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        let removed = entries.remove(key).is_some();
        if removed {
            self.save(&entries)?;
        }
        Ok(removed)
    }

    fn list(&self) -> Result<Vec<CachedSnapshot>, CacheError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.into_values().collect())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let _guard = self.lock.lock();
        self.delete_file()?;
        tracing::info!(path = %self.path.display(), "Cleared all cached snapshots.");
        Ok(())
    }
}
