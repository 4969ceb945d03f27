//! Local persistence of fetched dashboard data, so repeated reports for the
//! same symbol and date range do not hit the provider again.

// Declare the modules that make up this crate.
pub mod error;
pub mod file;
pub mod memory;
pub mod policy;
pub mod snapshot;

// Re-export the core types to provide a clean public API.
pub use error::CacheError;
pub use file::{JsonFileStore, CACHE_VERSION};
pub use memory::MemoryStore;
pub use policy::CachePolicy;
pub use snapshot::{CacheKey, CachedSnapshot, SnapshotStats};

/// Key-value storage of snapshots.
///
/// Writes are last-writer-wins per key. Implementations must be safe to share
/// across tasks.
pub trait SnapshotStore: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<Option<CachedSnapshot>, CacheError>;

    /// Inserts or replaces the snapshot under its own key.
    fn put(&self, snapshot: CachedSnapshot) -> Result<(), CacheError>;

    /// Returns whether an entry was removed.
    fn remove(&self, key: &CacheKey) -> Result<bool, CacheError>;

    /// All entries, ordered by key.
    fn list(&self) -> Result<Vec<CachedSnapshot>, CacheError>;

    fn clear(&self) -> Result<(), CacheError>;
}
