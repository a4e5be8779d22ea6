//! Time-expiring snapshot cache.
//!
//! The cache holds exactly one snapshot: the last aggregation result, its
//! genre, and a timestamp. It is consulted before fetching and written after;
//! expiry discards the snapshot wholesale — there is no partial invalidation.
//! The store is passed into the service explicitly so tests can substitute
//! [`MemoryStore`].

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::CategoryResult;

/// The cached unit: one genre's merged lists plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Genre label the lists were assembled for.
    pub genre: String,
    /// When the aggregation pass ran.
    pub generated_at: DateTime<Utc>,
    /// Source names in the priority order used, for stable rendering.
    pub sources: Vec<String>,
    /// The merged lists.
    pub lists: CategoryResult,
}

impl Snapshot {
    /// Age of this snapshot relative to now.
    pub fn age(&self) -> Duration {
        Utc::now() - self.generated_at
    }
}

/// Storage for the single snapshot.
pub trait SnapshotStore: Send + Sync {
    /// The stored snapshot, or `None` when missing or expired.
    fn load(&self) -> Result<Option<Snapshot>>;

    /// Replace the stored snapshot.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

/// JSON-file-backed store with a time-to-live.
pub struct FileStore {
    path: PathBuf,
    ttl: Duration,
}

impl FileStore {
    /// Create a store over `path` whose snapshots expire after `ttl_hours`.
    pub fn new(path: PathBuf, ttl_hours: u64) -> Self {
        Self {
            path,
            ttl: Duration::hours(ttl_hours as i64),
        }
    }

    /// The backing file location.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Delete the backing file. Missing file counts as success.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SnapshotStore for FileStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&content)
            .map_err(|e| Error::cache(format!("corrupt snapshot at {:?}: {e}", self.path)))?;

        if snapshot.age() > self.ttl {
            debug!(path = ?self.path, "snapshot expired, treating as miss");
            return Ok(None);
        }

        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| Error::cache(format!("serialize snapshot: {e}")))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-process store, primarily for tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Option<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        let guard = self
            .inner
            .lock()
            .map_err(|_| Error::cache("memory store poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| Error::cache("memory store poisoned"))?;
        *guard = Some(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(generated_at: DateTime<Utc>) -> Snapshot {
        Snapshot {
            genre: "Thriller".to_string(),
            generated_at,
            sources: vec!["tmdb".to_string()],
            lists: CategoryResult::default(),
        }
    }

    fn store_in(dir: &tempfile::TempDir, ttl_hours: u64) -> FileStore {
        FileStore::new(dir.path().join("snapshot.json"), ttl_hours)
    }

    #[test]
    fn missing_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, 12);
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, 12);

        store.save(&snapshot(Utc::now())).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.genre, "Thriller");
        assert_eq!(loaded.sources, vec!["tmdb"]);
    }

    #[test]
    fn expired_snapshot_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, 12);

        store
            .save(&snapshot(Utc::now() - Duration::hours(13)))
            .unwrap();
        assert!(store.load().unwrap().is_none());

        // Just inside the TTL still hits.
        store
            .save(&snapshot(Utc::now() - Duration::hours(11)))
            .unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn corrupt_file_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, 12);

        std::fs::write(store.path(), "not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(matches!(err, Error::Cache(_)));
    }

    #[test]
    fn clear_removes_file_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir, 12);

        store.clear().unwrap(); // nothing there yet
        store.save(&snapshot(Utc::now())).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&snapshot(Utc::now())).unwrap();
        assert_eq!(store.load().unwrap().unwrap().genre, "Thriller");
    }
}
