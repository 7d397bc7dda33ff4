/// JSON snapshot persistence for the search store
///
/// Persists exactly the rehydratable subset of search state: the history
/// log and the aggregation cache entries. Transient UI state (the current
/// query string, loading flags) is never written.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::search::{SearchCacheEntry, SearchHistoryItem};

/// Serialized shape of the persisted search state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Recent searches, most recently used first
    #[serde(default)]
    pub search_history: Vec<SearchHistoryItem>,

    /// Aggregated search results keyed by query
    #[serde(default)]
    pub search_cache: HashMap<String, SearchCacheEntry>,
}

/// Snapshot persistence failures
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads and writes snapshots at a fixed path
#[derive(Debug, Clone)]
pub struct SnapshotManager {
    path: PathBuf,
}

impl SnapshotManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot, failing on unreadable or malformed content
    pub async fn load(&self) -> Result<Snapshot, SnapshotError> {
        let content = fs::read_to_string(&self.path).await.map_err(|source| SnapshotError::Read {
            path: self.path.clone(),
            source,
        })?;
        let snapshot = serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
            path: self.path.clone(),
            source,
        })?;
        Ok(snapshot)
    }

    /// Load the snapshot, treating any failure as an empty prior state.
    ///
    /// The store must tolerate starting cold, so a missing file is a debug
    /// event and a corrupt one only a warning.
    pub async fn load_or_default(&self) -> Snapshot {
        match self.load().await {
            Ok(snapshot) => {
                info!(
                    "📂 Restored snapshot: {} history items, {} cached searches",
                    snapshot.search_history.len(),
                    snapshot.search_cache.len()
                );
                snapshot
            }
            Err(SnapshotError::Read { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                debug!("No snapshot at {}, starting empty", self.path.display());
                Snapshot::default()
            }
            Err(e) => {
                warn!("⚠️ Ignoring unusable snapshot: {}", e);
                Snapshot::default()
            }
        }
    }

    /// Write the snapshot, creating parent directories as needed
    pub async fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|source| SnapshotError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        // Serializing in-memory types cannot fail here; map anyway to keep
        // the error type honest
        let content = serde_json::to_string_pretty(snapshot).map_err(|source| SnapshotError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, content).await.map_err(|source| SnapshotError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!("💾 Saved snapshot to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::VideoItem;
    use std::collections::BTreeSet;

    fn sample_snapshot() -> Snapshot {
        let mut cache = HashMap::new();
        cache.insert(
            "one piece".to_string(),
            SearchCacheEntry {
                results: vec![VideoItem::new("s1", "11", "One Piece")],
                completed_source_ids: BTreeSet::from(["s1".to_string(), "s2".to_string()]),
                is_complete: true,
                timestamp_ms: 1_700_000_000_000,
            },
        );
        Snapshot {
            search_history: vec![SearchHistoryItem {
                id: 1,
                content: "one piece".to_string(),
                created_at_ms: 1_700_000_000_000,
                updated_at_ms: 1_700_000_000_500,
            }],
            search_cache: cache,
        }
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SnapshotManager::new(dir.path().join("search.json"));

        let snapshot = sample_snapshot();
        manager.save(&snapshot).await.unwrap();
        let restored = manager.load().await.unwrap();
        assert_eq!(restored, snapshot);
    }

    #[tokio::test]
    async fn test_missing_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SnapshotManager::new(dir.path().join("nope.json"));

        let snapshot = manager.load_or_default().await;
        assert!(snapshot.search_history.is_empty());
        assert!(snapshot.search_cache.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search.json");
        fs::write(&path, "{not json").await.unwrap();

        let manager = SnapshotManager::new(path);
        assert!(matches!(manager.load().await, Err(SnapshotError::Parse { .. })));
        assert_eq!(manager.load_or_default().await, Snapshot::default());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SnapshotManager::new(dir.path().join("nested/deeper/search.json"));
        manager.save(&Snapshot::default()).await.unwrap();
        assert!(manager.path().exists());
    }
}
