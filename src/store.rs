/// Unified search store
///
/// Wraps the aggregation cache and the history log behind one lock so that
/// every read-modify-write sequence is a single critical section, which is
/// what makes out-of-order merges from concurrently resolving sources safe.
/// Optionally attached snapshot persistence is best effort: a failed save
/// is logged and absorbed, never surfaced to the caller.
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::Config;
use crate::persistence::{Snapshot, SnapshotManager};
use crate::search::{SearchCache, SearchCacheEntry, SearchHistory, SearchHistoryItem, VideoItem};

#[derive(Debug)]
struct StoreInner {
    cache: SearchCache,
    history: SearchHistory,
}

/// Thread-safe facade over the search cache and history log
#[derive(Debug, Clone)]
pub struct SearchStore {
    inner: Arc<RwLock<StoreInner>>,
    snapshots: Option<Arc<SnapshotManager>>,
}

impl SearchStore {
    /// Create an empty store without persistence
    pub fn new(config: &Config) -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                cache: SearchCache::new(config.cache.max_entries, config.cache.expiry_ms()),
                history: SearchHistory::new(config.history.max_entries),
            })),
            snapshots: None,
        }
    }

    /// Create a store rehydrated from (and saving to) the given snapshot
    /// manager
    pub async fn with_snapshots(config: &Config, snapshots: SnapshotManager) -> Self {
        let store = Self::new(config);
        let snapshot = snapshots.load_or_default().await;
        {
            let mut inner = store.inner.write().await;
            inner.cache.restore(snapshot.search_cache);
            inner.history.restore(snapshot.search_history);
        }
        info!("📊 Search store initialized from snapshot");
        Self {
            snapshots: Some(Arc::new(snapshots)),
            ..store
        }
    }

    /// Aggregated results known for a query right now.
    ///
    /// Expired entries are dropped as a side effect and reported as a miss.
    pub async fn cached_results(&self, query: &str) -> Option<SearchCacheEntry> {
        let (entry, expired_one) = {
            let mut inner = self.inner.write().await;
            let before = inner.cache.len();
            let entry = inner.cache.get(query).cloned();
            (entry, inner.cache.len() < before)
        };
        if expired_one {
            // The lookup dropped an expired entry; keep the snapshot honest
            self.persist().await;
        }
        entry
    }

    /// Side-effect-free cache lookup
    pub async fn peek(&self, query: &str) -> Option<SearchCacheEntry> {
        self.inner.read().await.cache.peek(query).cloned()
    }

    /// Merge one source's partial batch for a query.
    ///
    /// The whole merge happens under the write lock, so concurrently
    /// resolving sources can call this in any order without losing updates.
    pub async fn apply_partial(&self, query: &str, source_id: &str, items: Vec<VideoItem>, is_last: bool) {
        {
            let mut inner = self.inner.write().await;
            inner
                .cache
                .update(query, items, std::iter::once(source_id.to_string()), is_last);
        }
        self.persist().await;
    }

    /// Record a search term in the history log
    pub async fn record_search(&self, content: &str) -> u64 {
        let id = {
            let mut inner = self.inner.write().await;
            inner.history.add(content)
        };
        self.persist().await;
        id
    }

    /// Recent searches, most recently used first
    pub async fn history(&self) -> Vec<SearchHistoryItem> {
        self.inner.read().await.history.items().to_vec()
    }

    /// Remove one history item by id
    pub async fn remove_history(&self, id: u64) -> bool {
        let removed = {
            let mut inner = self.inner.write().await;
            inner.history.remove(id)
        };
        if removed {
            self.persist().await;
        }
        removed
    }

    /// Drop all history items
    pub async fn clear_history(&self) {
        {
            let mut inner = self.inner.write().await;
            inner.history.clear();
        }
        self.persist().await;
    }

    /// Drop all cached searches
    pub async fn clear_cache(&self) {
        {
            let mut inner = self.inner.write().await;
            inner.cache.clear();
        }
        self.persist().await;
    }

    /// Sweep expired cache entries
    pub async fn clean_expired(&self) {
        {
            let mut inner = self.inner.write().await;
            inner.cache.clean_expired();
        }
        self.persist().await;
    }

    /// Number of cached queries
    pub async fn cached_query_count(&self) -> usize {
        self.inner.read().await.cache.len()
    }

    /// Current persistable state
    pub async fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read().await;
        Snapshot {
            search_history: inner.history.export(),
            search_cache: inner.cache.export(),
        }
    }

    async fn persist(&self) {
        let Some(snapshots) = &self.snapshots else {
            return;
        };
        let snapshot = self.snapshot().await;
        if let Err(e) = snapshots.save(&snapshot).await {
            warn!("⚠️ Snapshot save failed, continuing in memory: {}", e);
        }
    }
}
