/// Incremental multi-source search aggregation cache
///
/// Each distinct query string owns one entry that accumulates partial
/// results as independent sources respond, in any order. Entries are
/// bounded in number (oldest-timestamp eviction) and in age (lazy expiry
/// on read plus an explicit sweep).
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, info};

use super::VideoItem;

/// Aggregated state for one search query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCacheEntry {
    /// Merged results, deduplicated by `(source_code, vod_id)`
    pub results: Vec<VideoItem>,

    /// Sources that have already contributed a partial result
    pub completed_source_ids: BTreeSet<String>,

    /// True once every configured source has reported
    pub is_complete: bool,

    /// Last-write instant (unix milliseconds), drives expiry and eviction
    pub timestamp_ms: i64,
}

/// Bounded, expiring cache of aggregated search results.
///
/// All operations are total: nothing here performs I/O or fails. Note that
/// `get` is a read with a write side effect (an expired entry is removed
/// before reporting a miss); callers that must not mutate use `peek`.
#[derive(Debug, Clone)]
pub struct SearchCache {
    /// Entries keyed by the literal query string
    entries: HashMap<String, SearchCacheEntry>,

    /// Maximum number of distinct queries retained
    max_entries: usize,

    /// Entry lifetime in milliseconds
    expiry_ms: i64,
}

impl SearchCache {
    /// Create a cache with the given capacity and entry lifetime
    pub fn new(max_entries: usize, expiry_ms: i64) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries,
            expiry_ms,
        }
    }

    /// Look up a query, dropping the entry first if it has expired.
    ///
    /// An entry older than the configured lifetime is removed and reported
    /// as a miss.
    pub fn get(&mut self, query: &str) -> Option<&SearchCacheEntry> {
        self.get_at(query, Utc::now().timestamp_millis())
    }

    /// `get` against an explicit clock, used by tests and the store
    pub fn get_at(&mut self, query: &str, now_ms: i64) -> Option<&SearchCacheEntry> {
        let expired = match self.entries.get(query) {
            Some(entry) => now_ms - entry.timestamp_ms > self.expiry_ms,
            None => return None,
        };

        if expired {
            self.entries.remove(query);
            debug!("⏰ Cache entry expired for query: {}", query);
            return None;
        }

        self.entries.get(query)
    }

    /// Side-effect-free lookup that ignores expiry state
    pub fn peek(&self, query: &str) -> Option<&SearchCacheEntry> {
        self.entries.get(query)
    }

    /// Merge a partial result batch into the entry for `query`.
    ///
    /// A new query may evict the oldest existing entry to stay within
    /// capacity. An existing entry keeps its prior results' positions on
    /// duplicate identity, unions the contributing source set, and never
    /// loses a true `is_complete` flag.
    pub fn update(
        &mut self,
        query: &str,
        new_results: Vec<VideoItem>,
        completed_source_ids: impl IntoIterator<Item = String>,
        is_complete: bool,
    ) {
        self.update_at(
            query,
            new_results,
            completed_source_ids,
            is_complete,
            Utc::now().timestamp_millis(),
        );
    }

    /// `update` against an explicit clock, used by tests and the store
    pub fn update_at(
        &mut self,
        query: &str,
        new_results: Vec<VideoItem>,
        completed_source_ids: impl IntoIterator<Item = String>,
        is_complete: bool,
        now_ms: i64,
    ) {
        if let Some(entry) = self.entries.get_mut(query) {
            let existing = std::mem::take(&mut entry.results);
            entry.results = dedup_by_identity(existing.into_iter().chain(new_results));
            entry.completed_source_ids.extend(completed_source_ids);
            entry.is_complete = entry.is_complete || is_complete;
            entry.timestamp_ms = now_ms;
            debug!(
                "🔀 Merged batch into '{}': {} results from {} sources",
                query,
                entry.results.len(),
                entry.completed_source_ids.len()
            );
            return;
        }

        if self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }

        let entry = SearchCacheEntry {
            results: dedup_by_identity(new_results),
            completed_source_ids: completed_source_ids.into_iter().collect(),
            is_complete,
            timestamp_ms: now_ms,
        };
        debug!("🆕 Created cache entry for '{}' with {} results", query, entry.results.len());
        self.entries.insert(query.to_string(), entry);
    }

    /// Remove all entries unconditionally
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        if count > 0 {
            info!("🧹 Cleared {} cached searches", count);
        }
    }

    /// Explicit sweep removing every expired entry
    pub fn clean_expired(&mut self) {
        self.clean_expired_at(Utc::now().timestamp_millis());
    }

    /// `clean_expired` against an explicit clock
    pub fn clean_expired_at(&mut self, now_ms: i64) {
        let before = self.entries.len();
        let expiry_ms = self.expiry_ms;
        self.entries.retain(|_, entry| now_ms - entry.timestamp_ms <= expiry_ms);
        let removed = before - self.entries.len();
        if removed > 0 {
            info!("🧹 Swept {} expired search entries", removed);
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clone of the entry map, used for snapshots
    pub fn export(&self) -> HashMap<String, SearchCacheEntry> {
        self.entries.clone()
    }

    /// Replace all entries from a snapshot, dropping overflow beyond capacity
    pub fn restore(&mut self, entries: HashMap<String, SearchCacheEntry>) {
        self.entries = entries;
        while self.entries.len() > self.max_entries {
            self.evict_oldest();
        }
    }

    /// Drop the entry with the smallest timestamp (linear scan; the first
    /// entry encountered wins a tie)
    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .fold(None::<(&String, i64)>, |oldest, (key, entry)| match oldest {
                Some((_, ts)) if ts <= entry.timestamp_ms => oldest,
                _ => Some((key, entry.timestamp_ms)),
            })
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            info!("🗑️ Evicted oldest cached search: {}", key);
        }
    }
}

/// Deduplicate by `(source_code, vod_id)`, keeping the first occurrence
fn dedup_by_identity(items: impl IntoIterator<Item = VideoItem>) -> Vec<VideoItem> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.identity()))
        .collect()
}
