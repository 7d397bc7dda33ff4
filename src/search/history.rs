/// Recent-search history log
///
/// A small append/update/sort structure: one item per distinct search term,
/// kept sorted by most recently used.
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One recorded search term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    /// Stable identifier, used for targeted removal
    pub id: u64,

    /// The search term exactly as entered
    pub content: String,

    /// Creation instant (unix milliseconds)
    pub created_at_ms: i64,

    /// Last-used instant (unix milliseconds), governs sort order
    pub updated_at_ms: i64,
}

/// Ordered log of recent searches, newest-used first.
///
/// Re-adding an existing term refreshes its `updated_at_ms` instead of
/// duplicating it. An optional bound trims the least recently used tail.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    items: Vec<SearchHistoryItem>,
    next_id: u64,
    max_entries: Option<usize>,
}

impl SearchHistory {
    /// Create an empty history with an optional size bound
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            max_entries,
        }
    }

    /// Record a search term, upserting by exact content
    pub fn add(&mut self, content: &str) -> u64 {
        self.add_at(content, Utc::now().timestamp_millis())
    }

    /// `add` against an explicit clock, used by tests
    pub fn add_at(&mut self, content: &str, now_ms: i64) -> u64 {
        let id = if let Some(existing) = self.items.iter_mut().find(|item| item.content == content) {
            existing.updated_at_ms = now_ms;
            debug!("🔁 Refreshed history entry: {}", content);
            existing.id
        } else {
            let id = self.next_id;
            self.next_id += 1;
            self.items.push(SearchHistoryItem {
                id,
                content: content.to_string(),
                created_at_ms: now_ms,
                updated_at_ms: now_ms,
            });
            debug!("🆕 Recorded search: {}", content);
            id
        };

        self.items.sort_by(|a, b| b.updated_at_ms.cmp(&a.updated_at_ms));
        if let Some(max) = self.max_entries {
            self.items.truncate(max);
        }
        id
    }

    /// Remove one item by id; returns whether anything was removed
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() < before
    }

    /// Remove every item
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items in most-recently-used order
    pub fn items(&self) -> &[SearchHistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Clone of the items, used for snapshots
    pub fn export(&self) -> Vec<SearchHistoryItem> {
        self.items.clone()
    }

    /// Replace all items from a snapshot, restoring sort order and the id
    /// counter
    pub fn restore(&mut self, items: Vec<SearchHistoryItem>) {
        self.next_id = items.iter().map(|item| item.id).max().unwrap_or(0) + 1;
        self.items = items;
        self.items.sort_by(|a, b| b.updated_at_ms.cmp(&a.updated_at_ms));
        if let Some(max) = self.max_entries {
            self.items.truncate(max);
        }
    }
}
