/// VOD Search Aggregation & Playback Core
///
/// In-memory engine behind a multi-source video search front end: an
/// incremental search-result aggregation cache fed by independent
/// asynchronous sources, a deterministic episode pagination/reindexing
/// engine, and a bounded search history log, with optional JSON snapshot
/// persistence.

pub mod config;
pub mod episodes;
pub mod persistence;
pub mod search;
pub mod store;

// Re-export main types for easy access
pub use crate::config::Config;
pub use crate::episodes::{DisplayOrder, EpisodePager, PageEpisode, PageRange, SelectionPolicy};
pub use crate::persistence::{Snapshot, SnapshotError, SnapshotManager};
pub use crate::search::{SearchAggregator, SearchSource};
pub use crate::search::{SearchCache, SearchCacheEntry};
pub use crate::search::{SearchHistory, SearchHistoryItem};
pub use crate::search::VideoItem;
pub use crate::store::SearchStore;
