/// Search aggregation module
///
/// This module provides the incremental multi-source search machinery: the
/// bounded, expiring aggregation cache that merges partial results as
/// independent sources respond, the recent-search history log, and the
/// aggregator that drives configured sources concurrently.

pub mod aggregator;
pub mod cache;
pub mod history;

// Re-export main types
pub use aggregator::{SearchAggregator, SearchSource};
pub use cache::{SearchCache, SearchCacheEntry};
pub use history::{SearchHistory, SearchHistoryItem};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// A single video result produced by an external source.
///
/// Only `source_code` and `vod_id` matter to this crate; they form the
/// composite identity used for deduplication. Every other field the source
/// returned is carried opaquely in `extra` and round-trips through snapshots
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoItem {
    /// Identifier of the source that produced this item
    pub source_code: String,

    /// Source-local video identifier
    pub vod_id: String,

    /// Display title
    #[serde(default)]
    pub vod_name: String,

    /// Remaining source-specific payload, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl VideoItem {
    /// Create an item carrying only its identity and title
    pub fn new(source_code: impl Into<String>, vod_id: impl Into<String>, vod_name: impl Into<String>) -> Self {
        Self {
            source_code: source_code.into(),
            vod_id: vod_id.into(),
            vod_name: vod_name.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Composite `(source_code, vod_id)` identity used for deduplication.
    ///
    /// Items missing either identity field degrade to a collision-prone
    /// title-based key; this is logged as an integrity warning rather than
    /// treated as a hard failure.
    pub fn identity(&self) -> (String, String) {
        if self.source_code.is_empty() || self.vod_id.is_empty() {
            warn!(
                "⚠️ Video item '{}' is missing identity fields, falling back to title key",
                self.vod_name
            );
            return (self.source_code.clone(), format!("title:{}", self.vod_name));
        }
        (self.source_code.clone(), self.vod_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_uses_source_and_vod_id() {
        let item = VideoItem::new("src1", "42", "Some Show");
        assert_eq!(item.identity(), ("src1".to_string(), "42".to_string()));
    }

    #[test]
    fn test_identity_falls_back_to_title() {
        let item = VideoItem::new("src1", "", "Some Show");
        assert_eq!(item.identity(), ("src1".to_string(), "title:Some Show".to_string()));
    }

    #[test]
    fn test_extra_fields_round_trip() {
        let json = r#"{"source_code":"s1","vod_id":"9","vod_name":"T","vod_pic":"http://x/p.jpg","type_name":"drama"}"#;
        let item: VideoItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.extra.get("vod_pic").unwrap(), "http://x/p.jpg");

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["type_name"], "drama");
    }
}
