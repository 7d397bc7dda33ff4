/// Multi-source search aggregation driver
///
/// Launches every configured source for a query concurrently and merges
/// each batch into the store as it arrives. Merges are applied from one
/// task in completion order, so no two merges interleave regardless of how
/// the sources' futures race.
use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

use super::VideoItem;
use crate::store::SearchStore;

/// One external video-API provider.
///
/// Implementations live outside this crate (HTTP clients, scrapers); the
/// core only needs a stable id and a way to ask for results.
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Stable identifier, recorded in `completed_source_ids`
    fn id(&self) -> &str;

    /// Fetch this source's results for a query
    async fn search(&self, query: &str) -> Result<Vec<VideoItem>>;
}

/// Fans a query out to all sources and folds their batches into the store
pub struct SearchAggregator {
    store: SearchStore,
    sources: Vec<Arc<dyn SearchSource>>,
}

impl SearchAggregator {
    pub fn new(store: SearchStore, sources: Vec<Arc<dyn SearchSource>>) -> Self {
        Self { store, sources }
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Run a search across every source, merging batches as they resolve.
    ///
    /// A source that errors contributes nothing but still counts as
    /// settled, so the entry converges to `is_complete` once every request
    /// has finished either way. Returns the total number of items merged.
    pub async fn run(&self, query: &str) -> usize {
        let total_sources = self.sources.len();
        if total_sources == 0 {
            return 0;
        }

        self.store.record_search(query).await;

        let mut pending: FuturesUnordered<_> = self
            .sources
            .iter()
            .cloned()
            .map(|source| {
                let query = query.to_string();
                async move {
                    let outcome = source.search(&query).await;
                    (source, outcome)
                }
            })
            .collect();

        let mut settled = 0;
        let mut merged_items = 0;
        while let Some((source, outcome)) = pending.next().await {
            settled += 1;
            let items = match outcome {
                Ok(items) => items,
                Err(e) => {
                    warn!("⚠️ Source {} failed for '{}': {}", source.id(), query, e);
                    Vec::new()
                }
            };
            merged_items += items.len();
            self.store
                .apply_partial(query, source.id(), items, settled == total_sources)
                .await;
        }

        info!(
            "🔎 Search '{}' aggregated {} items from {} sources",
            query, merged_items, total_sources
        );
        merged_items
    }
}
