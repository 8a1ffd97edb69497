//! Consumer handle on one generation's growing collection

use crate::model::Item;
use crate::pagination::{PageSnapshot, PageSource};
use crate::types::NetworkState;
use std::sync::Arc;
use tokio::sync::watch;

/// Growing, append-only collection of one page source
///
/// After a refresh this handle keeps pointing at the replaced generation;
/// ask the listing for a new one.
#[derive(Debug, Clone)]
pub struct PagedList {
    source: Arc<PageSource>,
    prefetch_distance: usize,
}

impl PagedList {
    pub(crate) fn new(source: Arc<PageSource>) -> Self {
        let prefetch_distance = source.config().prefetch_distance;
        Self {
            source,
            prefetch_distance,
        }
    }

    /// Current snapshot of the collection and its states
    pub fn snapshot(&self) -> PageSnapshot {
        self.source.snapshot()
    }

    /// Items loaded so far
    pub fn items(&self) -> Arc<Vec<Item>> {
        self.source.items()
    }

    /// Item at `index`, if loaded
    pub fn get(&self, index: usize) -> Option<Item> {
        self.source.items().get(index).cloned()
    }

    /// Number of items loaded so far
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Check if no items are loaded
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Outcome of the most recent fetch
    pub fn network_state(&self) -> Option<NetworkState> {
        self.source.network_state()
    }

    /// Request the next page
    pub fn load_next(&self) -> bool {
        self.source.load_after()
    }

    /// Record an access at `index`, requesting the next page when it falls
    /// within the prefetch distance of the end
    pub fn load_around(&self, index: usize) -> bool {
        let len = self.len();
        if index.saturating_add(self.prefetch_distance) >= len {
            self.source.load_after()
        } else {
            false
        }
    }

    /// Request the page before the first; never issues a fetch
    pub fn load_before(&self) -> bool {
        self.source.load_before()
    }

    /// Check if every page has been loaded
    pub fn is_exhausted(&self) -> bool {
        self.source.snapshot().is_exhausted()
    }

    /// Check if this handle's generation was replaced by a refresh
    pub fn is_stale(&self) -> bool {
        self.source.is_invalidated()
    }

    /// Distance from the end that triggers the next page
    pub fn prefetch_distance(&self) -> usize {
        self.prefetch_distance
    }

    /// Receiver that sees the current snapshot and every later one
    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot> {
        self.source.subscribe()
    }

    /// Resolve once no fetch is in flight
    pub async fn settled(&self) {
        self.source.settled().await;
    }
}
