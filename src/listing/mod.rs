//! Listing module
//!
//! The consumer-facing bundle returned by a repository.
//!
//! # Overview
//!
//! A [`Listing`] pairs the current generation's [`PagedList`] with its
//! network state, its refresh (first page) state and the `retry`/`refresh`
//! commands. State can be read directly or followed as streams; streams
//! deliver the latest value on subscribe and keep following across
//! refreshes.

mod paged_list;
mod stream;

pub use paged_list::PagedList;

use crate::model::Item;
use crate::pagination::{PageSource, PageSourceFactory};
use crate::types::NetworkState;
use futures::stream::BoxStream;
use std::sync::Arc;
use tracing::debug;

/// Observable paged listing with retry and refresh
#[derive(Debug, Clone)]
pub struct Listing {
    factory: Arc<PageSourceFactory>,
}

impl Listing {
    /// Create the first generation and issue its first fetch
    pub fn new(factory: Arc<PageSourceFactory>) -> Self {
        factory.create_and_load();
        Self { factory }
    }

    /// Current generation
    pub fn current(&self) -> Arc<PageSource> {
        self.factory
            .latest()
            .unwrap_or_else(|| self.factory.create_and_load())
    }

    /// Handle on the current generation's collection
    pub fn paged_list(&self) -> PagedList {
        PagedList::new(self.current())
    }

    /// Items loaded by the current generation
    pub fn items(&self) -> Arc<Vec<Item>> {
        self.current().items()
    }

    /// Outcome of the current generation's most recent fetch
    pub fn network_state(&self) -> Option<NetworkState> {
        self.current().network_state()
    }

    /// Outcome of the current generation's first-page fetch
    pub fn refresh_state(&self) -> Option<NetworkState> {
        self.current().initial_load()
    }

    /// Follow the network state across refreshes
    pub fn subscribe_network_state(&self) -> BoxStream<'static, Option<NetworkState>> {
        stream::follow_latest(self.factory.subscribe_latest(), |snapshot| {
            snapshot.network_state.clone()
        })
    }

    /// Follow the refresh state across refreshes
    pub fn subscribe_refresh_state(&self) -> BoxStream<'static, Option<NetworkState>> {
        stream::follow_latest(self.factory.subscribe_latest(), |snapshot| {
            snapshot.initial_load.clone()
        })
    }

    /// Follow the collection across refreshes
    pub fn subscribe_items(&self) -> BoxStream<'static, Arc<Vec<Item>>> {
        stream::follow_latest(self.factory.subscribe_latest(), |snapshot| {
            Arc::clone(&snapshot.items)
        })
    }

    /// Reissue the current generation's failed request
    ///
    /// The state moves to loading before this returns; the fetch itself runs
    /// in the background.
    pub fn retry(&self) -> bool {
        self.current().retry_all_failed()
    }

    /// Discard everything loaded and start again from the first page
    pub fn refresh(&self) {
        if let Some(previous) = self.factory.latest() {
            previous.invalidate();
        }
        let source = self.factory.create_and_load();
        debug!(source = source.id(), "listing refreshed");
    }

    /// Resolve once the current generation has no fetch in flight
    pub async fn settled(&self) {
        self.current().settled().await;
    }

    /// Keep requesting pages until the listing is exhausted, a fetch fails
    /// or no further page can be requested
    ///
    /// Returns the final network state.
    pub async fn load_all(&self) -> Option<NetworkState> {
        loop {
            let source = self.current();
            source.settled().await;
            if !source.load_after() {
                break;
            }
        }
        self.network_state()
    }

    /// Number of generations created so far
    pub fn generation(&self) -> u64 {
        self.factory.created()
    }
}
