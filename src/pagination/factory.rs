//! Page source factory
//!
//! Builds successive generations of a listing's page source and publishes
//! the newest one.

use super::source::PageSource;
use super::types::PageSourceConfig;
use crate::api::PageApi;
use crate::decode::ItemDecoder;
use crate::scope::FetchScope;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Creates page sources sharing one API client, decoder and scope
pub struct PageSourceFactory {
    api: Arc<dyn PageApi>,
    decoder: Arc<dyn ItemDecoder>,
    config: Arc<PageSourceConfig>,
    scope: FetchScope,
    latest: watch::Sender<Option<Arc<PageSource>>>,
    created: AtomicU64,
}

impl PageSourceFactory {
    /// Create a factory; no source exists until [`Self::create`]
    pub fn new(
        api: Arc<dyn PageApi>,
        decoder: Arc<dyn ItemDecoder>,
        config: PageSourceConfig,
        scope: FetchScope,
    ) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            api,
            decoder,
            config: Arc::new(config),
            scope,
            latest,
            created: AtomicU64::new(0),
        }
    }

    /// Build a fresh source and publish it as the latest
    ///
    /// The previous source is left as it is; invalidating it is up to the
    /// caller.
    pub fn create(&self) -> Arc<PageSource> {
        let source = self.build();
        self.publish(&source);
        source
    }

    /// Build a fresh source, issue its first fetch, then publish it
    ///
    /// Observers of the latest source never see the new one idle.
    pub fn create_and_load(&self) -> Arc<PageSource> {
        let source = self.build();
        source.load_initial();
        self.publish(&source);
        source
    }

    fn build(&self) -> Arc<PageSource> {
        let id = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        Arc::new(PageSource::new(
            id,
            Arc::clone(&self.api),
            Arc::clone(&self.decoder),
            Arc::clone(&self.config),
            self.scope.clone(),
        ))
    }

    fn publish(&self, source: &Arc<PageSource>) {
        self.latest.send_replace(Some(Arc::clone(source)));
        debug!(source = source.id(), "page source published");
    }

    /// Most recently created source
    pub fn latest(&self) -> Option<Arc<PageSource>> {
        self.latest.borrow().clone()
    }

    /// Receiver that sees the current source and every replacement
    pub fn subscribe_latest(&self) -> watch::Receiver<Option<Arc<PageSource>>> {
        self.latest.subscribe()
    }

    /// Number of sources created so far
    pub fn created(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }

    /// Paging settings shared by every source
    pub fn config(&self) -> &PageSourceConfig {
        &self.config
    }

    /// Scope every source dispatches into
    pub fn scope(&self) -> &FetchScope {
        &self.scope
    }
}

impl std::fmt::Debug for PageSourceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSourceFactory")
            .field("config", &self.config)
            .field("created", &self.created())
            .finish_non_exhaustive()
    }
}
