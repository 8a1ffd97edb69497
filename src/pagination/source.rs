//! Page source
//!
//! One generation of a listing. The source owns the growing item collection
//! and the network states, and walks the page index forward one fetch at a
//! time. Every transition is applied inside a single
//! `watch::Sender::send_if_modified` call, so observers never see a
//! half-applied page.

use super::types::{
    LoadFailure, LoadRequest, LoadedPage, PageSnapshot, PageSourceConfig, SourcePhase,
};
use crate::api::PageApi;
use crate::decode::ItemDecoder;
use crate::model::Item;
use crate::scope::FetchScope;
use crate::types::NetworkState;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Page-keyed source of items
pub struct PageSource {
    id: u64,
    api: Arc<dyn PageApi>,
    decoder: Arc<dyn ItemDecoder>,
    config: Arc<PageSourceConfig>,
    scope: FetchScope,
    state: watch::Sender<PageSnapshot>,
}

impl PageSource {
    /// Create an idle source; nothing is fetched until [`Self::load_initial`]
    pub fn new(
        id: u64,
        api: Arc<dyn PageApi>,
        decoder: Arc<dyn ItemDecoder>,
        config: Arc<PageSourceConfig>,
        scope: FetchScope,
    ) -> Self {
        let (state, _) = watch::channel(PageSnapshot::new(config.first_page));
        Self {
            id,
            api,
            decoder,
            config,
            scope,
            state,
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Fetch the first page
    ///
    /// Only an idle source starts; returns whether a fetch was issued.
    pub fn load_initial(self: &Arc<Self>) -> bool {
        self.start(|snapshot| {
            (snapshot.phase == SourcePhase::Idle).then_some(LoadRequest::Initial)
        })
    }

    /// Fetch the page after the last loaded one
    ///
    /// Ignored while a fetch is in flight, after a failure (use
    /// [`Self::retry_all_failed`]) and once the listing is exhausted.
    pub fn load_after(self: &Arc<Self>) -> bool {
        self.start(|snapshot| {
            snapshot
                .phase
                .accepts_next()
                .then_some(LoadRequest::Forward {
                    page: snapshot.cursor,
                })
        })
    }

    /// Pages before the first are never fetched
    pub fn load_before(&self) -> bool {
        false
    }

    /// Reissue the request that failed last, if any
    pub fn retry_all_failed(self: &Arc<Self>) -> bool {
        self.start(|snapshot| snapshot.pending_retry.take())
    }

    /// Mark the source as replaced
    ///
    /// A fetch in flight still runs, but its result is discarded and no new
    /// fetch is issued.
    pub fn invalidate(&self) {
        let changed = self.state.send_if_modified(|snapshot| {
            if snapshot.invalidated {
                return false;
            }
            snapshot.invalidated = true;
            true
        });
        if changed {
            debug!(source = self.id, "page source invalidated");
        }
    }

    /// Pick a request under the state lock, enter its loading phase and
    /// dispatch it
    fn start(
        self: &Arc<Self>,
        pick: impl FnOnce(&mut PageSnapshot) -> Option<LoadRequest>,
    ) -> bool {
        if self.scope.is_cancelled() {
            debug!(source = self.id, "scope cancelled; fetch not issued");
            return false;
        }

        let mut picked = None;
        self.state.send_if_modified(|snapshot| {
            if snapshot.invalidated || snapshot.phase.is_loading() {
                return false;
            }
            let Some(request) = pick(snapshot) else {
                return false;
            };
            snapshot.begin(request);
            picked = Some(request);
            true
        });

        match picked {
            Some(request) => {
                self.dispatch(request);
                true
            }
            None => false,
        }
    }

    fn dispatch(self: &Arc<Self>, request: LoadRequest) {
        let page = request.page(self.config.first_page);
        debug!(
            source = self.id,
            page,
            initial = request.is_initial(),
            "dispatching fetch"
        );

        let source = Arc::clone(self);
        let spawned = self.scope.spawn(async move {
            let outcome = source.fetch(page).await;
            source.complete(request, page, outcome);
        });
        if !spawned {
            debug!(source = self.id, page, "scope cancelled before dispatch");
        }
    }

    // ========================================================================
    // Fetch
    // ========================================================================

    async fn fetch(&self, page: u32) -> Result<LoadedPage, LoadFailure> {
        let response = self
            .api
            .get_page(page, self.config.page_size)
            .await
            .map_err(|e| LoadFailure::Transport(e.to_string()))?;

        if !response.is_ok() {
            return Err(LoadFailure::Status(response.status));
        }

        let items = self
            .decoder
            .decode(&response.body)
            .map_err(|e| LoadFailure::Decode(e.to_string()))?;

        let header = &self.config.total_pages_header;
        let total_pages = match response.header_first(header) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(total) => Some(total),
                Err(_) => {
                    debug!(
                        source = self.id,
                        page,
                        header = %header,
                        value = raw,
                        "unparseable total pages header"
                    );
                    None
                }
            },
            None => {
                debug!(source = self.id, page, header = %header, "total pages header missing");
                None
            }
        };

        Ok(LoadedPage { items, total_pages })
    }

    fn complete(&self, request: LoadRequest, page: u32, outcome: Result<LoadedPage, LoadFailure>) {
        if self.scope.is_cancelled() {
            debug!(source = self.id, page, "scope cancelled; result dropped");
            return;
        }

        match outcome {
            Ok(loaded) => {
                let count = loaded.items.len();
                let applied = self.state.send_if_modified(|snapshot| {
                    if snapshot.invalidated {
                        return false;
                    }
                    snapshot.apply_page(request, page, loaded);
                    true
                });
                if applied {
                    debug!(source = self.id, page, items = count, "page loaded");
                } else {
                    debug!(source = self.id, page, "source invalidated; page discarded");
                }
            }
            Err(failure) => {
                let applied = self.state.send_if_modified(|snapshot| {
                    if snapshot.invalidated {
                        return false;
                    }
                    snapshot.apply_failure(request);
                    true
                });
                if applied {
                    warn!(source = self.id, page, error = %failure, "page fetch failed");
                } else {
                    debug!(
                        source = self.id,
                        page,
                        error = %failure,
                        "source invalidated; failure discarded"
                    );
                }
            }
        }
    }

    // ========================================================================
    // Observation
    // ========================================================================

    /// Generation number assigned by the factory
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Paging settings
    pub fn config(&self) -> &PageSourceConfig {
        &self.config
    }

    /// Current snapshot
    pub fn snapshot(&self) -> PageSnapshot {
        self.state.borrow().clone()
    }

    /// Items loaded so far
    pub fn items(&self) -> Arc<Vec<Item>> {
        Arc::clone(&self.state.borrow().items)
    }

    /// Number of items loaded so far
    pub fn len(&self) -> usize {
        self.state.borrow().items.len()
    }

    /// Check if no items are loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Outcome of the most recent fetch
    pub fn network_state(&self) -> Option<NetworkState> {
        self.state.borrow().network_state.clone()
    }

    /// Outcome of the first-page fetch
    pub fn initial_load(&self) -> Option<NetworkState> {
        self.state.borrow().initial_load.clone()
    }

    /// Lifecycle phase
    pub fn phase(&self) -> SourcePhase {
        self.state.borrow().phase
    }

    /// Check if the source has been replaced
    pub fn is_invalidated(&self) -> bool {
        self.state.borrow().invalidated
    }

    /// Receiver that sees the current snapshot and every later one
    pub fn subscribe(&self) -> watch::Receiver<PageSnapshot> {
        self.state.subscribe()
    }

    /// Resolve once no fetch is in flight, the source is invalidated, or the
    /// scope is cancelled
    pub async fn settled(&self) {
        let mut rx = self.state.subscribe();
        tokio::select! {
            _ = rx.wait_for(|snapshot| snapshot.invalidated || !snapshot.phase.is_loading()) => {}
            () = self.scope.cancelled() => {}
        }
    }
}

impl fmt::Debug for PageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.state.borrow();
        f.debug_struct("PageSource")
            .field("id", &self.id)
            .field("phase", &snapshot.phase)
            .field("cursor", &snapshot.cursor)
            .field("items", &snapshot.items.len())
            .field("invalidated", &snapshot.invalidated)
            .finish_non_exhaustive()
    }
}
