//! Page source types
//!
//! The snapshot, request and failure types shared by the page source state
//! machine and its observers.

use crate::model::Item;
use crate::types::NetworkState;
use std::sync::Arc;
use thiserror::Error;

/// Default header reporting the total page count
pub const DEFAULT_TOTAL_PAGES_HEADER: &str = "X-Total";

// ============================================================================
// Configuration
// ============================================================================

/// Per-listing settings of a page source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSourceConfig {
    /// Items requested per page
    pub page_size: u32,
    /// Index of the first page
    pub first_page: u32,
    /// Response header carrying the total page count
    pub total_pages_header: String,
    /// Distance from the end of the collection that triggers the next page
    pub prefetch_distance: usize,
}

impl PageSourceConfig {
    /// Config for `page_size` items per page starting at page 1
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            first_page: 1,
            total_pages_header: DEFAULT_TOTAL_PAGES_HEADER.to_string(),
            prefetch_distance: page_size as usize,
        }
    }

    /// Set the first page index
    #[must_use]
    pub fn with_first_page(mut self, first_page: u32) -> Self {
        self.first_page = first_page;
        self
    }

    /// Set the total-pages header name
    #[must_use]
    pub fn with_total_pages_header(mut self, header: impl Into<String>) -> Self {
        self.total_pages_header = header.into();
        self
    }

    /// Set the prefetch distance
    #[must_use]
    pub fn with_prefetch_distance(mut self, distance: usize) -> Self {
        self.prefetch_distance = distance;
        self
    }
}

// ============================================================================
// Requests
// ============================================================================

/// A fetch the page source can issue
///
/// Also used as the pending retry: it holds everything needed to reissue
/// the exact request that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRequest {
    /// The first page of the listing
    Initial,
    /// A page after the ones already loaded
    Forward {
        /// Page index requested
        page: u32,
    },
}

impl LoadRequest {
    /// Page index this request fetches
    pub fn page(&self, first_page: u32) -> u32 {
        match self {
            Self::Initial => first_page,
            Self::Forward { page } => *page,
        }
    }

    /// Check if this is the initial fetch
    pub fn is_initial(&self) -> bool {
        matches!(self, Self::Initial)
    }
}

// ============================================================================
// Phases
// ============================================================================

/// Where a page source is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourcePhase {
    /// Constructed, nothing requested yet
    #[default]
    Idle,
    /// First page in flight
    InitialLoading,
    /// First page loaded, more pages available
    InitialLoaded,
    /// First page failed; waiting for a retry
    InitialFailed,
    /// A later page in flight
    LoadingNext,
    /// Latest page loaded, more pages available
    Loaded,
    /// A later page failed; waiting for a retry
    Failed,
    /// No further pages exist
    Exhausted,
}

impl SourcePhase {
    /// Check if a fetch is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::InitialLoading | Self::LoadingNext)
    }

    /// Check if the last fetch failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::InitialFailed | Self::Failed)
    }

    /// Check if the next page may be requested
    pub fn accepts_next(&self) -> bool {
        matches!(self, Self::InitialLoaded | Self::Loaded)
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Everything an observer can see of a page source, published as one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    /// Items of every loaded page, in page order
    pub items: Arc<Vec<Item>>,
    /// Outcome of the most recent fetch; `None` before the first one
    pub network_state: Option<NetworkState>,
    /// Outcome of the first-page fetch; `None` before it is issued
    pub initial_load: Option<NetworkState>,
    /// Lifecycle phase
    pub phase: SourcePhase,
    /// Page the next forward fetch will request
    pub cursor: u32,
    /// Number of pages appended so far
    pub pages_loaded: u32,
    /// The failed request a retry would reissue
    pub pending_retry: Option<LoadRequest>,
    /// Set once the source has been replaced by a refresh
    pub invalidated: bool,
}

impl PageSnapshot {
    /// Snapshot of a fresh source whose first page is `first_page`
    pub fn new(first_page: u32) -> Self {
        Self {
            items: Arc::new(Vec::new()),
            network_state: None,
            initial_load: None,
            phase: SourcePhase::Idle,
            cursor: first_page,
            pages_loaded: 0,
            pending_retry: None,
            invalidated: false,
        }
    }

    /// Check if the source has reached its last page
    pub fn is_exhausted(&self) -> bool {
        self.phase == SourcePhase::Exhausted
    }

    /// Move into the loading phase for `request`
    pub(crate) fn begin(&mut self, request: LoadRequest) {
        self.pending_retry = None;
        self.network_state = Some(NetworkState::Loading);
        if request.is_initial() {
            self.initial_load = Some(NetworkState::Loading);
            self.phase = SourcePhase::InitialLoading;
        } else {
            self.phase = SourcePhase::LoadingNext;
        }
    }

    /// Append a loaded page and pick the next cursor
    pub(crate) fn apply_page(&mut self, request: LoadRequest, page: u32, loaded: LoadedPage) {
        Arc::make_mut(&mut self.items).extend(loaded.items);
        self.pages_loaded += 1;
        self.pending_retry = None;
        self.network_state = Some(NetworkState::Loaded);
        self.initial_load = Some(NetworkState::Loaded);

        self.phase = match next_page_after(page, loaded.total_pages) {
            Some(next) => {
                self.cursor = next;
                if request.is_initial() {
                    SourcePhase::InitialLoaded
                } else {
                    SourcePhase::Loaded
                }
            }
            None => SourcePhase::Exhausted,
        };
    }

    /// Record a failed fetch so it can be retried
    pub(crate) fn apply_failure(&mut self, request: LoadRequest) {
        self.network_state = Some(NetworkState::network_error());
        self.pending_retry = Some(request);
        if request.is_initial() {
            self.initial_load = Some(NetworkState::network_error());
            self.phase = SourcePhase::InitialFailed;
        } else {
            self.phase = SourcePhase::Failed;
        }
    }
}

/// Next page to request after successfully loading `page`
///
/// Pagination advances while `page < total`; reaching the total (or not
/// knowing it) ends the listing.
pub fn next_page_after(page: u32, total_pages: Option<u32>) -> Option<u32> {
    match total_pages {
        Some(total) if page < total => Some(page + 1),
        _ => None,
    }
}

// ============================================================================
// Fetch outcomes
// ============================================================================

/// A decoded page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    /// Items of the page, in response order
    pub items: Vec<Item>,
    /// Total page count reported by the server, when present and numeric
    pub total_pages: Option<u32>,
}

/// Why a fetch failed
///
/// Observers only ever see [`NetworkState::network_error`]; the cause is kept
/// for logging.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadFailure {
    /// The request could not be completed
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server answered with a status other than 200
    #[error("server responded with status {0}")]
    Status(u16),

    /// The body could not be decoded into items
    #[error("undecodable body: {0}")]
    Decode(String),
}
