// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # pagefeed
//!
//! Incremental, page-by-page loading of a remote listing, with observable
//! network state, retry of the failed page and full refresh.
//!
//! ## Features
//!
//! - **Page-Keyed Loading**: Page 1 first, then each following page on demand
//! - **Observable State**: Items, network state and refresh state as watch
//!   channels and streams, latest value on subscribe
//! - **Retry**: Reissues exactly the request that failed
//! - **Refresh**: Replaces the whole generation and restarts from page 1
//! - **Cancellation**: One scope per repository bounds and cancels fetches
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagefeed::{AppConfig, PagedRepository, PostRepository, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::from_file("pagefeed.yaml")?.with_env_overrides();
//!     let repository = PagedRepository::from_config(&config)?;
//!
//!     let listing = repository.get_posts(30);
//!     listing.settled().await;
//!     if listing.network_state().is_some_and(|s| s.is_error()) {
//!         listing.retry();
//!     }
//!
//!     let list = listing.paged_list();
//!     list.load_around(list.len().saturating_sub(1));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                 PostRepository::get_posts                  │
//! │   Listing: paged_list  network_state  refresh_state        │
//! │            retry()  refresh()  subscribe_*()               │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//!               PageSourceFactory (latest source)
//!                              │
//! ┌──────────────┬─────────────┴─────────┬────────────────────┐
//! │  PageSource  │      ApiClient        │    FetchScope      │
//! ├──────────────┼───────────────────────┼────────────────────┤
//! │ Phases       │ Page/size params      │ Cancellation       │
//! │ Retry slot   │ Access key            │ Concurrency bound  │
//! │ X-Total      │ Rate limit            │                    │
//! └──────────────┴───────────────────────┴────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Item records
pub mod model;

/// Configuration
pub mod config;

/// HTTP transport with rate limiting
pub mod http;

/// Page-indexed API client
pub mod api;

/// Response decoders
pub mod decode;

/// Fetch cancellation and concurrency
pub mod scope;

/// Page sources and their factory
pub mod pagination;

/// Consumer-facing listing
pub mod listing;

/// Repository entry point
pub mod repository;

/// Command-line interface
pub mod cli;

#[cfg(test)]
pub(crate) mod test_support;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use api::{ApiClient, PageApi};
pub use config::{ApiConfig, AppConfig, ListingConfig};
pub use listing::{Listing, PagedList};
pub use model::{Item, ItemUrls};
pub use repository::{PagedRepository, PostRepository};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
