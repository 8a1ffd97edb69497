//! Pagination module
//!
//! Page-keyed loading of a remote listing.
//!
//! # Overview
//!
//! A [`PageSource`] fetches page 1, then each following page on demand,
//! until the total page count reported by the server is reached. Failures
//! leave a pending retry that reissues exactly the failed request. A
//! [`PageSourceFactory`] replaces the source wholesale on refresh and
//! publishes the newest one.

mod factory;
mod source;
mod types;

pub use factory::PageSourceFactory;
pub use source::PageSource;
pub use types::{
    next_page_after, LoadFailure, LoadRequest, LoadedPage, PageSnapshot, PageSourceConfig,
    SourcePhase, DEFAULT_TOTAL_PAGES_HEADER,
};
