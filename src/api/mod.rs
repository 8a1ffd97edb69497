//! API client module
//!
//! Turns "fetch page N" into exactly one transport call. The client never
//! retries; retrying a failed page is the page source's decision.

mod client;

pub use client::{ApiClient, PageApi};
