//! Response decoder module
//!
//! Turns a page body into an ordered batch of [`Item`](crate::model::Item)s.
//!
//! # Overview
//!
//! A page is decoded as a whole: if any record fails to parse, the whole
//! page is rejected and the page source reports a network error for it.

mod decoders;
mod types;

pub use decoders::JsonItemDecoder;
pub use types::{DecoderConfig, ItemDecoder};

#[cfg(test)]
mod tests;
