//! HTTP transport module
//!
//! Thin reqwest wrapper used by the API client.
//!
//! # Features
//!
//! - **Raw Responses**: Status, body and every header value, for any status
//! - **Base Parameters**: Access-key style query parameters on every request
//! - **Rate Limiting**: Token bucket rate limiter using governor

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RawResponse};
pub use rate_limit::{QuotaPeriod, RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
