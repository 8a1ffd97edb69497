//! Rate limiting implementation
//!
//! Uses the governor crate for token bucket rate limiting. Public photo APIs
//! usually publish hourly quotas, so both per-second and per-hour budgets are
//! supported.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Period a request budget applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaPeriod {
    #[default]
    Second,
    Hour,
}

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per period
    pub requests: u32,
    /// Period the budget applies to
    #[serde(default)]
    pub period: QuotaPeriod,
    /// Burst size (max tokens in bucket)
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_burst() -> u32 {
    1
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::per_second(10, 10)
    }
}

impl RateLimiterConfig {
    /// Budget of `requests` per second
    pub fn per_second(requests: u32, burst_size: u32) -> Self {
        Self {
            requests,
            period: QuotaPeriod::Second,
            burst_size,
        }
    }

    /// Budget of `requests` per hour, e.g. a demo-tier API key
    pub fn per_hour(requests: u32, burst_size: u32) -> Self {
        Self {
            requests,
            period: QuotaPeriod::Hour,
            burst_size,
        }
    }

    fn quota(&self) -> Quota {
        let requests = NonZeroU32::new(self.requests).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(self.burst_size).unwrap_or(NonZeroU32::MIN);
        match self.period {
            QuotaPeriod::Second => Quota::per_second(requests),
            QuotaPeriod::Hour => Quota::per_hour(requests),
        }
        .allow_burst(burst)
    }
}

/// Token bucket rate limiter shared by every request of one client
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            limiter: Arc::new(Governor::direct(config.quota())),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Try to acquire a permit, returning immediately
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}
