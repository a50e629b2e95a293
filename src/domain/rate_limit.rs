use anyhow::Result;
use async_trait::async_trait;

pub const DEFAULT_KEY_PREFIX: &str = "rate_limit";

/// How many requests one identity may make per fixed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u64,
    pub window_seconds: u64,
}

/// Expiring counter store backing the limiter.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count one request against `key` in a single atomic step.
    ///
    /// A missing key starts a window of `window_seconds` with a count of 1. A count
    /// already at `max_requests` rejects without incrementing, so rejected
    /// requests never extend or inflate the window. Returns whether the request
    /// was admitted.
    async fn hit(&self, key: &str, max_requests: u64, window_seconds: u64) -> Result<bool>;
}
