use crate::domain::rate_limit::{DEFAULT_KEY_PREFIX, RateLimitPolicy, RateLimitStore};
use crate::shared::error::AppError;
use std::sync::Arc;

pub const TOO_MANY_REQUESTS_MESSAGE: &str = "Too many requests. Please try again later.";

/// Fixed-window admission control keyed by client identity.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    key_prefix: String,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self::with_prefix(store, DEFAULT_KEY_PREFIX)
    }

    pub fn with_prefix(store: Arc<dyn RateLimitStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    fn key(&self, identity: &str) -> String {
        format!("{}:{}", self.key_prefix, identity)
    }

    /// Count one request for `identity`, failing once the window is exhausted.
    pub async fn admit(&self, identity: &str, policy: RateLimitPolicy) -> Result<(), AppError> {
        let admitted = self
            .store
            .hit(&self.key(identity), policy.max_requests, policy.window_seconds)
            .await?;

        if !admitted {
            tracing::warn!(identity, "Rate limit exceeded");
            return Err(AppError::TooManyRequests(
                TOO_MANY_REQUESTS_MESSAGE.to_string(),
            ));
        }

        Ok(())
    }
}
