//! Retry utility shared by every upstream fetcher.
//!
//! Only transport-level failures are retried (connection refused or reset,
//! timeouts, send failures). A response with any HTTP status is returned to the
//! caller as-is and never retried.

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1000;

/// Attempts and backoff for one logical upstream call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay before retry number `retry` (1-based): base * 2^(retry - 1)
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

/// Errors that may succeed when the same request is sent again
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for reqwest::Error {
    fn is_transient(&self) -> bool {
        // A builder error means the request itself is malformed
        !self.is_builder() && self.status().is_none()
    }
}

/// Run `operation` until it succeeds, fails permanently, or attempts run out.
///
/// ```ignore
/// let response = with_retry(&policy, || client.get(url).send()).await?;
/// ```
pub async fn with_retry<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + std::fmt::Display,
{
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("Upstream call succeeded on attempt {}", attempt);
                }
                return Ok(value);
            }
            Err(e) if !e.is_transient() => {
                tracing::debug!("Non-retryable error: {}", e);
                return Err(e);
            }
            Err(e) if attempt >= policy.max_attempts => {
                tracing::error!("All {} attempts exhausted: {}", policy.max_attempts, e);
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_for_retry(attempt);
                tracing::warn!(
                    "Transport error on attempt {} of {}, retrying in {:?}: {}",
                    attempt,
                    policy.max_attempts,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
