//! Bounded exponential backoff for transient transport errors
//!
//! **Backoff Strategy:**
//! - Delay before retry `n` (0-based): `initial * 2^n`
//! - Each delay capped at 30s
//! - Non-transient errors fail immediately (no retry)

use std::future::Future;
use std::time::Duration;

use crate::error::TransportError;

/// Upper bound on any single backoff delay
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Retry budget for one kind of request
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 = single attempt)
    pub max_retries: u32,
    pub initial_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
        }
    }

    /// Delay before retry number `retry` (0-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF)
    }
}

/// Final failure after the retry loop gave up
#[derive(Debug, Clone)]
pub struct RetryError {
    /// Total attempts made, including the first
    pub attempts: u32,
    pub last_error: TransportError,
}

impl std::fmt::Display for RetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (after {} attempt(s))", self.last_error, self.attempts)
    }
}

/// Run `operation`, retrying transient failures per `policy`
///
/// # Arguments
/// * `operation_name` - Name for logging (e.g., "feed page", "subject lookup")
/// * `policy` - Retry budget and initial delay
/// * `operation` - Async closure performing one request
pub async fn retry_transient<F, Fut, T>(
    operation_name: &str,
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, RetryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut attempt = 0u32;

    loop {
        attempt += 1;

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::debug!(
                        operation = operation_name,
                        attempt,
                        "Request succeeded after retry"
                    );
                }
                return Ok(value);
            }
            Err(err) => {
                let retries_used = attempt - 1;
                if !err.is_transient() || retries_used >= policy.max_retries {
                    if err.is_transient() {
                        tracing::warn!(
                            operation = operation_name,
                            attempt,
                            error = %err,
                            "Retry budget exhausted"
                        );
                    }
                    return Err(RetryError {
                        attempts: attempt,
                        last_error: err,
                    });
                }

                let delay = policy.backoff(retries_used);
                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    backoff_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient failure, will retry after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
