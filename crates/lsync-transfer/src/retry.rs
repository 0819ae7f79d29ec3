//! Retry with exponential backoff and full jitter.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use lsync_api::ApiResult;

use crate::error::{TransferError, TransferResult};

/// Configuration for retry behavior on network-transient failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_retries: u32,
    /// Base delay for exponential backoff (doubles each attempt).
    pub base_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_retries: std::env::var("LIPSYNC_TRANSFER_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_retries),
            base_delay: Duration::from_millis(
                std::env::var("LIPSYNC_TRANSFER_BASE_DELAY_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.base_delay.as_millis() as u64),
            ),
            max_delay: defaults.max_delay,
        }
    }

    /// Delay before retry `attempt`, with full jitter so concurrent panels
    /// don't hammer the service in lockstep.
    pub(crate) fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)));
        let capped = exp.min(self.max_delay);

        // Time-based pseudo-randomization keeps the dependency set small.
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::SystemTime::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let factor = (nanos % 1000) as f64 / 1000.0;
        let jittered = Duration::from_millis((capped.as_millis() as f64 * factor) as u64);

        jittered.max(self.base_delay)
    }
}

/// Run an API operation, retrying transient failures with backoff.
///
/// Non-retryable errors propagate immediately; retryable errors that
/// survive the attempt budget become [`TransferError::Exhausted`] carrying
/// the last underlying cause.
pub async fn retry_api<F, Fut, T>(
    config: &RetryConfig,
    operation: &str,
    op: F,
) -> TransferResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut attempt = 0u32;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < config.max_retries => {
                attempt += 1;
                let delay = config.delay_for_attempt(attempt);
                warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "transfer operation failed, retrying: {}",
                    e
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) if e.is_retryable() => {
                return Err(TransferError::Exhausted {
                    operation: operation.to_string(),
                    attempts: attempt + 1,
                    source: e,
                });
            }
            Err(e) => return Err(TransferError::Api(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicU32, Ordering};

    use lsync_api::ApiError;

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[test]
    fn test_delay_is_capped_and_floored() {
        let config = fast_config();
        for attempt in 1..8 {
            let delay = config.delay_for_attempt(attempt);
            assert!(delay >= config.base_delay);
            assert!(delay <= config.max_delay);
        }
    }

    #[tokio::test]
    async fn test_eventual_success_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = retry_api(&fast_config(), "upload_part", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ApiError::status(503, "busy"))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_fails_immediately() {
        let calls = AtomicU32::new(0);
        let result: TransferResult<u32> = retry_api(&fast_config(), "upload_direct", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(ApiError::status(400, "bad request")) }
        })
        .await;

        assert!(matches!(result, Err(TransferError::Api(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_carries_last_cause_and_attempts() {
        let result: TransferResult<u32> = retry_api(&fast_config(), "download", || async {
            Err(ApiError::status(500, "still broken"))
        })
        .await;

        match result {
            Err(TransferError::Exhausted {
                operation,
                attempts,
                source,
            }) => {
                assert_eq!(operation, "download");
                assert_eq!(attempts, 4);
                assert!(source.is_retryable());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
