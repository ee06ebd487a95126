//! Shared retry combinator
//!
//! Every component that talks to an external store retries through this one
//! function, so the backoff policy is defined in a single place: up to
//! `max_attempts` tries, sleeping `attempt * backoff` between them (linear
//! backoff). Non-transient errors fail immediately without retry.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;

/// Run `operation` with linear-backoff retries.
///
/// * `operation_name` - name for logging (e.g. "download", "probe")
/// * `max_attempts` - total attempts, including the first
/// * `backoff` - base delay; attempt N waits `N * backoff` before retrying
///
/// Returns the first success, or the last error once attempts are exhausted.
/// Errors where [`crate::Error::is_transient`] is false are returned
/// immediately.
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    max_attempts: u32,
    backoff: Duration,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::debug!(
                        operation = operation_name,
                        attempt,
                        "Operation succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(err) if !err.is_transient() => return Err(err),
            Err(err) if attempt == max_attempts => {
                tracing::warn!(
                    operation = operation_name,
                    attempts = max_attempts,
                    error = %err,
                    "Operation failed, retries exhausted"
                );
                return Err(err);
            }
            Err(err) => {
                let delay = backoff * attempt;
                tracing::warn!(
                    operation = operation_name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Operation failed, will retry after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }

    unreachable!("retry loop always returns within max_attempts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn succeeds_first_attempt() {
        let result = with_retry("test_op", 3, Duration::ZERO, || async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let attempts = AtomicU32::new(0);

        let result = with_retry("test_op", 3, Duration::ZERO, || {
            let n = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n < 3 {
                    Err(Error::Http("connection reset".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_retry_budget() {
        let attempts = AtomicU32::new(0);

        let result: Result<()> = with_retry("test_op", 3, Duration::ZERO, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Http("still down".into())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_transient_error_fails_immediately() {
        let attempts = AtomicU32::new(0);

        let result: Result<()> = with_retry("test_op", 3, Duration::ZERO, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::NotFound("gone".into())) }
        })
        .await;

        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn backoff_grows_linearly() {
        let start = tokio::time::Instant::now();
        let attempts = AtomicU32::new(0);

        let _: Result<()> = with_retry("test_op", 3, Duration::from_millis(100), || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Http("down".into())) }
        })
        .await;

        // Waits of 100ms and 200ms between the three attempts.
        assert_eq!(start.elapsed(), Duration::from_millis(300));
    }
}
