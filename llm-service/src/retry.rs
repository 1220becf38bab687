//! Bounded retry with exponential backoff and jitter.
//!
//! The external capabilities are network calls and occasionally fail for
//! transient reasons (connection reset, upstream 5xx, timeout). Retrying is
//! done here, once, close to the transport; the store and session crates
//! never retry on their own. Non-transient errors (config, 4xx, decode)
//! fail on the first attempt.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, warn};

use crate::error_handler::Result;

/// Retry knobs for transient provider failures.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. `1` disables retrying.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on every subsequent retry.
    pub base_delay: Duration,
    /// Upper bound for a single backoff delay (pre-jitter).
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

impl RetryPolicy {
    /// Backoff delay for a given retry ordinal (0 = first retry), with
    /// uniform jitter in `[0.5x, 1.5x]`.
    fn delay_for(&self, retry: u32) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(1u32 << retry.min(16))
            .min(self.max_delay);
        exp.mul_f64(rand::thread_rng().gen_range(0.5..1.5))
    }
}

/// Runs `op` up to `policy.max_attempts` times, sleeping between attempts.
///
/// Only errors classified transient by [`LlmServiceError::is_transient`] are
/// retried; the last error is surfaced unchanged after exhaustion.
///
/// # Errors
/// Whatever the final attempt of `op` returned.
pub(crate) async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    op_name: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_attempts.max(1);

    for attempt in 1..attempts {
        match op().await {
            Ok(v) => return Ok(v),
            Err(e) if e.is_transient() => {
                let delay = policy.delay_for(attempt - 1);
                warn!(
                    "{op_name}: transient failure (attempt {attempt}/{attempts}), retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                debug!("{op_name}: giving up after attempt {attempt}: {e}");
                return Err(e);
            }
        }
    }

    // Last attempt: whatever happens here is surfaced to the caller.
    op().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::LlmServiceError;
    use reqwest::StatusCode;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> LlmServiceError {
        LlmServiceError::HttpStatus {
            status: StatusCode::BAD_GATEWAY,
            url: "http://localhost:11434".into(),
            snippet: String::new(),
        }
    }

    #[tokio::test]
    async fn retries_transient_until_success() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        };
        let calls = AtomicU32::new(0);
        let out = with_retry(&policy, "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(transient())
                } else {
                    Ok("ok")
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(out, "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn does_not_retry_non_transient() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);
        let err = with_retry(&policy, "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(LlmServiceError::Decode("bad json".into())) }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, LlmServiceError::Decode(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn surfaces_last_error_after_exhaustion() {
        let policy = RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(1),
        };
        let calls = AtomicU32::new(0);
        let err = with_retry(&policy, "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(transient()) }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, LlmServiceError::HttpStatus { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
