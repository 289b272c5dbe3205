//! Retry with exponential back-off and jitter for upstream calls.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 429, 5xx). Everything else is returned
//! on the first failure.

use std::future::Future;
use std::time::Duration;

use crate::error::SearchError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 429 and 5xx.
///
/// **Not retriable:** malformed payloads, rejected endpoints, 4xx other than
/// 429, and proxy rejections. Retrying won't change the answer.
pub(crate) fn is_retriable(err: &SearchError) -> bool {
    match err {
        SearchError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        SearchError::RateLimited { .. } => true,
        SearchError::UnexpectedStatus { status, .. } => *status >= 500,
        SearchError::Deserialize { .. }
        | SearchError::ProxyRejected { .. }
        | SearchError::InvalidEndpoint { .. }
        | SearchError::Geocode(_) => false,
    }
}

const MAX_DELAY_MS: u64 = 30_000;

/// Delay before the `attempt`-th retry (1-based): `backoff_base_ms *
/// 2^(attempt-1)` ± 25 % jitter. A rate-limited reply waits at least its
/// `Retry-After`. Both are capped at 30 s.
pub(crate) fn retry_delay(attempt: u32, backoff_base_ms: u64, err: &SearchError) -> Duration {
    let computed = backoff_base_ms.saturating_mul(1u64 << attempt.saturating_sub(1).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;

    let floor = match err {
        SearchError::RateLimited { retry_after_secs } => retry_after_secs.saturating_mul(1000),
        _ => 0,
    };
    Duration::from_millis(jittered.max(floor).min(MAX_DELAY_MS))
}

/// Runs `operation` with up to `max_retries` additional attempts on transient
/// errors, sleeping [`retry_delay`] between attempts.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, SearchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SearchError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = retry_delay(attempt, backoff_base_ms, &err);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient search error, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
