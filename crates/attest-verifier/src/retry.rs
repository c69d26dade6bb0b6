//! Retry with exponential backoff for verifier HTTP calls.
//!
//! Only transport errors (connection refused, timeouts) are retried. A
//! response of any status is returned to the caller as-is.

use std::time::Duration;

/// Base delay between retries (doubles each attempt: 200ms, 400ms, 800ms).
const BASE_DELAY_MS: u64 = 200;

/// Upper bound on a single backoff delay.
const MAX_DELAY_MS: u64 = 10_000;

/// Delay before retry number `attempt` (zero-based), capped at [`MAX_DELAY_MS`].
fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u64.checked_pow(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(BASE_DELAY_MS.saturating_mul(factor).min(MAX_DELAY_MS))
}

/// Send a request, retrying transport failures up to `max_retries` times.
///
/// `f` is called at most `max_retries + 1` times and must build a fresh
/// request on each call.
pub(crate) async fn retry_send<F, Fut>(
    max_retries: u32,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    for attempt in 0..max_retries {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) => {
                let delay = backoff_delay(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_retries,
                    "verifier request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
    f().await
}
