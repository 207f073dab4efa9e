//! Retry loop: run an async attempt until success or the policy says stop.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::error::ProbeError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` (passed the 1-based attempt number) until it succeeds or the
/// policy says to stop. Sleeps for the backoff between attempts; the sleep
/// races `cancel` so a cancelled probe does not wait out its backoff.
///
/// Returns the last error, or `RetriesExhausted` if no attempt ever ran.
pub async fn run_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: Option<&CancellationToken>,
    mut f: F,
) -> Result<T, ProbeError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ProbeError>>,
{
    let mut last_error = None;
    for attempt in 1..=policy.max_attempts {
        let e = match f(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        match policy.decide(attempt, e.kind(), e.status_code()) {
            RetryDecision::NoRetry => return Err(e),
            RetryDecision::RetryAfter(delay) => {
                tracing::warn!(
                    attempt,
                    kind = %e.kind(),
                    delay_ms = delay.as_millis() as u64,
                    "probe attempt failed, retrying: {}",
                    e
                );
                last_error = Some(e);
                sleep_or_cancel(delay, cancel).await?;
            }
        }
    }
    Err(last_error.unwrap_or_else(|| ProbeError::retries_exhausted(policy.max_attempts)))
}

async fn sleep_or_cancel(
    delay: std::time::Duration,
    cancel: Option<&CancellationToken>,
) -> Result<(), ProbeError> {
    match cancel {
        Some(token) => tokio::select! {
            _ = token.cancelled() => Err(ProbeError::cancelled()),
            _ = tokio::time::sleep(delay) => Ok(()),
        },
        None => {
            tokio::time::sleep(delay).await;
            Ok(())
        }
    }
}
