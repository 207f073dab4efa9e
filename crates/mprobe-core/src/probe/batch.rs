//! Probe many URLs concurrently.
//!
//! Keeps up to `concurrency` probes in flight; when one finishes the next URL
//! is started. Probes share the transport and nothing else.

use std::sync::Arc;

use crate::retry::ProbeError;
use crate::transport::Transport;

use super::{ProbeOptions, ProbeResult, Prober};

/// Probes every URL and returns one result per input, in input order.
pub async fn probe_many<T>(
    prober: Arc<Prober<T>>,
    urls: Vec<String>,
    options: &ProbeOptions,
    concurrency: usize,
) -> Vec<Result<ProbeResult, ProbeError>>
where
    T: Transport + 'static,
{
    let concurrency = concurrency.max(1);
    let mut results: Vec<Option<Result<ProbeResult, ProbeError>>> =
        urls.iter().map(|_| None).collect();
    let mut pending = urls.into_iter().enumerate();
    let mut join_set = tokio::task::JoinSet::new();

    loop {
        while join_set.len() < concurrency {
            let Some((idx, url)) = pending.next() else {
                break;
            };
            let prober = Arc::clone(&prober);
            let options = options.clone();
            join_set.spawn(async move {
                let result = prober.probe(&url, &options).await;
                (idx, result)
            });
        }

        let Some(joined) = join_set.join_next().await else {
            break;
        };
        match joined {
            Ok((idx, result)) => {
                if let Err(e) = &result {
                    tracing::debug!(idx, kind = %e.kind(), "batch probe failed: {}", e);
                }
                results[idx] = Some(result);
            }
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => tracing::warn!("batch probe task ended unexpectedly: {}", e),
        }
    }

    results
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Err(ProbeError::cancelled())))
        .collect()
}
