//! Retry and backoff policy.
//!
//! Error classification (HTTP status, transport failures) and the linear
//! backoff decision live here so the probe engine only has to describe one
//! attempt cycle.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify_http_status, classify_transport_error};
pub use error::{ProbeError, ProbeErrorKind};
pub use policy::{RetryDecision, RetryPolicy};
pub use run::run_with_retry;
