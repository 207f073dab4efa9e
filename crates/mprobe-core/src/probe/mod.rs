//! Probe engine: learn a remote media resource's type, size and Range support.
//!
//! Each attempt cycle tries the cheapest method first:
//!
//! 1. GET with `Range: bytes=0-0` (ideally a 1-byte `206` with `Content-Range`),
//! 2. HEAD (no body, but some servers reject it),
//! 3. plain GET with the same Range header, the universal fallback.
//!
//! Steps 1 and 2 never fail the cycle on HTTP or transport errors; they defer
//! to the next step. Only step 3 turns a status into an error, so a server
//! that merely refuses Range or HEAD is not reported as broken. The whole
//! cycle is retried per [`RetryPolicy`](crate::retry::RetryPolicy).

mod batch;
mod options;
mod steps;

use std::fmt;

use serde::Serialize;
use tracing::Instrument;
use url::Url;

use crate::classify::{media_kind, MediaKind};
use crate::retry::{run_with_retry, ProbeError};
use crate::transport::{CurlTransport, Transport};

pub use batch::probe_many;
pub use options::ProbeOptions;
pub use steps::RANGE_FIRST_BYTE;

use steps::StepOutcome;

/// Which request produced a [`ProbeResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeMethod {
    Range,
    Head,
    Get,
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProbeMethod::Range => "range",
            ProbeMethod::Head => "head",
            ProbeMethod::Get => "get",
        })
    }
}

/// Outcome of a successful probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    /// Lowercase media type without parameters.
    pub content_type: Option<String>,
    /// Total size in bytes, if the server disclosed it.
    pub size: Option<u64>,
    /// True if the server demonstrated or advertised byte-range support.
    pub supports_range_requests: bool,
    pub is_video: bool,
    pub is_audio: bool,
    pub method: ProbeMethod,
}

impl ProbeResult {
    pub fn media_kind(&self) -> MediaKind {
        media_kind(self.is_video, self.is_audio)
    }
}

/// Probe engine over a [`Transport`]. Holds no per-call state, so one
/// `Prober` can serve any number of concurrent probes.
#[derive(Debug, Clone, Default)]
pub struct Prober<T = CurlTransport> {
    transport: T,
}

impl Prober<CurlTransport> {
    /// Engine over the default libcurl transport.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Transport> Prober<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Probes `url`, returning a result or exactly one classified error.
    ///
    /// A malformed URL fails immediately with `InvalidUrl`; nothing is sent.
    pub async fn probe(&self, url: &str, options: &ProbeOptions) -> Result<ProbeResult, ProbeError> {
        let url = url.trim();
        validate_url(url)?;
        let span = tracing::debug_span!("probe", url = %url);
        run_with_retry(&options.retry_policy(), options.cancel.as_ref(), |attempt| {
            self.attempt_cycle(url, options, attempt)
        })
        .instrument(span)
        .await
    }

    /// One pass through range, head and get.
    async fn attempt_cycle(
        &self,
        url: &str,
        options: &ProbeOptions,
        attempt: u32,
    ) -> Result<ProbeResult, ProbeError> {
        tracing::debug!(attempt, "starting attempt cycle");

        match self.range_probe(url, options).await {
            StepOutcome::Success(result) => return Ok(result),
            StepOutcome::Fail(e) => return Err(e),
            StepOutcome::Defer => {}
        }
        match self.head_probe(url, options).await {
            StepOutcome::Success(result) => return Ok(result),
            StepOutcome::Fail(e) => return Err(e),
            StepOutcome::Defer => {}
        }
        self.get_probe(url, options).await
    }
}

/// Convenience wrapper: probe `url` with a fresh libcurl-backed engine.
pub async fn probe(url: &str, options: &ProbeOptions) -> Result<ProbeResult, ProbeError> {
    Prober::new().probe(url, options).await
}

/// Syntactic check only. Non-HTTP schemes are rejected too since no transport can serve them.
fn validate_url(url: &str) -> Result<Url, ProbeError> {
    let parsed = Url::parse(url).map_err(|e| ProbeError::invalid_url(url, e))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ProbeError::invalid_url(
            url,
            format!("unsupported scheme {other:?}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::ProbeErrorKind;

    #[test]
    fn validate_rejects_garbage() {
        let e = validate_url("not a url").unwrap_err();
        assert_eq!(e.kind(), ProbeErrorKind::InvalidUrl);
        let e = validate_url("ftp://example.com/a.mp4").unwrap_err();
        assert_eq!(e.kind(), ProbeErrorKind::InvalidUrl);
        assert!(validate_url("https://example.com/a.mp4").is_ok());
        assert!(validate_url("http://127.0.0.1:8080/x").is_ok());
    }

    #[test]
    fn result_serializes_camel_case() {
        let r = ProbeResult {
            content_type: Some("video/mp4".into()),
            size: Some(42),
            supports_range_requests: true,
            is_video: true,
            is_audio: false,
            method: ProbeMethod::Range,
        };
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["contentType"], "video/mp4");
        assert_eq!(json["supportsRangeRequests"], true);
        assert_eq!(json["method"], "range");
        assert_eq!(r.media_kind(), MediaKind::Video);
    }
}
