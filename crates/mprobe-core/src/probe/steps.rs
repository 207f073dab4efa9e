//! The three probe steps and the request plumbing they share.

use crate::classify::{
    extract_size_from_content_length, extract_size_from_content_range, is_audio_content,
    is_video_content, normalize_content_type,
};
use crate::quirks::{apply_platform_quirks, quirk_reason};
use crate::retry::{ProbeError, ProbeErrorKind};
use crate::transport::{Method, Transport, TransportRequest, TransportResponse};

use super::{ProbeMethod, ProbeOptions, ProbeResult, Prober};

/// Range header asking for the first byte only.
pub const RANGE_FIRST_BYTE: &str = "bytes=0-0";

const STATUS_PARTIAL_CONTENT: u16 = 206;
const STATUS_METHOD_NOT_ALLOWED: u16 = 405;

/// Result of one non-final step.
#[derive(Debug)]
pub(super) enum StepOutcome {
    Success(ProbeResult),
    /// No result; try the next method.
    Defer,
    /// Abort the cycle. Only cancellation does this before the final step.
    Fail(ProbeError),
}

impl<T: Transport> Prober<T> {
    /// GET `bytes=0-0`. Succeeds only on a 206 with a parseable `Content-Range`.
    pub(super) async fn range_probe(&self, url: &str, options: &ProbeOptions) -> StepOutcome {
        let request = build_request(url, Method::Get, true, options);
        let resp = match self.send(&request, options).await {
            Ok(resp) => resp,
            Err(e) => return defer_unless_cancelled(ProbeMethod::Range, e),
        };
        if resp.status != STATUS_PARTIAL_CONTENT {
            tracing::debug!(status = resp.status, "range probe: no partial content, deferring");
            return StepOutcome::Defer;
        }
        match resp.header("content-range").and_then(extract_size_from_content_range) {
            Some(size) => StepOutcome::Success(finish(url, &resp, Some(size), true, ProbeMethod::Range, options)),
            None => {
                tracing::debug!("range probe: 206 without usable Content-Range, deferring");
                StepOutcome::Defer
            }
        }
    }

    /// HEAD. Any non-2xx (405 included) defers to the final GET.
    pub(super) async fn head_probe(&self, url: &str, options: &ProbeOptions) -> StepOutcome {
        let request = build_request(url, Method::Head, false, options);
        let resp = match self.send(&request, options).await {
            Ok(resp) => resp,
            Err(e) => return defer_unless_cancelled(ProbeMethod::Head, e),
        };
        if resp.status == STATUS_METHOD_NOT_ALLOWED {
            tracing::debug!("head probe: method not allowed, deferring");
            return StepOutcome::Defer;
        }
        if !resp.is_success() {
            tracing::debug!(status = resp.status, "head probe: not successful, deferring");
            return StepOutcome::Defer;
        }
        let size = resp
            .header("content-length")
            .and_then(extract_size_from_content_length);
        let ranges = accepts_byte_ranges(&resp);
        StepOutcome::Success(finish(url, &resp, size, ranges, ProbeMethod::Head, options))
    }

    /// Final GET (still asking for one byte). The only step that turns an
    /// HTTP status or transport failure into the cycle's error.
    pub(super) async fn get_probe(
        &self,
        url: &str,
        options: &ProbeOptions,
    ) -> Result<ProbeResult, ProbeError> {
        let request = build_request(url, Method::Get, true, options);
        let resp = self.send(&request, options).await?;
        if !resp.is_success() && resp.status != STATUS_PARTIAL_CONTENT {
            tracing::debug!(status = resp.status, "get probe: failed");
            return Err(ProbeError::http(resp.status, url));
        }
        let partial = resp.status == STATUS_PARTIAL_CONTENT;
        // On a 206, Content-Length is the length of the slice, not the resource.
        let size = resp
            .header("content-range")
            .and_then(extract_size_from_content_range)
            .or_else(|| {
                resp.header("content-length")
                    .filter(|_| !partial)
                    .and_then(extract_size_from_content_length)
            });
        let ranges = accepts_byte_ranges(&resp) || partial;
        Ok(finish(url, &resp, size, ranges, ProbeMethod::Get, options))
    }

    /// Sends one request under the per-request deadline, racing the caller's
    /// cancellation token if there is one.
    async fn send(
        &self,
        request: &TransportRequest,
        options: &ProbeOptions,
    ) -> Result<TransportResponse, ProbeError> {
        tracing::trace!(method = request.method.as_str(), "sending request");
        let call = tokio::time::timeout(request.timeout, self.transport.execute(request));
        let outcome = match &options.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => return Err(ProbeError::cancelled()),
                outcome = call => outcome,
            },
            None => call.await,
        };
        match outcome {
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(e)) => Err(e.into()),
            Err(_elapsed) => Err(ProbeError::timeout(request.timeout)),
        }
    }
}

fn defer_unless_cancelled(method: ProbeMethod, e: ProbeError) -> StepOutcome {
    if e.kind() == ProbeErrorKind::Cancelled {
        return StepOutcome::Fail(e);
    }
    tracing::debug!(%method, kind = %e.kind(), "{method} probe failed, deferring: {e}");
    StepOutcome::Defer
}

/// Caller headers in order, plus `Range` when asked for. A caller-supplied
/// Range header is replaced so the probe stays a 1-byte fetch.
fn build_request(url: &str, method: Method, with_range: bool, options: &ProbeOptions) -> TransportRequest {
    let mut headers = Vec::with_capacity(options.headers.len() + 1);
    for (name, value) in &options.headers {
        if with_range && name.trim().eq_ignore_ascii_case("range") {
            tracing::debug!(value = %value, "replacing caller Range header with {RANGE_FIRST_BYTE}");
            continue;
        }
        headers.push((name.clone(), value.clone()));
    }
    if with_range {
        headers.push(("Range".to_string(), RANGE_FIRST_BYTE.to_string()));
    }
    TransportRequest {
        url: url.to_string(),
        method,
        headers,
        redirect: options.redirect_policy(),
        timeout: options.timeout,
    }
}

fn accepts_byte_ranges(resp: &TransportResponse) -> bool {
    resp.header("accept-ranges")
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("bytes"))
}

/// Builds the result from the response that produced it, applying quirk
/// correction when enabled.
fn finish(
    url: &str,
    resp: &TransportResponse,
    size: Option<u64>,
    supports_range_requests: bool,
    method: ProbeMethod,
    options: &ProbeOptions,
) -> ProbeResult {
    let server_type = resp.header("content-type").and_then(normalize_content_type);
    let content_type = if options.allow_platform_quirks {
        let corrected = apply_platform_quirks(url, server_type.as_deref())
            .and_then(|ct| normalize_content_type(&ct));
        if let Some(reason) = quirk_reason(url, server_type.as_deref(), corrected.as_deref()) {
            tracing::info!("{reason}");
        }
        corrected
    } else {
        server_type
    };

    let result = ProbeResult {
        is_video: is_video_content(content_type.as_deref(), url),
        is_audio: is_audio_content(content_type.as_deref(), url),
        content_type,
        size,
        supports_range_requests,
        method,
    };
    tracing::debug!(
        %method,
        status = resp.status,
        size = ?result.size,
        content_type = ?result.content_type,
        ranges = result.supports_range_requests,
        "probe succeeded"
    );
    result
}
