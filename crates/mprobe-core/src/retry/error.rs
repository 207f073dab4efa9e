//! Classified probe error.

use std::fmt;

use crate::transport::TransportError;

/// What went wrong, closed over the failure modes a probe can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeErrorKind {
    /// URL failed to parse. Never retried.
    InvalidUrl,
    /// A request's deadline elapsed before a response arrived.
    Timeout,
    /// HTTP 401.
    Unauthorized,
    /// HTTP 403.
    Forbidden,
    /// HTTP 404.
    NotFound,
    /// Any other 4xx.
    ClientError,
    /// 5xx.
    ServerError,
    /// Final GET answered with a status outside 2xx/4xx/5xx (e.g. an unfollowed redirect).
    UnexpectedStatus,
    /// Connection refused, DNS failure, or any other transport failure without a status.
    Network,
    /// The retry loop ended without recording an error (e.g. zero attempts allowed).
    RetriesExhausted,
    /// The caller's cancellation token fired.
    Cancelled,
}

impl ProbeErrorKind {
    /// Retry if server-class, timeout, or a network error that carries no status.
    ///
    /// The status check matters: an unclassified error that happens to carry a
    /// status (`UnexpectedStatus`) is not retried.
    pub fn is_retryable(self, status_code: Option<u16>) -> bool {
        match self {
            ProbeErrorKind::ServerError | ProbeErrorKind::Timeout => true,
            ProbeErrorKind::Network => status_code.is_none(),
            _ => false,
        }
    }

    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            ProbeErrorKind::Unauthorized
                | ProbeErrorKind::Forbidden
                | ProbeErrorKind::NotFound
                | ProbeErrorKind::ClientError
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProbeErrorKind::InvalidUrl => "invalid_url",
            ProbeErrorKind::Timeout => "timeout",
            ProbeErrorKind::Unauthorized => "unauthorized",
            ProbeErrorKind::Forbidden => "forbidden",
            ProbeErrorKind::NotFound => "not_found",
            ProbeErrorKind::ClientError => "client_error",
            ProbeErrorKind::ServerError => "server_error",
            ProbeErrorKind::UnexpectedStatus => "unexpected_status",
            ProbeErrorKind::Network => "network",
            ProbeErrorKind::RetriesExhausted => "retries_exhausted",
            ProbeErrorKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error type returned by a probe.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ProbeError {
    kind: ProbeErrorKind,
    status_code: Option<u16>,
    message: String,
    #[source]
    source: Option<TransportError>,
}

impl ProbeError {
    pub fn new(kind: ProbeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid_url(url: &str, reason: impl fmt::Display) -> Self {
        Self::new(ProbeErrorKind::InvalidUrl, format!("invalid URL {url:?}: {reason}"))
    }

    /// Error for a final HTTP status that is not a success.
    pub fn http(status: u16, url: &str) -> Self {
        let kind = super::classify_http_status(status);
        Self {
            kind,
            status_code: Some(status),
            message: format!("GET {url} returned HTTP {status}"),
            source: None,
        }
    }

    pub fn timeout(after: std::time::Duration) -> Self {
        Self::new(
            ProbeErrorKind::Timeout,
            format!("request timed out after {} ms", after.as_millis()),
        )
    }

    pub fn cancelled() -> Self {
        Self::new(ProbeErrorKind::Cancelled, "probe cancelled")
    }

    pub fn retries_exhausted(attempts: u32) -> Self {
        Self::new(
            ProbeErrorKind::RetriesExhausted,
            format!("max retries exceeded ({attempts} attempts)"),
        )
    }

    pub fn kind(&self) -> ProbeErrorKind {
        self.kind
    }

    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable(self.status_code)
    }
}

impl From<TransportError> for ProbeError {
    fn from(e: TransportError) -> Self {
        Self {
            kind: super::classify_transport_error(&e),
            status_code: None,
            message: e.to_string(),
            source: Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_carries_status_and_kind() {
        let e = ProbeError::http(404, "https://example.com/a");
        assert_eq!(e.kind(), ProbeErrorKind::NotFound);
        assert_eq!(e.status_code(), Some(404));
        assert!(!e.is_retryable());
        assert!(e.to_string().contains("404"));
    }

    #[test]
    fn retry_partition() {
        assert!(ProbeErrorKind::ServerError.is_retryable(Some(503)));
        assert!(ProbeErrorKind::Timeout.is_retryable(None));
        assert!(ProbeErrorKind::Network.is_retryable(None));
        assert!(!ProbeErrorKind::Network.is_retryable(Some(0)));
        assert!(!ProbeErrorKind::UnexpectedStatus.is_retryable(Some(302)));
        assert!(!ProbeErrorKind::ClientError.is_retryable(Some(418)));
        assert!(!ProbeErrorKind::InvalidUrl.is_retryable(None));
        assert!(!ProbeErrorKind::Cancelled.is_retryable(None));
        assert!(!ProbeErrorKind::RetriesExhausted.is_retryable(None));
    }

    #[test]
    fn transport_errors_convert() {
        let e = ProbeError::from(TransportError::Timeout);
        assert_eq!(e.kind(), ProbeErrorKind::Timeout);
        assert_eq!(e.status_code(), None);
        let e = ProbeError::from(TransportError::Connection("refused".into()));
        assert_eq!(e.kind(), ProbeErrorKind::Network);
        assert!(e.is_retryable());
        assert!(std::error::Error::source(&e).is_some());
    }
}
