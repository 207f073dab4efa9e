//! HTTP transport abstraction used by the probe engine.
//!
//! The engine only needs four capabilities from the network layer: method,
//! headers, redirect behavior and a per-request deadline. [`CurlTransport`]
//! is the default; tests and embedders can supply their own [`Transport`].

mod libcurl;
mod parse;

use std::future::Future;
use std::time::Duration;

pub use libcurl::CurlTransport;

/// Request method. The engine never needs anything but GET and HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
        }
    }
}

/// Whether redirects are followed by the transport or returned as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectPolicy {
    #[default]
    Follow,
    Manual,
}

/// One outbound request.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub url: String,
    pub method: Method,
    /// Header pairs in send order.
    pub headers: Vec<(String, String)>,
    pub redirect: RedirectPolicy,
    /// Deadline for the whole request. The engine enforces it as well; blocking
    /// backends should apply it themselves so abandoned work stops too.
    pub timeout: Duration,
}

impl TransportRequest {
    /// Case-insensitive lookup of a request header.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Status and headers of the final response. Bodies are never surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
        }
    }

    /// Builder-style header append, mostly for tests and custom transports.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive lookup; the first occurrence wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport failure with no HTTP status attached.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("transport error: {0}")]
    Other(String),
}

/// Performs a single HTTP request.
///
/// Implementations must be safe to share across concurrent probes; the
/// engine holds no locks around them.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: &TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for std::sync::Arc<T> {
    fn execute(
        &self,
        request: &TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        (**self).execute(request)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.trim().eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
