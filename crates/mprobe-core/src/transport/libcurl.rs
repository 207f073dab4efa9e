//! Default transport backed by libcurl (the `curl` crate).
//!
//! Each request runs on tokio's blocking pool. libcurl's own timeout is set to
//! the request deadline, so a request the engine has given up on still stops.

use std::future::Future;
use std::str;
use std::time::Duration;

use ::curl::easy::{Easy, List};

use super::parse::parse_header_lines;
use super::{Method, RedirectPolicy, Transport, TransportError, TransportRequest, TransportResponse};

/// Body bytes accepted before the transfer is cut off. A 1-byte range fetch
/// stays far below this; a GET against a server ignoring `Range` does not.
const BODY_BUDGET: usize = 64 * 1024;
const MAX_REDIRECTS: u32 = 10;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// libcurl-backed [`Transport`].
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    user_agent: Option<String>,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl Transport for CurlTransport {
    fn execute(
        &self,
        request: &TransportRequest,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        let request = request.clone();
        let user_agent = self.user_agent.clone();
        async move {
            tokio::task::spawn_blocking(move || perform(&request, user_agent.as_deref()))
                .await
                .map_err(|e| TransportError::Other(format!("transport task failed: {e}")))?
        }
    }
}

/// Runs one request to completion on the current thread.
fn perform(
    request: &TransportRequest,
    user_agent: Option<&str>,
) -> Result<TransportResponse, TransportError> {
    let mut lines: Vec<String> = Vec::new();
    let mut body_seen = 0usize;
    let mut truncated = false;

    let mut easy = Easy::new();
    easy.url(&request.url)?;
    match request.method {
        Method::Head => easy.nobody(true)?,
        Method::Get => easy.get(true)?,
    }
    match request.redirect {
        RedirectPolicy::Follow => {
            easy.follow_location(true)?;
            easy.max_redirections(MAX_REDIRECTS)?;
        }
        RedirectPolicy::Manual => easy.follow_location(false)?,
    }
    easy.connect_timeout(CONNECT_TIMEOUT.min(request.timeout))?;
    easy.timeout(request.timeout)?;
    if let Some(ua) = user_agent {
        easy.useragent(ua)?;
    }

    let mut list = List::new();
    for (k, v) in &request.headers {
        list.append(&header_line(k, v))?;
    }
    if !request.headers.is_empty() {
        easy.http_headers(list)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                lines.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            body_seen += data.len();
            if body_seen > BODY_BUDGET {
                truncated = true;
                return Ok(0); // abort transfer
            }
            Ok(data.len())
        })?;
        transfer.perform()
    };

    if let Err(e) = performed {
        // Cutting the body short surfaces as a write error; headers are complete by then.
        if !(truncated && e.is_write_error()) {
            return Err(e.into());
        }
    }

    let code = easy.response_code()?;
    let status = u16::try_from(code)
        .ok()
        .filter(|s| *s != 0)
        .ok_or_else(|| TransportError::Other(format!("no usable response code ({code})")))?;

    tracing::trace!(
        method = request.method.as_str(),
        url = %request.url,
        status,
        truncated,
        "curl request finished"
    );

    Ok(TransportResponse {
        status,
        headers: parse_header_lines(&lines),
    })
}

/// Formats one header for curl's list. libcurl drops `Name:` with nothing after
/// it; `Name;` is how it sends a header with an empty value.
fn header_line(name: &str, value: &str) -> String {
    let (name, value) = (name.trim(), value.trim());
    if value.is_empty() {
        format!("{name};")
    } else {
        format!("{name}: {value}")
    }
}

/// Classify a curl error into a transport error.
pub(crate) fn classify_curl_error(e: &::curl::Error) -> TransportError {
    if e.is_operation_timedout() {
        return TransportError::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
    {
        return TransportError::Connection(e.to_string());
    }
    TransportError::Other(e.to_string())
}

impl From<::curl::Error> for TransportError {
    fn from(e: ::curl::Error) -> Self {
        classify_curl_error(&e)
    }
}
