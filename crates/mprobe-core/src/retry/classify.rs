//! Classify HTTP status and transport errors into probe error kinds.

use crate::retry::error::ProbeErrorKind;
use crate::transport::TransportError;

/// Classify a non-success HTTP status code.
pub fn classify_http_status(code: u16) -> ProbeErrorKind {
    match code {
        401 => ProbeErrorKind::Unauthorized,
        403 => ProbeErrorKind::Forbidden,
        404 => ProbeErrorKind::NotFound,
        400..=499 => ProbeErrorKind::ClientError,
        500..=599 => ProbeErrorKind::ServerError,
        _ => ProbeErrorKind::UnexpectedStatus,
    }
}

/// Classify a transport failure. Only deadline expiry is distinguished.
pub fn classify_transport_error(e: &TransportError) -> ProbeErrorKind {
    match e {
        TransportError::Timeout => ProbeErrorKind::Timeout,
        TransportError::Connection(_) | TransportError::Other(_) => ProbeErrorKind::Network,
    }
}
