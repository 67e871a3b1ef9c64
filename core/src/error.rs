//! Error types for the Satellite parameter client.
//!
//! # Design
//! A small closed set of failure kinds so callers can branch on the category
//! instead of matching message text. Every message names the URL involved and
//! the underlying diagnostic. Credentials are never part of any variant.

use thiserror::Error;

/// Errors surfaced by `Session` and `Aggregator`.
#[derive(Debug, Error)]
pub enum SatelliteError {
    /// The transport failed while establishing the session (DNS, TCP, TLS).
    #[error("could not connect to {url}: {reason}")]
    ConnectionFailure { url: String, reason: String },

    /// The service answered the status check with a non-success status.
    #[error("failed to establish session with {url}: HTTP {status}: {body}")]
    AuthenticationOrAvailabilityFailure {
        url: String,
        status: u16,
        body: String,
    },

    /// A list or detail request failed during aggregation.
    #[error("request to {url} failed: {cause}")]
    RemoteRequestFailure { url: String, cause: RequestFailure },

    /// The response lacked a field that has no safe default.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse { url: String, reason: String },

    /// A request was attempted on a session with no connection handle.
    #[error("session is not established")]
    NotConnected,
}

/// Why a `RemoteRequestFailure` happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    /// The service responded with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// No response was received.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Failure category of a `SatelliteError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Connection,
    AuthenticationOrAvailability,
    RemoteRequest,
    MalformedResponse,
    NotConnected,
}

impl SatelliteError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SatelliteError::ConnectionFailure { .. } => FailureKind::Connection,
            SatelliteError::AuthenticationOrAvailabilityFailure { .. } => {
                FailureKind::AuthenticationOrAvailability
            }
            SatelliteError::RemoteRequestFailure { .. } => FailureKind::RemoteRequest,
            SatelliteError::MalformedResponse { .. } => FailureKind::MalformedResponse,
            SatelliteError::NotConnected => FailureKind::NotConnected,
        }
    }

    pub(crate) fn malformed(url: &str, reason: impl Into<String>) -> Self {
        SatelliteError::MalformedResponse {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
