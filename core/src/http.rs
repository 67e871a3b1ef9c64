//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data.
//! `SatelliteClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without ever touching the network; a `Transport` handle owned by
//! the `Session` performs the actual I/O.
//!
//! Requests never carry credentials. The authorization header is attached by
//! the transport, so a request can be logged or debug-printed freely.

/// A GET request described as plain data.
///
/// The Satellite parameter API is read-only, so there is no method field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport` after executing an `HttpRequest`, then passed
/// to `SatelliteClient::parse_*` methods for interpretation. Non-success
/// statuses are carried here as data rather than as transport errors.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}
