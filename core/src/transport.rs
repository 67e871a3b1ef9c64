//! Connection handles that execute `HttpRequest`s.
//!
//! # Design
//! `Connector` builds a `Transport` handle from the session's credentials and
//! TLS policy; only `Session::establish` calls it. The default pair is backed
//! by a blocking `ureq` agent configured so that HTTP error statuses come back
//! as data, leaving status interpretation to `SatelliteClient`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use ureq::tls::TlsConfig;
use ureq::Agent;

use crate::http::{HttpRequest, HttpResponse};

/// No response was obtained for a request.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Credentials and TLS policy a connection handle is built from.
#[derive(Debug)]
pub struct ConnectionSettings {
    pub username: String,
    pub password: SecretString,
    pub validate_certs: bool,
}

/// An open connection handle.
pub trait Transport {
    /// Execute one request. Non-success statuses are returned as `Ok`.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Builds connection handles.
pub trait Connector {
    type Handle: Transport;

    fn connect(&self, settings: &ConnectionSettings) -> Self::Handle;
}

/// Connector producing `ureq`-backed handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqConnector;

/// A `ureq` agent plus the precomputed basic-auth header.
pub struct UreqTransport {
    agent: Agent,
    authorization: SecretString,
}

impl Connector for UreqConnector {
    type Handle = UreqTransport;

    fn connect(&self, settings: &ConnectionSettings) -> UreqTransport {
        let tls = TlsConfig::builder()
            .disable_verification(!settings.validate_certs)
            .build();
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .tls_config(tls)
            .build()
            .new_agent();

        UreqTransport {
            agent,
            authorization: basic_auth(&settings.username, &settings.password),
        }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .agent
            .get(&request.url)
            .header("authorization", self.authorization.expose_secret());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.call().map_err(|e| TransportError(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

fn basic_auth(username: &str, password: &SecretString) -> SecretString {
    let token = STANDARD.encode(format!("{username}:{}", password.expose_secret()));
    SecretString::from(format!("Basic {token}"))
}
