//! Authenticated session against a Satellite server.
//!
//! # Design
//! A `Session` owns at most one connection handle. `establish` is the only
//! place a handle is created; `disconnect` releases it and is idempotent.
//! `Drop` calls `disconnect`, so a session that goes out of scope on any path
//! releases its handle.

use std::fmt;

use secrecy::SecretString;
use tracing::{debug, info};

use crate::client::SatelliteClient;
use crate::error::{RequestFailure, SatelliteError};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ConnectionSettings, Connector, Transport, UreqConnector};

/// Static configuration a session is created from.
#[derive(Debug)]
pub struct SessionConfig {
    pub server_url: String,
    pub username: String,
    pub password: SecretString,
    pub validate_certs: bool,
}

impl SessionConfig {
    /// Certificates are validated unless `validate_certs(false)` is called.
    pub fn new(
        server_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_url: server_url.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
            validate_certs: true,
        }
    }

    pub fn validate_certs(mut self, validate: bool) -> Self {
        self.validate_certs = validate;
        self
    }
}

/// One authenticated HTTP context against `<server_url>/api/v2/`.
pub struct Session<C: Connector = UreqConnector> {
    client: SatelliteClient,
    settings: ConnectionSettings,
    connector: C,
    handle: Option<C::Handle>,
}

impl Session<UreqConnector> {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_connector(config, UreqConnector)
    }
}

impl<C: Connector> Session<C> {
    pub fn with_connector(config: SessionConfig, connector: C) -> Self {
        Self {
            client: SatelliteClient::new(&config.server_url),
            settings: ConnectionSettings {
                username: config.username,
                password: config.password,
                validate_certs: config.validate_certs,
            },
            connector,
            handle: None,
        }
    }

    /// Open the connection handle and verify the service accepts the
    /// credentials.
    ///
    /// An already established session is released first. On failure no
    /// handle is kept.
    pub fn establish(&mut self) -> Result<(), SatelliteError> {
        self.disconnect();

        let request = self.client.build_status_check();
        let handle = self.connector.connect(&self.settings);
        debug!(url = %request.url, validate_certs = self.settings.validate_certs, "checking service status");

        let response = handle
            .execute(&request)
            .map_err(|e| SatelliteError::ConnectionFailure {
                url: request.url.clone(),
                reason: e.to_string(),
            })?;
        self.client.parse_status(&request.url, response)?;

        info!(
            base_url = self.client.base_url(),
            username = %self.settings.username,
            "satellite session established"
        );
        self.handle = Some(handle);
        Ok(())
    }

    /// Release the connection handle. No-op when there is none.
    pub fn disconnect(&mut self) {
        if self.handle.take().is_some() {
            debug!(base_url = self.client.base_url(), "satellite session released");
        }
    }

    pub fn is_established(&self) -> bool {
        self.handle.is_some()
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// `<base_url>/api/v2`
    pub fn api_root(&self) -> String {
        self.client.api_root()
    }

    pub fn client(&self) -> &SatelliteClient {
        &self.client
    }

    /// Execute a request on the established handle.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, SatelliteError> {
        let handle = self.handle.as_ref().ok_or(SatelliteError::NotConnected)?;
        debug!(url = %request.url, "GET");
        handle
            .execute(request)
            .map_err(|e| SatelliteError::RemoteRequestFailure {
                url: request.url.clone(),
                cause: RequestFailure::Transport(e.to_string()),
            })
    }
}

impl<C: Connector> Drop for Session<C> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl<C: Connector> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.client.base_url())
            .field("settings", &self.settings)
            .field("established", &self.handle.is_some())
            .finish()
    }
}
