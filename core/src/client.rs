//! Stateless HTTP request builder and response parser for the Satellite API.
//!
//! # Design
//! `SatelliteClient` holds only a `base_url` and carries no mutable state
//! between calls. Each remote operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The `Session` executes the round-trip in between, keeping
//! URL layout and JSON interpretation deterministic and free of I/O.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{RequestFailure, SatelliteError};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{ParameterEntry, ResourceDetail, ResourceId, ResourceRef};

/// Versioned API prefix. Only v2 is supported.
pub const API_PREFIX: &str = "api/v2";

/// Sub-resource probed by `Session::establish`.
pub const STATUS_RESOURCE: &str = "status";

/// Synchronous, stateless request builder for the Satellite v2 API.
#[derive(Debug, Clone)]
pub struct SatelliteClient {
    base_url: String,
}

#[derive(Deserialize)]
struct RawDetail {
    name: Option<String>,
    parameters: Option<Vec<RawParameter>>,
}

#[derive(Deserialize)]
struct RawParameter {
    name: Option<String>,
    #[serde(default)]
    value: Value,
}

impl SatelliteClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base_url>/api/v2`
    pub fn api_root(&self) -> String {
        format!("{}/{API_PREFIX}", self.base_url)
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.api_root(), endpoint.trim_matches('/'))
    }

    pub fn build_status_check(&self) -> HttpRequest {
        get(format!("{}/{STATUS_RESOURCE}", self.api_root()))
    }

    pub fn build_list(&self, endpoint: &str) -> HttpRequest {
        get(self.endpoint_url(endpoint))
    }

    pub fn build_detail(&self, endpoint: &str, id: &ResourceId) -> HttpRequest {
        get(format!("{}/{id}", self.endpoint_url(endpoint)))
    }

    pub fn parse_status(&self, url: &str, response: HttpResponse) -> Result<(), SatelliteError> {
        if response.is_success() {
            return Ok(());
        }
        Err(SatelliteError::AuthenticationOrAvailabilityFailure {
            url: url.to_string(),
            status: response.status,
            body: response.body,
        })
    }

    /// Extract resource ids from a list response, in list order.
    ///
    /// Descriptors without a usable `id` are skipped.
    pub fn parse_list(
        &self,
        url: &str,
        response: HttpResponse,
    ) -> Result<Vec<ResourceRef>, SatelliteError> {
        check_status(url, &response)?;
        let body: Value = parse_json(url, &response.body)?;
        let results = body
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| SatelliteError::malformed(url, "missing `results` array"))?;

        let refs: Vec<ResourceRef> = results
            .iter()
            .filter_map(|descriptor| {
                let id = descriptor.get("id").and_then(ResourceId::from_json);
                if id.is_none() {
                    warn!(url = %url, "skipping resource descriptor without an id");
                }
                id.map(|id| ResourceRef { id })
            })
            .collect();
        Ok(refs)
    }

    /// Read `name` and `parameters` from a detail response.
    ///
    /// A missing or null `parameters` field yields an empty list; a missing
    /// `name` is fatal.
    pub fn parse_detail(
        &self,
        url: &str,
        response: HttpResponse,
    ) -> Result<ResourceDetail, SatelliteError> {
        check_status(url, &response)?;
        let raw: RawDetail = parse_json(url, &response.body)?;
        let name = raw
            .name
            .ok_or_else(|| SatelliteError::malformed(url, "missing resource `name`"))?;

        let parameters = raw
            .parameters
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, p)| match p.name {
                Some(param_name) => Ok(ParameterEntry {
                    name: param_name,
                    value: p.value,
                }),
                None => Err(SatelliteError::malformed(
                    url,
                    format!("parameter {index} of `{name}` has no `name`"),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResourceDetail { name, parameters })
    }
}

fn get(url: String) -> HttpRequest {
    HttpRequest {
        url,
        headers: vec![("accept".to_string(), "application/json".to_string())],
    }
}

fn check_status(url: &str, response: &HttpResponse) -> Result<(), SatelliteError> {
    if response.is_success() {
        return Ok(());
    }
    Err(SatelliteError::RemoteRequestFailure {
        url: url.to_string(),
        cause: RequestFailure::Status {
            status: response.status,
            body: response.body.clone(),
        },
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(url: &str, body: &str) -> Result<T, SatelliteError> {
    serde_json::from_str(body).map_err(|e| SatelliteError::malformed(url, e.to_string()))
}
