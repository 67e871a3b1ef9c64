//! In-process stand-in for the Satellite `api/v2` surface: a status probe,
//! collection listing and per-resource detail, all behind basic auth.
//!
//! Every request path is recorded so tests can assert on call order, and
//! individual paths can be made to fail with a 500.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, RwLock},
};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub id: u64,
    pub name: String,
    pub value: Value,
    pub parameter_type: String,
}

/// A resource in some collection. `id: None` lists it without an id, and
/// `parameters: None` omits the field from its detail document.
#[derive(Clone, Debug)]
pub struct Resource {
    pub id: Option<u64>,
    pub name: String,
    pub parameters: Option<Vec<Parameter>>,
}

impl Resource {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id: Some(id),
            name: name.to_string(),
            parameters: Some(Vec::new()),
        }
    }

    pub fn parameter(mut self, name: &str, value: impl Into<Value>) -> Self {
        let params = self.parameters.get_or_insert_with(Vec::new);
        let id = params.len() as u64 + 1;
        params.push(Parameter {
            id,
            name: name.to_string(),
            value: value.into(),
            parameter_type: "string".to_string(),
        });
        self
    }

    pub fn without_parameters(mut self) -> Self {
        self.parameters = None;
        self
    }

    pub fn without_id(mut self) -> Self {
        self.id = None;
        self
    }
}

#[derive(Default)]
struct Inner {
    username: String,
    password: String,
    collections: HashMap<String, Vec<Resource>>,
    failing: HashSet<String>,
    hits: Vec<String>,
}

/// Shared, cloneable handle on the fake server's data.
#[derive(Clone, Default)]
pub struct Satellite {
    inner: Arc<RwLock<Inner>>,
}

type Reply = Result<Json<Value>, (StatusCode, String)>;

impl Satellite {
    pub fn new(username: &str, password: &str) -> Self {
        let inner = Inner {
            username: username.to_string(),
            password: password.to_string(),
            ..Inner::default()
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    pub fn with_resource(self, collection: &str, resource: Resource) -> Self {
        self.write()
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(resource);
        self
    }

    /// Answer `path` (e.g. `/api/v2/locations/2`) with a 500.
    pub fn failing(self, path: &str) -> Self {
        self.write().failing.insert(path.to_string());
        self
    }

    /// Paths requested so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.read().hits.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the hit, then check credentials and injected failures.
    fn admit(&self, headers: &HeaderMap, path: String) -> Result<(), (StatusCode, String)> {
        let mut inner = self.write();
        inner.hits.push(path.clone());

        let expected = STANDARD.encode(format!("{}:{}", inner.username, inner.password));
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Basic "));
        if presented != Some(expected.as_str()) {
            return Err((
                StatusCode::UNAUTHORIZED,
                json!({"error": {"message": "Unable to authenticate user"}}).to_string(),
            ));
        }
        if inner.failing.contains(&path) {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": {"message": format!("injected failure for {path}")}}).to_string(),
            ));
        }
        Ok(())
    }
}

pub fn app(satellite: Satellite) -> Router {
    Router::new()
        .route("/api/v2/status", get(status))
        .route("/api/v2/{collection}", get(list_resources))
        .route("/api/v2/{collection}/{id}", get(get_resource))
        .with_state(satellite)
}

pub async fn run(listener: TcpListener, satellite: Satellite) -> Result<(), std::io::Error> {
    axum::serve(listener, app(satellite)).await
}

async fn status(State(sat): State<Satellite>, headers: HeaderMap) -> Reply {
    sat.admit(&headers, "/api/v2/status".to_string())?;
    Ok(Json(json!({
        "result": "ok",
        "status": 200,
        "version": "6.15.0",
        "api_version": 2
    })))
}

async fn list_resources(
    State(sat): State<Satellite>,
    headers: HeaderMap,
    Path(collection): Path<String>,
) -> Reply {
    sat.admit(&headers, format!("/api/v2/{collection}"))?;
    let inner = sat.read();
    let resources = inner
        .collections
        .get(&collection)
        .ok_or_else(|| not_found(&collection))?;

    let results: Vec<Value> = resources
        .iter()
        .map(|r| match r.id {
            Some(id) => json!({"id": id, "name": r.name, "title": r.name}),
            None => json!({"name": r.name, "title": r.name}),
        })
        .collect();
    Ok(Json(json!({
        "total": results.len(),
        "subtotal": results.len(),
        "page": 1,
        "per_page": 20,
        "search": null,
        "results": results
    })))
}

async fn get_resource(
    State(sat): State<Satellite>,
    headers: HeaderMap,
    Path((collection, id)): Path<(String, String)>,
) -> Reply {
    sat.admit(&headers, format!("/api/v2/{collection}/{id}"))?;
    let inner = sat.read();
    let resource = id
        .parse::<u64>()
        .ok()
        .and_then(|id| {
            inner
                .collections
                .get(&collection)?
                .iter()
                .find(|r| r.id == Some(id))
        })
        .ok_or_else(|| not_found(&format!("{collection}/{id}")))?;

    let mut body = json!({
        "id": resource.id,
        "name": resource.name,
        "title": resource.name,
    });
    if let Some(parameters) = &resource.parameters {
        body["parameters"] = json!(parameters);
    }
    Ok(Json(body))
}

fn not_found(what: &str) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        json!({"message": format!("Resource {what} not found")}).to_string(),
    )
}
