//! In-memory connector for unit tests: canned responses per URL, a log of
//! executed requests, and counters for opened and released handles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ConnectionSettings, Connector, Transport, TransportError};

#[derive(Default)]
struct Script {
    responses: HashMap<String, Result<(u16, String), String>>,
    requests: Vec<String>,
    connects: usize,
    releases: usize,
}

#[derive(Clone, Default)]
pub struct ScriptedConnector {
    script: Arc<Mutex<Script>>,
}

pub struct ScriptedHandle {
    script: Arc<Mutex<Script>>,
}

impl ScriptedConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.script
            .lock()
            .unwrap()
            .responses
            .insert(url.to_string(), Ok((status, body.into())));
        self
    }

    pub fn respond_json(self, url: &str, body: Value) -> Self {
        self.respond(url, 200, body.to_string())
    }

    pub fn fail(self, url: &str, reason: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .responses
            .insert(url.to_string(), Err(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn connects(&self) -> usize {
        self.script.lock().unwrap().connects
    }

    pub fn releases(&self) -> usize {
        self.script.lock().unwrap().releases
    }
}

impl Connector for ScriptedConnector {
    type Handle = ScriptedHandle;

    fn connect(&self, _settings: &ConnectionSettings) -> ScriptedHandle {
        self.script.lock().unwrap().connects += 1;
        ScriptedHandle {
            script: Arc::clone(&self.script),
        }
    }
}

impl Transport for ScriptedHandle {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut script = self.script.lock().unwrap();
        script.requests.push(request.url.clone());
        match script.responses.get(&request.url) {
            Some(Ok((status, body))) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(Err(reason)) => Err(TransportError(reason.clone())),
            None => Ok(HttpResponse {
                status: 404,
                body: "Resource not found".to_string(),
            }),
        }
    }
}

impl Drop for ScriptedHandle {
    fn drop(&mut self) {
        if let Ok(mut script) = self.script.lock() {
            script.releases += 1;
        }
    }
}
