//! Domain DTOs for the Satellite parameter API.
//!
//! # Design
//! Resource ids are opaque: Satellite returns integers, other Foreman-style
//! services return strings, and the client only ever pastes them back into a
//! URL. Parameter values are kept as raw JSON so they round-trip exactly as
//! the remote API returned them.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque identifier of one resource within an endpoint collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Read an id out of a list descriptor. Only numbers and non-empty
    /// strings are usable; null, `""`, objects and arrays are not.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.to_string())),
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resource returned by the list phase. Only the id is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    pub id: ResourceId,
}

/// One name/value parameter attached to a resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterEntry {
    pub name: String,
    pub value: Value,
}

impl ParameterEntry {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The parts of a detail response the aggregator keeps.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDetail {
    pub name: String,
    pub parameters: Vec<ParameterEntry>,
}

/// Resource name to its parameters, in source order.
pub type AggregatedResult = BTreeMap<String, Vec<ParameterEntry>>;
