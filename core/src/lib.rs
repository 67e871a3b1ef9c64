//! Blocking client that collects the parameters attached to resources of a
//! Satellite (Foreman `api/v2`) endpoint.
//!
//! # Overview
//! A `Session` authenticates against the server and owns the connection
//! handle. An `Aggregator` borrows the session, lists the endpoint, fetches
//! every resource's detail and returns resource name → parameters.
//!
//! # Design
//! - `SatelliteClient` is stateless: it builds `HttpRequest`s and parses
//!   `HttpResponse`s without touching the network.
//! - I/O goes through the `Transport`/`Connector` seam; the default is a
//!   blocking `ureq` agent. Tests swap in an in-memory connector.
//! - The session releases its handle on drop, and the aggregator disconnects
//!   it once when done, so no exit path leaks a connection.
//!
//! ```no_run
//! use satellite_core::{fetch_parameters, SessionConfig};
//!
//! let config = SessionConfig::new("https://satellite.example.com", "admin", "changeme");
//! let parameters = fetch_parameters(config, "locations")?;
//! for (location, entries) in &parameters {
//!     println!("{location}: {} parameters", entries.len());
//! }
//! # Ok::<(), satellite_core::SatelliteError>(())
//! ```

pub mod aggregator;
pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use aggregator::{fetch_parameters, Aggregator};
pub use client::SatelliteClient;
pub use error::{FailureKind, RequestFailure, SatelliteError};
pub use http::{HttpRequest, HttpResponse};
pub use session::{Session, SessionConfig};
pub use transport::{ConnectionSettings, Connector, Transport, TransportError, UreqConnector};
pub use types::{AggregatedResult, ParameterEntry, ResourceDetail, ResourceId, ResourceRef};
