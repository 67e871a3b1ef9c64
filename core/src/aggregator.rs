//! Two-phase parameter collection for one endpoint.
//!
//! # Design
//! The aggregator borrows an established `Session`; it never opens one of its
//! own. `fetch_parameters` consumes the aggregator and disconnects the
//! session exactly once, whether aggregation succeeded or not. Resources are
//! fetched one at a time in list order and the first failure aborts the run
//! without returning a partial result.

use tracing::{debug, info, warn};

use crate::error::SatelliteError;
use crate::session::{Session, SessionConfig};
use crate::transport::{Connector, UreqConnector};
use crate::types::AggregatedResult;

/// Collects the parameters of every resource under one endpoint.
pub struct Aggregator<'s, C: Connector = UreqConnector> {
    session: &'s mut Session<C>,
    endpoint: String,
}

impl<'s, C: Connector> Aggregator<'s, C> {
    pub fn new(session: &'s mut Session<C>, endpoint: impl Into<String>) -> Self {
        Self {
            session,
            endpoint: endpoint.into(),
        }
    }

    /// List the endpoint, fetch each resource's detail and map resource name
    /// to its parameters. A later resource with an already seen name replaces
    /// the earlier one.
    pub fn fetch_parameters(self) -> Result<AggregatedResult, SatelliteError> {
        let result = self.collect();
        self.session.disconnect();
        result
    }

    fn collect(&self) -> Result<AggregatedResult, SatelliteError> {
        let client = self.session.client();

        let list_request = client.build_list(&self.endpoint);
        let list_response = self.session.execute(&list_request)?;
        let refs = client.parse_list(&list_request.url, list_response)?;
        debug!(endpoint = %self.endpoint, count = refs.len(), "listed resources");

        let mut result = AggregatedResult::new();
        for resource in &refs {
            let request = client.build_detail(&self.endpoint, &resource.id);
            let response = self.session.execute(&request)?;
            let detail = client.parse_detail(&request.url, response)?;

            if result.contains_key(&detail.name) {
                warn!(
                    endpoint = %self.endpoint,
                    id = %resource.id,
                    name = %detail.name,
                    "resource name already seen, replacing earlier parameters"
                );
            }
            result.insert(detail.name, detail.parameters);
        }

        info!(
            endpoint = %self.endpoint,
            resources = refs.len(),
            names = result.len(),
            "collected parameters"
        );
        Ok(result)
    }
}

/// Open a session from `config`, collect the parameters of `endpoint`, and
/// release the session.
pub fn fetch_parameters(
    config: SessionConfig,
    endpoint: &str,
) -> Result<AggregatedResult, SatelliteError> {
    let mut session = Session::new(config);
    session.establish()?;
    Aggregator::new(&mut session, endpoint).fetch_parameters()
}
