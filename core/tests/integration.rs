//! End-to-end tests against the live mock Satellite.
//!
//! # Design
//! Starts the mock server on a random port, then drives `Session` and
//! `Aggregator` over real HTTP through the default ureq transport.

use mock_satellite::{Resource, Satellite};
use satellite_core::{
    fetch_parameters, Aggregator, FailureKind, ParameterEntry, SatelliteError, Session,
    SessionConfig,
};
use serde_json::json;

/// Serve `satellite` on a background thread and return its base URL.
fn spawn(satellite: Satellite) -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_satellite::run(listener, satellite).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn config(base_url: &str) -> SessionConfig {
    SessionConfig::new(base_url, "admin", "changeme")
}

fn seeded() -> Satellite {
    Satellite::new("admin", "changeme")
        .with_resource(
            "locations",
            Resource::new(2, "Default Location")
                .parameter("ntp_server", "pool.ntp.org")
                .parameter("timezone", "UTC"),
        )
        .with_resource("locations", Resource::new(0, "orphan").without_id())
        .with_resource("locations", Resource::new(5, "Berlin").without_parameters())
}

#[test]
fn collects_parameters_over_http() {
    let satellite = seeded();
    let base_url = spawn(satellite.clone());

    let result = fetch_parameters(config(&base_url), "locations").unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "Default Location": [
                {"name": "ntp_server", "value": "pool.ntp.org"},
                {"name": "timezone", "value": "UTC"}
            ],
            "Berlin": []
        })
    );
    assert_eq!(
        satellite.hits(),
        vec![
            "/api/v2/status",
            "/api/v2/locations",
            "/api/v2/locations/2",
            "/api/v2/locations/5",
        ]
    );
}

#[test]
fn duplicate_names_keep_last_over_http() {
    let satellite = Satellite::new("admin", "changeme")
        .with_resource("hostgroups", Resource::new(1, "x").parameter("a", "1"))
        .with_resource("hostgroups", Resource::new(2, "x").parameter("b", "2"));
    let base_url = spawn(satellite);

    let result = fetch_parameters(config(&base_url), "hostgroups").unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result["x"], vec![ParameterEntry::new("b", "2")]);
}

#[test]
fn bad_credentials_fail_establish() {
    let base_url = spawn(seeded());
    let mut session = Session::new(SessionConfig::new(&base_url, "admin", "wrong"));

    let err = session.establish().unwrap_err();
    assert_eq!(err.kind(), FailureKind::AuthenticationOrAvailability);
    assert!(err.to_string().contains(&format!("{base_url}/api/v2/status")));
    assert!(err.to_string().contains("Unable to authenticate"));
    assert!(!err.to_string().contains("wrong"));
    assert!(!session.is_established());
}

#[test]
fn unreachable_server_is_connection_failure() {
    // Bind then drop to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let base_url = format!("http://127.0.0.1:{port}");

    let err = fetch_parameters(config(&base_url), "locations").unwrap_err();
    assert_eq!(err.kind(), FailureKind::Connection);
}

#[test]
fn unknown_endpoint_is_remote_request_failure() {
    let base_url = spawn(seeded());
    let mut session = Session::new(config(&base_url));
    session.establish().unwrap();

    let err = Aggregator::new(&mut session, "domains")
        .fetch_parameters()
        .unwrap_err();

    match err {
        SatelliteError::RemoteRequestFailure { url, .. } => {
            assert_eq!(url, format!("{base_url}/api/v2/domains"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!session.is_established());
}

#[test]
fn detail_failure_stops_aggregation() {
    let satellite = Satellite::new("admin", "changeme")
        .with_resource("locations", Resource::new(1, "a"))
        .with_resource("locations", Resource::new(2, "b"))
        .with_resource("locations", Resource::new(3, "c"))
        .failing("/api/v2/locations/2");
    let base_url = spawn(satellite.clone());

    let err = fetch_parameters(config(&base_url), "locations").unwrap_err();
    assert_eq!(err.kind(), FailureKind::RemoteRequest);
    assert!(err.to_string().contains("HTTP 500"));
    assert!(!satellite.hits().contains(&"/api/v2/locations/3".to_string()));
}

#[test]
fn session_can_be_reestablished_after_disconnect() {
    let base_url = spawn(seeded());
    let mut session = Session::new(config(&base_url));

    session.establish().unwrap();
    session.disconnect();
    session.disconnect();
    session.establish().unwrap();

    let result = Aggregator::new(&mut session, "locations")
        .fetch_parameters()
        .unwrap();
    assert_eq!(result.len(), 2);
}
