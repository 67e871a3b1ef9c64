use mock_satellite::{Resource, Satellite};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let username = std::env::var("MOCK_USERNAME").unwrap_or_else(|_| "admin".to_string());
    let password = std::env::var("MOCK_PASSWORD").unwrap_or_else(|_| "changeme".to_string());

    let satellite = Satellite::new(&username, &password)
        .with_resource(
            "locations",
            Resource::new(2, "Default Location")
                .parameter("ntp_server", "pool.ntp.org")
                .parameter("timezone", "UTC"),
        )
        .with_resource("locations", Resource::new(5, "Berlin").parameter("timezone", "CET"))
        .with_resource(
            "hostgroups",
            Resource::new(1, "base").parameter("kickstart_repo", "rhel-9"),
        )
        .with_resource("organizations", Resource::new(1, "Default Organization"));

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");
    mock_satellite::run(listener, satellite).await
}
