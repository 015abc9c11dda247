//! Shared utilities for integration testing.

use std::net::SocketAddr;

use storefront::config::ServerConfig;
use storefront::http::HttpServer;
use storefront::lifecycle::Shutdown;

/// Start a server on an ephemeral port, returning its address.
///
/// The server runs until the returned coordinator is triggered or the test
/// process exits.
pub async fn spawn_server(mut config: ServerConfig) -> (SocketAddr, Shutdown) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    (addr, shutdown)
}
