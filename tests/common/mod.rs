//! Shared helpers for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;

use lambda_host::engine::Engine;
use lambda_host::RouteRegistry;

/// Serve the given registry on an ephemeral port and return the address.
pub async fn start_engine(registry: RouteRegistry, timeout: Duration) -> SocketAddr {
    let engine = Engine::new(registry, timeout);
    let app = engine.into_router();

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("serve");
    });

    addr
}
