use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use lambda_host::config::load_config;
use lambda_host::controllers;
use lambda_host::db::Db;
use lambda_host::engine::{Engine, RouteRegistry};
use lambda_host::net::tls::load_tls_config;
use lambda_host::observability::{logging, metrics};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("CONFIG_FILE").ok().map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;

    logging::init(&config.observability);

    tracing::info!("lambda-host v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        port = config.server.port,
        request_timeout_ms = config.server.request_timeout_ms,
        use_tls = config.server.use_tls,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(err) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %err,
                "failed to parse metrics address"
            ),
        }
    }

    let db = Arc::new(Db::connect(&config.database)?);

    // Routes are registered once here; the registry is frozen inside the
    // engine before the first request is accepted.
    let mut registry = RouteRegistry::new();
    controllers::register_all(&mut registry, Arc::clone(&db));
    tracing::info!(routes = registry.len(), "controllers initialized");
    for route in registry.routes() {
        tracing::debug!(method = %route.method, pattern = %route.pattern, "route registered");
    }

    let engine = Engine::new(
        registry,
        Duration::from_millis(config.server.request_timeout_ms),
    )
    .body_limit(config.server.max_body_bytes);

    let app = engine.into_router();
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    if config.server.use_tls {
        // validation guarantees material is configured when the toggle is on
        let tls = config
            .server
            .tls
            .as_ref()
            .ok_or("TLS enabled but no certificate/key material configured")?;
        let rustls = load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;

        tracing::info!(address = %addr, "HTTPS server listening");
        axum_server::bind_rustls(addr, rustls)
            .serve(app.into_make_service_with_connect_info::<SocketAddr>())
            .await?;
    } else {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(address = %listener.local_addr()?, "HTTP server listening");
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    }

    tracing::info!("shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
