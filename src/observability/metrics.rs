//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lambda_host_requests_total` (counter): requests by method, status
//! - `lambda_host_request_duration_seconds` (histogram): latency distribution
//!
//! # Design Decisions
//! - Labels limited to method and status code (bounded cardinality)
//! - Recording is a no-op until an exporter is installed, so tests and
//!   metrics-disabled deployments pay nothing

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(err) => tracing::error!(error = %err, "failed to install metrics exporter"),
    }
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, started: Instant) {
    metrics::counter!(
        "lambda_host_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "lambda_host_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(started.elapsed().as_secs_f64());
}
