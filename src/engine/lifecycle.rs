//! Request lifecycle coordination.
//!
//! # Responsibilities
//! - Log receipt and completion of every request
//! - Branch OPTIONS requests to the preflight responder
//! - Resolve the route, or finalize 404
//! - Arm the per-request timeout over body collection and dispatch
//! - Collect the body, conditionally parse JSON, or finalize 400
//! - Dispatch to the resolved handler with a populated context
//!
//! # Design Decisions
//! - One axum catch-all route funnels every request into the engine; the
//!   route table itself is this module's, not axum's
//! - Handlers run on their own task and deliver the response through a
//!   oneshot channel: the slot is single-assignment, so the timeout path and
//!   the dispatch path can race and the loser's write is suppressed
//! - A handler panic drops the channel sender and finalizes 500 instead of
//!   propagating

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, request::Parts, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;

use crate::engine::context::RequestContext;
use crate::engine::matcher;
use crate::engine::preflight::respond_preflight;
use crate::engine::registry::{RouteHandler, RouteRegistry};
use crate::observability::metrics;

const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// The request lifecycle coordinator.
///
/// Owns the frozen route table and the timeout window; cloned into every
/// in-flight request by axum's state extractor.
#[derive(Clone)]
pub struct Engine {
    registry: Arc<RouteRegistry>,
    timeout: Duration,
    body_limit: usize,
}

impl Engine {
    pub fn new(registry: RouteRegistry, timeout: Duration) -> Self {
        Self {
            registry: Arc::new(registry),
            timeout,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Build the axum router that funnels every method and path into the
    /// engine's dispatch handler.
    pub fn into_router(self) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(self)
            .layer(TraceLayer::new_for_http())
    }
}

/// Single entry point for every inbound request.
async fn dispatch(
    State(engine): State<Engine>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let raw_path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    tracing::info!(
        remote = %addr,
        method = %method,
        path = %raw_path,
        "request received"
    );

    // OPTIONS bypasses the method filter: no timeout, no dispatch.
    if method == Method::OPTIONS {
        let response = respond_preflight(&engine.registry, &raw_path);
        metrics::record_request(method.as_str(), response.status().as_u16(), started);
        return response;
    }

    let Some(route) = matcher::resolve(&engine.registry, &method, &raw_path) else {
        tracing::warn!(remote = %addr, method = %method, path = %raw_path, "no route matched");
        metrics::record_request(method.as_str(), 404, started);
        return StatusCode::NOT_FOUND.into_response();
    };

    let pattern = route.pattern.clone();
    let handler = Arc::clone(&route.handler);
    let body_limit = engine.body_limit;

    let (parts, body) = request.into_parts();
    let routed = run_route(parts, body, body_limit, addr, raw_path.clone(), pattern, handler);

    // The timeout covers body collection and dispatch; if it fires first the
    // routed future is dropped and 408 is the one finalized response.
    let response = match tokio::time::timeout(engine.timeout, routed).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                remote = %addr,
                method = %method,
                path = %raw_path,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "request timed out"
            );
            StatusCode::REQUEST_TIMEOUT.into_response()
        }
    };

    let status = response.status();
    tracing::info!(
        remote = %addr,
        method = %method,
        path = %raw_path,
        status = status.as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request finished"
    );
    metrics::record_request(method.as_str(), status.as_u16(), started);
    response
}

/// Collect and parse the body, then hand the populated context to the
/// resolved handler.
async fn run_route(
    parts: Parts,
    body: Body,
    body_limit: usize,
    addr: SocketAddr,
    raw_path: String,
    pattern: String,
    handler: RouteHandler,
) -> Response {
    // Chunks are appended in arrival order; parsing never runs before
    // end-of-input. A bodyless request yields zero bytes here.
    let bytes = match axum::body::to_bytes(body, body_limit).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(remote = %addr, error = %err, "failed to collect request body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let declared_json = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false);

    let json = if declared_json && parts.method != Method::GET && !bytes.is_empty() {
        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                // Finalizing here wins the race; the handler is never invoked
                // and the timer cannot produce a late 408.
                tracing::error!(remote = %addr, error = %err, "malformed request body");
                return StatusCode::BAD_REQUEST.into_response();
            }
        }
    } else {
        None
    };

    let ctx = RequestContext {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        remote_addr: addr,
        body: bytes,
        json,
        params: matcher::extract_params(&pattern, &raw_path),
        query: matcher::extract_query(&raw_path),
    };

    // The handler gets its own task: a slow handler keeps running after a
    // timeout but its late response hits a closed channel, and a panic drops
    // the sender instead of tearing the connection down.
    let (done_tx, done_rx) = oneshot::channel();
    tokio::spawn(async move {
        let response = (handler)(ctx).await;
        let _ = done_tx.send(response);
    });

    match done_rx.await {
        Ok(response) => response,
        Err(_) => {
            tracing::error!(remote = %addr, "handler aborted before producing a response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
