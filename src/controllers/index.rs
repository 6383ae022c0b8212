//! Root greeting endpoint.

use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::engine::registry::handler;
use crate::engine::RouteRegistry;

pub fn register(registry: &mut RouteRegistry) {
    registry.get(
        "/",
        handler(|_ctx| async { (StatusCode::OK, "Hello World from lambda-host!").into_response() }),
    );
}
