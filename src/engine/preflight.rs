//! CORS preflight responses computed from the route table.
//!
//! # Responsibilities
//! - Normalize the OPTIONS request path
//! - Collect every route (any method) structurally matching it
//! - Advertise the distinct methods found, or 404 when none exist

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::engine::matcher::{normalize_path, structural_match};
use crate::engine::registry::RouteRegistry;

/// Answer an OPTIONS request from the route table.
///
/// Methods are listed in registration order, each at most once.
pub fn respond_preflight(registry: &RouteRegistry, raw_path: &str) -> Response {
    let path = normalize_path(raw_path);

    let mut methods: Vec<&Method> = Vec::new();
    for route in registry.routes() {
        if route.pattern == path || structural_match(&route.pattern, path) {
            if !methods.contains(&&route.method) {
                methods.push(&route.method);
            }
        }
    }

    if methods.is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }

    let allowed = methods
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    if let Ok(value) = HeaderValue::from_str(&allowed) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, value);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}
