//! Per-request context handed to route handlers.

use std::collections::HashMap;
use std::net::SocketAddr;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, Uri};
use serde::de::DeserializeOwned;

/// The per-request bundle of method, URL, headers, body, params and query.
///
/// Created by the lifecycle coordinator once routing and body collection
/// succeed, owned exclusively by that request's handler, dropped when the
/// response is finalized.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub remote_addr: SocketAddr,
    /// Raw body bytes, accumulated in arrival order.
    pub body: Bytes,
    /// Parsed body, present when the request declared `application/json`,
    /// was not a GET and carried a non-empty body.
    pub json: Option<serde_json::Value>,
    /// `:name` path parameters (keys unique).
    pub params: HashMap<String, String>,
    /// Query-string pairs (last occurrence of a duplicate key wins).
    pub query: HashMap<String, String>,
}

impl RequestContext {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Deserialize the parsed JSON body into a concrete payload type.
    pub fn body_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.json
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}
