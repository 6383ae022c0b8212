//! Route registration.
//!
//! # Responsibilities
//! - Store (method, path pattern, handler) triples
//! - Preserve insertion order (the only precedence rule)
//!
//! # Design Decisions
//! - No validation of duplicates or pattern well-formedness; overlapping
//!   patterns are resolved purely by registration order at match time
//! - Handlers are type-erased async callbacks shared via Arc

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::http::Method;
use axum::response::Response;

use crate::engine::context::RequestContext;

/// Boxed future returned by a route handler.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// Type-erased async route handler.
pub type RouteHandler = Arc<dyn Fn(RequestContext) -> HandlerFuture + Send + Sync>;

/// Wrap an async function or closure into a [`RouteHandler`].
pub fn handler<F, Fut>(f: F) -> RouteHandler
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    Arc::new(move |ctx| Box::pin(f(ctx)))
}

/// A registered route.
#[derive(Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: String,
    pub handler: RouteHandler,
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// Insertion-ordered route table.
///
/// Populated by the controllers during startup, then frozen behind an `Arc`
/// and read concurrently by every in-flight request.
#[derive(Default)]
pub struct RouteRegistry {
    routes: Vec<Route>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Registration never fails.
    pub fn register(&mut self, method: Method, pattern: impl Into<String>, handler: RouteHandler) {
        self.routes.push(Route {
            method,
            pattern: pattern.into(),
            handler,
        });
    }

    pub fn get(&mut self, pattern: impl Into<String>, handler: RouteHandler) {
        self.register(Method::GET, pattern, handler);
    }

    pub fn post(&mut self, pattern: impl Into<String>, handler: RouteHandler) {
        self.register(Method::POST, pattern, handler);
    }

    pub fn put(&mut self, pattern: impl Into<String>, handler: RouteHandler) {
        self.register(Method::PUT, pattern, handler);
    }

    pub fn delete(&mut self, pattern: impl Into<String>, handler: RouteHandler) {
        self.register(Method::DELETE, pattern, handler);
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    fn noop() -> RouteHandler {
        handler(|_ctx| async { StatusCode::OK.into_response() })
    }

    #[test]
    fn registration_preserves_insertion_order() {
        let mut registry = RouteRegistry::new();
        registry.get("/a", noop());
        registry.post("/b", noop());
        registry.put("/c", noop());
        registry.delete("/d", noop());

        let patterns: Vec<&str> = registry.routes().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["/a", "/b", "/c", "/d"]);
        assert_eq!(registry.routes()[1].method, Method::POST);
    }

    #[test]
    fn duplicate_registration_is_not_rejected() {
        let mut registry = RouteRegistry::new();
        registry.get("/a", noop());
        registry.get("/a", noop());
        assert_eq!(registry.len(), 2);
    }
}
