//! Per-resource controllers.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     register_all(registry, db)
//!         → index.rs / login.rs / lambdas.rs
//!         → registry.get/post/put/delete(pattern, handler)
//!
//! Serving:
//!     engine dispatch → (auth gate where wrapped) → controller handler
//!         → db operations → JSON response
//! ```
//!
//! # Design Decisions
//! - Plain registration functions per feature, no controller base type
//! - Handlers own their error mapping; persistence failures become 500

pub mod index;
pub mod lambdas;
pub mod login;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::db::{Db, DbError};
use crate::engine::RouteRegistry;

/// Register every controller's routes. Called once at startup, before the
/// registry is frozen.
pub fn register_all(registry: &mut RouteRegistry, db: Arc<Db>) {
    index::register(registry);
    login::register(registry, Arc::clone(&db));
    lambdas::register(registry, db);
}

pub(crate) fn internal_error(err: DbError) -> Response {
    tracing::error!(error = %err, "persistence operation failed");
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
