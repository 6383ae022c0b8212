//! Request routing and lifecycle engine.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, raw URL, headers, body stream)
//!     → lifecycle.rs (receipt logging, OPTIONS branch, timeout)
//!     → matcher.rs (normalize path, resolve route, extract params/query)
//!     → context.rs (per-request bundle handed to the handler)
//!     → registered handler produces the response
//!
//! Route registration (at startup):
//!     controllers call registry.get/post/put/delete(pattern, handler)
//!     → RouteRegistry (insertion-ordered Vec)
//!     → frozen behind Arc, shared read-only with every request
//! ```
//!
//! # Design Decisions
//! - Routes registered once at startup, immutable at runtime (no locks)
//! - First registered structural match wins; no precedence beyond order
//! - Per-segment comparison instead of regex; `:name` segments capture
//! - One timeout per routed request, racing body collection and dispatch
//! - The response slot is single-assignment; the race loser is discarded

pub mod context;
pub mod lifecycle;
pub mod matcher;
pub mod preflight;
pub mod registry;

pub use context::RequestContext;
pub use lifecycle::Engine;
pub use registry::{handler, Route, RouteHandler, RouteRegistry};
