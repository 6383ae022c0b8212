//! Lambda host service library.
//!
//! A small HTTP service exposing CRUD endpoints for lambda definitions,
//! guarded by Basic authentication and backed by PostgreSQL. Requests flow
//! through a hand-built routing and lifecycle engine rather than a
//! framework router.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────┐
//!                    │                  LAMBDA HOST                     │
//!                    │                                                  │
//!   Client Request   │  ┌─────────┐    ┌──────────────┐   ┌──────────┐ │
//!   ─────────────────┼─▶│   net   │───▶│    engine    │──▶│   auth   │ │
//!                    │  │ (TLS?)  │    │ match+cycle  │   │   gate   │ │
//!                    │  └─────────┘    └──────┬───────┘   └────┬─────┘ │
//!                    │                        │                │       │
//!                    │                        ▼                ▼       │
//!   Client Response  │                 ┌──────────────┐  ┌──────────┐  │
//!   ◀────────────────┼─────────────────│ controllers  │─▶│    db    │──┼──── PostgreSQL
//!                    │                 └──────────────┘  └──────────┘  │
//!                    │                                                  │
//!                    │  ┌────────────────────────────────────────────┐ │
//!                    │  │            Cross-Cutting Concerns           │ │
//!                    │  │   ┌─────────┐        ┌───────────────┐      │ │
//!                    │  │   │ config  │        │ observability │      │ │
//!                    │  │   └─────────┘        └───────────────┘      │ │
//!                    │  └────────────────────────────────────────────┘ │
//!                    └──────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod engine;
pub mod net;

// Features
pub mod auth;
pub mod controllers;
pub mod db;

// Cross-cutting concerns
pub mod observability;

pub use config::AppConfig;
pub use engine::{Engine, RouteRegistry};
