//! Listener transport selection.
//!
//! # Design Decisions
//! - Plain HTTP by default; TLS only when the toggle is set
//! - Missing or unreadable TLS material is fatal at startup, never handled
//!   per-request

pub mod tls;
