//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional TOML file
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: PORT, HTTP_TIMEOUT, USE_SSL, DB_*)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → shared with all subsystems at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults so the service runs with zero configuration
//! - Environment variables win over the file, matching deployment practice

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, DatabaseConfig, ObservabilityConfig, ServerConfig, TlsConfig};
