//! Structured logging initialization.
//!
//! # Responsibilities
//! - Install the tracing subscriber once at startup
//! - Respect `RUST_LOG` when set, fall back to the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins when present; otherwise the configured level applies to
/// this crate and tower-http's request traces.
pub fn init(config: &ObservabilityConfig) {
    let default_filter = format!(
        "lambda_host={level},tower_http={level}",
        level = config.log_level
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
