//! Configuration loading from disk and environment.
//!
//! # Responsibilities
//! - Parse an optional TOML file into [`AppConfig`]
//! - Apply environment-variable overrides on top
//! - Run semantic validation before the config is accepted

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::{AppConfig, TlsConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration.
///
/// Starts from defaults (or the given TOML file), then applies recognized
/// environment variables: `PORT`, `HTTP_TIMEOUT`, `USE_SSL`, `SSL_CERT`,
/// `SSL_KEY`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_HOST`, `DB_PORT`,
/// `LOG_LEVEL`.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Some(port) = env_parsed("PORT") {
        config.server.port = port;
    }
    if let Some(timeout) = env_parsed("HTTP_TIMEOUT") {
        config.server.request_timeout_ms = timeout;
    }
    if let Ok(value) = env::var("USE_SSL") {
        config.server.use_tls = value == "true";
    }
    if let (Ok(cert_path), Ok(key_path)) = (env::var("SSL_CERT"), env::var("SSL_KEY")) {
        config.server.tls = Some(TlsConfig { cert_path, key_path });
    }

    if let Ok(user) = env::var("DB_USER") {
        config.database.user = user;
    }
    if let Ok(password) = env::var("DB_PASSWORD") {
        config.database.password = password;
    }
    if let Ok(dbname) = env::var("DB_NAME") {
        config.database.dbname = dbname;
    }
    if let Ok(host) = env::var("DB_HOST") {
        config.database.host = host;
    }
    if let Some(port) = env_parsed("DB_PORT") {
        config.database.port = port;
    }

    if let Ok(level) = env::var("LOG_LEVEL") {
        config.observability.log_level = level;
    }
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.request_timeout_ms, 5000);
        assert!(!config.server.use_tls);
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 5432);
    }

    #[test]
    fn toml_fields_override_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8088
            request_timeout_ms = 250

            [database]
            host = "db.internal"
            "#,
        )
        .expect("parse");

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.request_timeout_ms, 250);
        assert_eq!(config.database.host, "db.internal");
        // untouched sections keep their defaults
        assert_eq!(config.database.port, 5432);
    }
}
