//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - TLS toggle must come with certificate/key material
//! - Validate value ranges (timeout > 0, non-empty database settings)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::AppConfig;

/// A single semantic configuration error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `use_tls` is set but no certificate/key material was provided.
    MissingTlsMaterial,
    /// TLS material references an empty path.
    EmptyTlsPath(&'static str),
    /// The request timeout window must be positive.
    ZeroRequestTimeout,
    /// A required database setting is empty.
    EmptyDatabaseSetting(&'static str),
    /// The pool must allow at least one connection.
    ZeroPoolSize,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingTlsMaterial => {
                write!(f, "use_tls is enabled but no certificate/key material is configured")
            }
            ValidationError::EmptyTlsPath(field) => write!(f, "TLS {} path is empty", field),
            ValidationError::ZeroRequestTimeout => write!(f, "request_timeout_ms must be > 0"),
            ValidationError::EmptyDatabaseSetting(field) => {
                write!(f, "database {} must not be empty", field)
            }
            ValidationError::ZeroPoolSize => write!(f, "database max_connections must be > 0"),
        }
    }
}

/// Validate a loaded configuration, collecting every error.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.server.use_tls {
        match &config.server.tls {
            None => errors.push(ValidationError::MissingTlsMaterial),
            Some(tls) => {
                if tls.cert_path.is_empty() {
                    errors.push(ValidationError::EmptyTlsPath("certificate"));
                }
                if tls.key_path.is_empty() {
                    errors.push(ValidationError::EmptyTlsPath("key"));
                }
            }
        }
    }

    if config.database.user.is_empty() {
        errors.push(ValidationError::EmptyDatabaseSetting("user"));
    }
    if config.database.dbname.is_empty() {
        errors.push(ValidationError::EmptyDatabaseSetting("dbname"));
    }
    if config.database.host.is_empty() {
        errors.push(ValidationError::EmptyDatabaseSetting("host"));
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::ZeroPoolSize);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TlsConfig;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn tls_without_material_is_fatal() {
        let mut config = AppConfig::default();
        config.server.use_tls = true;

        let errors = validate_config(&config).expect_err("must fail");
        assert!(errors.contains(&ValidationError::MissingTlsMaterial));
    }

    #[test]
    fn tls_with_material_passes() {
        let mut config = AppConfig::default();
        config.server.use_tls = true;
        config.server.tls = Some(TlsConfig {
            cert_path: "/etc/ssl/host.pem".to_string(),
            key_path: "/etc/ssl/host.key".to_string(),
        });

        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = AppConfig::default();
        config.server.use_tls = true;
        config.server.request_timeout_ms = 0;
        config.database.host.clear();

        let errors = validate_config(&config).expect_err("must fail");
        assert_eq!(errors.len(), 3);
    }
}
