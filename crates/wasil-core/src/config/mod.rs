//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod database;
pub mod directory;
pub mod lifecycle;
pub mod logging;
pub mod realtime;
pub mod reassurance;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseBackend, DatabaseConfig};
pub use self::directory::DirectoryConfig;
pub use self::lifecycle::{AssignmentStrategy, LifecycleConfig};
pub use self::logging::{LogFormat, LoggingConfig};
pub use self::realtime::RealtimeConfig;
pub use self::reassurance::ReassuranceConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default = "DatabaseConfig::memory")]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Media storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Real-time change feed settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Pricing and lifecycle rules.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,
    /// Reassurance text generation.
    #[serde(default)]
    pub reassurance: ReassuranceConfig,
    /// Dispatcher directory cache.
    #[serde(default)]
    pub directory: DirectoryConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::memory()
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `WASIL__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("WASIL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.backend == DatabaseBackend::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required for the postgres backend",
            ));
        }
        if self.lifecycle.cancellation_fee_percent > 100 {
            return Err(AppError::configuration(
                "lifecycle.cancellation_fee_percent must be between 0 and 100",
            ));
        }
        if self.auth.jwt_secret.len() < 16 {
            return Err(AppError::configuration(
                "auth.jwt_secret must be at least 16 characters",
            ));
        }
        if self.reassurance.fallback_message.trim().is_empty() {
            return Err(AppError::configuration(
                "reassurance.fallback_message must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid_for_memory_backend() {
        let config = AppConfig::default();
        assert_eq!(config.database.backend, DatabaseBackend::Memory);
        assert_eq!(config.lifecycle.markup_percent, 50);
        assert_eq!(config.lifecycle.cancellation_fee_percent, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_postgres_requires_url() {
        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Postgres;
        assert!(config.validate().is_err());
        config.database.url = "postgres://localhost/wasil".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_fallback_message_is_rejected() {
        let mut config = AppConfig::default();
        config.reassurance.fallback_message = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("fallback_message"));
    }

    #[test]
    fn test_load_without_files_uses_defaults() {
        let config = AppConfig::load_from("does-not-exist", "test").expect("load");
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.lifecycle.assignment_strategy,
            AssignmentStrategy::Random
        );
    }
}
