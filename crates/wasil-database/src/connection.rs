//! PostgreSQL connection pool management.

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use wasil_core::config::DatabaseConfig;
use wasil_core::error::{AppError, ErrorKind};

/// Wrapper around the sqlx PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Open a pool using the database section of the configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Persistence,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Borrow the sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Round-trip a trivial query.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Health check failed", e))
    }

    /// Close all connections.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// Hide the password part of a connection URL before logging it.
pub fn mask_password(url: &str) -> String {
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    match url.rfind('@') {
        Some(at) if at > scheme_end => match url[scheme_end..at].find(':') {
            Some(rel) => {
                let colon = scheme_end + rel;
                format!("{}:****@{}", &url[..colon], &url[at + 1..])
            }
            None => url.to_string(),
        },
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_password() {
        assert_eq!(
            mask_password("postgres://wasil:hunter2@db:5432/wasil"),
            "postgres://wasil:****@db:5432/wasil"
        );
        assert_eq!(
            mask_password("postgres://db:5432/wasil"),
            "postgres://db:5432/wasil"
        );
        assert_eq!(
            mask_password("postgres://wasil@db/wasil"),
            "postgres://wasil@db/wasil"
        );
    }
}
