//! Wasil Server: concierge service requests for families abroad.
//!
//! Main entry point: loads configuration, initializes logging, opens the
//! document store, and starts the HTTP server.

use tracing_subscriber::{EnvFilter, fmt};

use wasil_core::config::{AppConfig, LogFormat};
use wasil_core::error::AppError;
use wasil_database::Stores;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from `config/` and the environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let dir = std::env::var("WASIL_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let env = std::env::var("WASIL_ENV").unwrap_or_else(|_| "development".to_string());

    let config = AppConfig::load_from(&dir, &env)?;
    config.validate()?;
    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Wasil v{}", env!("CARGO_PKG_VERSION"));

    let (stores, db_pool) = Stores::open(&config.database).await?;
    wasil_api::run_server(config, stores, db_pool).await
}
