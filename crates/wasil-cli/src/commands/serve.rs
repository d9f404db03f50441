//! Start the Wasil server.

use clap::Args;

use wasil_core::config::{AppConfig, DatabaseBackend};
use wasil_core::error::AppError;
use wasil_database::Stores;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Use the in-memory store regardless of configuration
    #[arg(long)]
    pub memory: bool,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if args.memory {
        config.database.backend = DatabaseBackend::Memory;
    }

    println!("Starting Wasil server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);

    let (stores, db_pool) = Stores::open(&config.database).await?;
    wasil_api::run_server(config, stores, db_pool).await
}
