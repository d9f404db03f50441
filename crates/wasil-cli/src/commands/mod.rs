//! CLI command definitions and dispatch.

pub mod admin;
pub mod catalog;
pub mod dispatcher;
pub mod migrate;
pub mod request;
pub mod serve;

use clap::{Parser, Subcommand};

use wasil_api::AppState;
use wasil_core::config::AppConfig;
use wasil_core::error::AppError;
use wasil_core::types::UserId;
use wasil_database::Stores;
use wasil_entity::user::UserRole;
use wasil_service::RequestContext;

use crate::output::OutputFormat;

/// Wasil: concierge requests for families abroad
#[derive(Debug, Parser)]
#[command(name = "wasil", version, about, long_about = None)]
pub struct Cli {
    /// Directory holding `default.toml` and environment overlays
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Environment overlay to apply
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Wasil server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Administrator accounts
    Admin(admin::AdminArgs),
    /// Dispatcher directory
    Dispatcher(dispatcher::DispatcherArgs),
    /// Service requests
    Request(request::RequestArgs),
    /// Service catalog
    Catalog(catalog::CatalogArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = self.load_config()?;
        match &self.command {
            Commands::Serve(args) => serve::execute(args, config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
            Commands::Admin(args) => admin::execute(args, config).await,
            Commands::Dispatcher(args) => dispatcher::execute(args, config, self.format).await,
            Commands::Request(args) => request::execute(args, config, self.format).await,
            Commands::Catalog(args) => catalog::execute(args, &config, self.format),
        }
    }

    fn load_config(&self) -> Result<AppConfig, AppError> {
        let config = AppConfig::load_from(&self.config, &self.env)?;
        config.validate()?;
        Ok(config)
    }
}

/// Open the configured store and wire the services.
pub async fn open_state(config: AppConfig) -> Result<AppState, AppError> {
    let (stores, db_pool) = Stores::open(&config.database).await?;
    AppState::build(config, stores, db_pool).await
}

/// Caller identity used for operations run from the command line.
pub fn operations_context() -> RequestContext {
    RequestContext::new(UserId::from_uuid(uuid::Uuid::nil()), UserRole::Admin, "Operations")
}
