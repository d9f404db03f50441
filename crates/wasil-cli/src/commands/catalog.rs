//! Service catalog commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use wasil_core::config::AppConfig;
use wasil_core::error::AppError;
use wasil_entity::catalog::Category;
use wasil_service::CatalogService;

use crate::output::{self, OutputFormat};

/// Arguments for catalog commands
#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

/// Catalog subcommands
#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// List offerings with customer prices
    List {
        /// Only this category (e.g. power_solar)
        #[arg(short, long)]
        category: Option<Category>,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct OfferingRow {
    id: String,
    category: String,
    title: String,
    price: String,
    priority: String,
}

/// Execute catalog commands
pub fn execute(args: &CatalogArgs, config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let catalog = CatalogService::with_defaults(config.lifecycle.markup_percent);

    match &args.command {
        CatalogCommand::List { category } => {
            let rows: Vec<OfferingRow> = catalog
                .list(*category)
                .into_iter()
                .map(|e| OfferingRow {
                    id: e.id.to_string(),
                    category: e.category.label().to_string(),
                    title: e.title,
                    price: e.price.to_string(),
                    priority: format!("{:?}", e.priority),
                })
                .collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
