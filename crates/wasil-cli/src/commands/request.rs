//! Service request commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use uuid::Uuid;

use wasil_core::config::AppConfig;
use wasil_core::error::AppError;
use wasil_core::types::{PageRequest, RequestId};
use wasil_entity::request::RequestStatus;

use crate::output::{self, OutputFormat};

/// Arguments for request commands
#[derive(Debug, Args)]
pub struct RequestArgs {
    #[command(subcommand)]
    pub command: RequestCommand,
}

/// Request subcommands
#[derive(Debug, Subcommand)]
pub enum RequestCommand {
    /// List requests, newest first
    List {
        /// Filter by status (e.g. IN_PROGRESS)
        #[arg(short, long)]
        status: Option<RequestStatus>,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 50)]
        per_page: u64,
    },
    /// Show one request
    Show { id: Uuid },
    /// Move a request to a new status as operations
    SetStatus { id: Uuid, status: RequestStatus },
}

#[derive(Debug, Serialize, Tabled)]
struct RequestRow {
    id: String,
    title: String,
    parent: String,
    location: String,
    status: String,
    price: String,
    created_at: String,
}

/// Execute request commands
pub async fn execute(
    args: &RequestArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::open_state(config).await?;
    let ops = super::operations_context();

    match &args.command {
        RequestCommand::List {
            status,
            page,
            per_page,
        } => {
            let page = state
                .admin
                .list_requests(&ops, *status, &PageRequest::new(*page, *per_page))
                .await?;
            let rows: Vec<RequestRow> = page
                .items
                .iter()
                .map(|r| RequestRow {
                    id: r.id.to_string(),
                    title: r.title.clone(),
                    parent: r.parent_name.clone(),
                    location: r.location.label().to_string(),
                    status: r.status.to_string(),
                    price: r.price.to_string(),
                    created_at: r.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();
            output::print_list(&rows, format);
        }
        RequestCommand::Show { id } => {
            let request = state.lifecycle.get(&ops, RequestId::from_uuid(*id)).await?;
            output::print_item(&request, format);
        }
        RequestCommand::SetStatus { id, status } => {
            let request = state
                .lifecycle
                .advance(&ops, RequestId::from_uuid(*id), *status)
                .await?;
            output::print_success(&format!(
                "Request {} is now {}",
                request.id,
                request.status.label()
            ));
        }
    }

    Ok(())
}
