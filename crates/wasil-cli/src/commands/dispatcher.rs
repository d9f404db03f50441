//! Dispatcher directory commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use wasil_auth::RegistrationInput;
use wasil_core::config::AppConfig;
use wasil_core::error::{AppError, ErrorKind};
use wasil_entity::catalog::ServiceId;
use wasil_entity::dispatcher::CreateDispatcher;
use wasil_entity::user::{SubscriptionPlan, UserRole};

use crate::output::{self, OutputFormat};

/// Arguments for dispatcher commands
#[derive(Debug, Args)]
pub struct DispatcherArgs {
    #[command(subcommand)]
    pub command: DispatcherCommand,
}

/// Dispatcher subcommands
#[derive(Debug, Subcommand)]
pub enum DispatcherCommand {
    /// List the directory
    List,
    /// Create the starter roster of dispatchers with verified accounts
    Seed {
        /// Password given to every seeded account
        #[arg(long)]
        password: String,
        /// Email domain of the seeded accounts
        #[arg(long, default_value = "wasil.app")]
        domain: String,
    },
}

#[derive(Debug, Serialize, Tabled)]
struct DispatcherRow {
    id: String,
    name: String,
    role_title: String,
    rating: String,
    active: bool,
    services: String,
}

struct Seed {
    name: &'static str,
    role_title: &'static str,
    rating: f32,
    certifications: &'static [&'static str],
    services: &'static [&'static str],
}

const ROSTER: &[Seed] = &[
    Seed {
        name: "Samer",
        role_title: "Electrical Specialist & Scout Leader",
        rating: 4.9,
        certifications: &["Certified Electrician", "First Aid Trained", "Solar Pro"],
        services: &["solar-check", "inverter-beep", "panel-clean", "leak-repair", "tank-fill"],
    },
    Seed {
        name: "Rami",
        role_title: "IT Technician & Logistics Pro",
        rating: 4.8,
        certifications: &["Cisco Certified", "Emergency Responder", "Safe Driver"],
        services: &["wifi-fix", "laptop-repair", "printer-setup", "medication", "grocery"],
    },
];

/// Execute dispatcher commands
pub async fn execute(
    args: &DispatcherArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let state = super::open_state(config).await?;

    match &args.command {
        DispatcherCommand::List => {
            let dispatchers = state.directory.list().await?;
            let rows: Vec<DispatcherRow> = dispatchers
                .iter()
                .map(|d| DispatcherRow {
                    id: d.id.to_string(),
                    name: d.name.clone(),
                    role_title: d.role_title.clone(),
                    rating: format!("{:.1}", d.rating),
                    active: d.active,
                    services: d
                        .supported_service_ids
                        .iter()
                        .map(ServiceId::as_str)
                        .collect::<Vec<_>>()
                        .join(", "),
                })
                .collect();
            output::print_list(&rows, format);
        }
        DispatcherCommand::Seed { password, domain } => {
            let ops = super::operations_context();
            for seed in ROSTER {
                let email = format!("{}@{}", seed.name.to_lowercase(), domain);
                let registration = match state
                    .identity
                    .register_with_role(
                        RegistrationInput {
                            email: email.clone(),
                            password: password.clone(),
                            name: seed.name.to_string(),
                            phone: None,
                            country: Some("Lebanon".to_string()),
                            address: None,
                            plan: SubscriptionPlan::default(),
                        },
                        UserRole::Dispatcher,
                    )
                    .await
                {
                    Ok(r) => r,
                    Err(e) if e.is(ErrorKind::Conflict) => {
                        println!("  {email} already exists, skipping");
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                let user = state
                    .identity
                    .verify_email(&registration.verification_token)
                    .await?;

                state
                    .directory
                    .register(
                        &ops,
                        CreateDispatcher {
                            id: user.id,
                            name: seed.name.to_string(),
                            role_title: seed.role_title.to_string(),
                            rating: seed.rating,
                            certifications: seed.certifications.iter().map(|c| c.to_string()).collect(),
                            photo_url: None,
                            field_photo_url: None,
                            working_video_url: None,
                            supported_service_ids: seed.services.iter().map(|s| ServiceId::new(*s)).collect(),
                        },
                    )
                    .await?;
                output::print_success(&format!("Seeded dispatcher {} <{}>", seed.name, email));
            }
        }
    }

    Ok(())
}
