//! Administrator account commands.

use clap::{Args, Subcommand};

use wasil_auth::RegistrationInput;
use wasil_core::config::AppConfig;
use wasil_core::error::AppError;
use wasil_entity::user::{SubscriptionPlan, UserRole};

use crate::output;

/// Arguments for admin commands
#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

/// Admin subcommands
#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Create a verified administrator account
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
    },
}

/// Execute admin commands
pub async fn execute(args: &AdminArgs, config: AppConfig) -> Result<(), AppError> {
    let state = super::open_state(config).await?;

    match &args.command {
        AdminCommand::Create {
            email,
            name,
            password,
        } => {
            let registration = state
                .identity
                .register_with_role(
                    RegistrationInput {
                        email: email.clone(),
                        password: password.clone(),
                        name: name.clone(),
                        phone: None,
                        country: None,
                        address: None,
                        plan: SubscriptionPlan::default(),
                    },
                    UserRole::Admin,
                )
                .await?;
            let user = state
                .identity
                .verify_email(&registration.verification_token)
                .await?;
            output::print_success(&format!("Administrator '{}' created", user.email));
            output::print_kv("ID", &user.id.to_string());
        }
    }

    Ok(())
}
