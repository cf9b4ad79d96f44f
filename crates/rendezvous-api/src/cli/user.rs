//! User account CLI subcommands.

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use dialoguer::Password;

use rendezvous_types::user::RegisterUserRequest;

use crate::state::AppState;

/// User subcommands.
#[derive(Subcommand)]
pub enum UserCommand {
    /// Create an account (prompts for the password).
    Create {
        /// Email address of the new account.
        email: String,

        /// Given name.
        #[arg(long)]
        first_name: Option<String>,

        /// Family name.
        #[arg(long)]
        last_name: Option<String>,
    },
}

/// Handle a user subcommand.
pub async fn handle_user_command(cmd: UserCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        UserCommand::Create {
            email,
            first_name,
            last_name,
        } => create_user(state, email, first_name, last_name, json).await,
    }
}

async fn create_user(
    state: &AppState,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    json: bool,
) -> Result<()> {
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .context("Failed to read password")?;

    let user = state
        .user_service
        .register(RegisterUserRequest {
            email,
            password,
            first_name,
            last_name,
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        println!();
        println!(
            "  {} Created user {} ({})",
            style("ok").green(),
            style(&user.email).cyan(),
            style(user.id).dim(),
        );
        println!(
            "  Issue a token with: {}",
            style(format!("rdv token issue {}", user.email)).yellow()
        );
        println!();
    }

    Ok(())
}
