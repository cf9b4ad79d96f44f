//! Bearer token CLI subcommands.

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;
use dialoguer::Password;

use crate::state::AppState;

/// Token subcommands.
#[derive(Subcommand)]
pub enum TokenCommand {
    /// Issue a new bearer token (prompts for the password).
    Issue {
        /// Email of the account.
        email: String,

        /// Label stored with the token.
        #[arg(long, default_value = "cli")]
        name: String,
    },
}

/// Handle a token subcommand.
pub async fn handle_token_command(cmd: TokenCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        TokenCommand::Issue { email, name } => issue_token(state, &email, &name, json).await,
    }
}

/// Authenticate and print a freshly issued token. It is shown only once.
async fn issue_token(state: &AppState, email: &str, name: &str, json: bool) -> Result<()> {
    let password = Password::new()
        .with_prompt(format!("Password for {email}"))
        .interact()
        .context("Failed to read password")?;

    let user = state.user_service.authenticate(email, &password).await?;
    let token = state.user_service.issue_token(&user, name).await?;

    if json {
        let result = serde_json::json!({
            "email": user.email,
            "name": name,
            "token": token,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!("  {} Token '{}' issued", style("ok").green(), style(name).cyan());
        println!();
        println!("  {}", style(&token).bold());
        println!();
        println!(
            "  {}",
            style("Store it now; it cannot be shown again.").yellow()
        );
        println!();
    }

    Ok(())
}
