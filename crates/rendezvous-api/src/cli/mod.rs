//! CLI command definitions and dispatch for the `rdv` binary.
//!
//! Uses clap derive macros for argument parsing. Account commands follow a
//! noun-verb pattern (e.g., `rdv user create`, `rdv token issue`).

pub mod conversations;
pub mod token;
pub mod user;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with an assistant that remembers the conversation.
#[derive(Parser)]
#[command(name = "rdv", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `[server] port` in config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `[server] host` in config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Manage user accounts.
    User {
        #[command(subcommand)]
        action: user::UserCommand,
    },

    /// Manage bearer tokens.
    Token {
        #[command(subcommand)]
        action: token::TokenCommand,
    },

    /// List a user's conversations.
    Conversations {
        /// Email of the account.
        email: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_flags_are_optional() {
        let cli = Cli::try_parse_from(["rdv", "serve"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve {
                port: None,
                host: None
            }
        ));

        let cli = Cli::try_parse_from(["rdv", "-vv", "serve", "--port", "8080"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080), .. }));
    }

    #[test]
    fn token_issue_parses_name() {
        let cli =
            Cli::try_parse_from(["rdv", "token", "issue", "ada@example.com", "--name", "laptop"])
                .unwrap();
        match cli.command {
            Commands::Token {
                action: token::TokenCommand::Issue { email, name },
            } => {
                assert_eq!(email, "ada@example.com");
                assert_eq!(name, "laptop");
            }
            _ => panic!("expected token issue"),
        }
    }
}
