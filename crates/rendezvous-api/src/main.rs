//! `rdv` -- the Rendezvous command-line interface and REST API server.

mod cli;
mod http;
mod state;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use console::style;

use rendezvous_observe::tracing_setup;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info,rendezvous_api=debug,rendezvous_core=debug,rendezvous_infra=debug",
        _ => "trace",
    };
    if let Err(e) = tracing_setup::init_tracing(filter, tracing_setup::otel_requested()) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    // Completions need no state.
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(*shell, &mut cmd, "rdv", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    let result = match cli.command {
        Commands::Serve { port, host } => serve(state, host, port, cli.quiet).await,
        Commands::User { action } => {
            cli::user::handle_user_command(action, &state, cli.json).await
        }
        Commands::Token { action } => {
            cli::token::handle_token_command(action, &state, cli.json).await
        }
        Commands::Conversations { email } => {
            cli::conversations::list_conversations(&state, &email, cli.json).await
        }
        Commands::Completions { .. } => Ok(()),
    };

    tracing_setup::shutdown_tracing();
    result
}

/// Bind the listener and serve the router until SIGINT/SIGTERM.
async fn serve(state: AppState, host: Option<String>, port: Option<u16>, quiet: bool) -> Result<()> {
    let host = host.unwrap_or_else(|| state.config.server.host.clone());
    let port = port.unwrap_or(state.config.server.port);
    let addr = format!("{host}:{port}");

    let router = http::router::build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    if !quiet {
        println!();
        println!(
            "  {} Rendezvous API listening on {}",
            style("▶").green().bold(),
            style(format!("http://{addr}")).cyan()
        );
        println!("  {} /api/v1 (bearer token required)", style("•").dim());
        println!("  {} /health", style("•").dim());
        println!();
    }
    tracing::info!(%addr, "server started");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolve when the process receives Ctrl-C or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
