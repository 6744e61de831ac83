//! relaybot entry point.
//!
//! Binary name: `relaybot`
//!
//! Parses CLI arguments, loads configuration from the environment and the
//! optional `relaybot.toml`, then either serves the LINE webhook or runs a
//! one-shot history command.

mod cli;
mod http;
mod state;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use relaybot_infra::config::{ServiceEnv, resolve_relay_config};
use relaybot_infra::history::build_history_repository;
use relaybot_observe::tracing_setup::{init_tracing, otel_requested, shutdown_tracing};
use relaybot_types::config::RelayConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need configuration or logging
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "relaybot", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(cli.log_filter(), otel_requested())
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let env = ServiceEnv::from_env();
    let config = resolve_relay_config(&env).await?;

    match cli.command {
        Commands::Serve { port, host } => serve(env, config, &host, port).await,

        Commands::History { command } => {
            let repository = build_history_repository(env.history_backend(), &config).await?;
            cli::history::handle_history_command(command, &repository, cli.json).await
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }
}

async fn serve(
    env: ServiceEnv,
    config: RelayConfig,
    host: &str,
    port: Option<u16>,
) -> anyhow::Result<()> {
    env.warn_missing();

    let addr = format!("{host}:{}", env.resolve_port(port));
    let state = AppState::init(env, config).await?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "relaybot listening");

    let router = http::router::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    tracing::info!("shutdown signal received");
}
