//! HTTP server command
//!
//! Connects the pool described by the resolved settings and serves the dish
//! API until ctrl-c or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use what2eat_server::{run_server, AppConfig, AppState, Database, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, config: Arc<AppConfig>) -> Result<()> {
    tracing::info!(
        app = %config.settings().app_name,
        database = %config.connection().redacted_url(),
        "Starting server on {}",
        args.bind
    );

    let db = Database::connect(&config)
        .await
        .context("Failed to create database pool")?;

    let server_config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(AppState::new(db, config), server_config)
        .await
        .context("Server error")?;

    Ok(())
}
