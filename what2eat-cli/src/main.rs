//! what2eat CLI - dish catalogue server and maintenance commands
//!
//! - `serve`: run the HTTP API
//! - `init-db`: create missing tables and exit
//! - `config show`: print the resolved settings with secrets redacted
//!
//! Settings come from built-in defaults, then an optional TOML file
//! (`--config`), then `.env` and the process environment.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use what2eat_server::AppConfig;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "what2eat",
    author,
    version,
    about = "Dish catalogue HTTP backend over PostgreSQL or SQLite"
)]
struct Cli {
    /// TOML settings file (environment variables still take precedence)
    #[arg(long, short = 'c', global = true, env = "WHAT2EAT_CONFIG")]
    config: Option<PathBuf>,

    /// Debug logging (same as `debug = true` in settings)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Create missing tables, then exit
    InitDb,
    /// Inspect resolved configuration
    Config(commands::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Missing .env is fine
    dotenvy::dotenv().ok();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load settings")?;

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug || config.settings().debug,
    })?;

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, Arc::new(config)).await?,
        Commands::InitDb => commands::run_init_db(&config).await?,
        Commands::Config(args) => commands::run_config(args, &config)?,
    }
    Ok(())
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
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["what2eat", "serve", "--debug", "--bind", "0.0.0.0:9000"])
            .unwrap();
        assert!(cli.debug);
        match cli.command {
            Commands::Serve(args) => assert_eq!(args.bind.port(), 9000),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
