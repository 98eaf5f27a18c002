//! Tracing setup for the what2eat CLI
//!
//! Usage:
//!   what2eat --debug serve            # Debug logging to console
//!   RUST_LOG=what2eat_server=debug    # Fine-grained log control
//!
//! `echo = true` in the settings turns on SQL statement logging; those
//! records arrive through the `log` facade and need `sqlx=info` or lower
//! in the filter to show up.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets the default filter to debug)
    pub debug: bool,
}

/// Initialize console tracing. `RUST_LOG` wins over the default level.
pub fn init(config: &TracingConfig) -> Result<()> {
    let default_level = if config.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
