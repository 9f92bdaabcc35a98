//! Tracing setup for the studentctl CLI
//!
//! Usage:
//!   studentctl --debug ...                  # Debug logging (connections, statements)
//!   RUST_LOG=studentctl_core=info studentctl  # Fine-grained log control
//!
//! Environment variables:
//!   RUST_LOG                                # Log filter (default: warn)
//!
//! Logs go to stderr; operation reports go to stdout.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets the filter to debug unless RUST_LOG is set)
    pub debug: bool,
}

/// Initialize console tracing
pub fn init(config: &TracingConfig) -> Result<()> {
    let default_level = if config.debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
