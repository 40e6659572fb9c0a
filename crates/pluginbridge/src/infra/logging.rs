//! Tracing subscriber setup.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::infra::config::LoggingConfig;

/// Install the global fmt subscriber, writing to stderr so command output stays clean.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)
        .map_err(|err| anyhow!("invalid log filter '{}': {err}", config.filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
