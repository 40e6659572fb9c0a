//! Infrastructure adapters for the host seam, config, and logging.

pub mod config;
pub mod host;
pub mod logging;
pub mod recording;
