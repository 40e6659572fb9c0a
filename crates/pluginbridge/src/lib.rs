pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

pub use app::article::ArticleFacade;
pub use app::editor::EditorFacade;
pub use infra::host::{HostTransport, PluginHost};

/// Install logging from the given configuration.
pub fn init(config: &infra::config::LoggingConfig) -> anyhow::Result<()> {
    infra::logging::init(config)
}
