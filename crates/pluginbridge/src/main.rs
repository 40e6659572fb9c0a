use clap::Parser;

use pluginbridge::cli::{self, Cli};
use pluginbridge::infra::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    pluginbridge::init(&config.logging)?;

    cli::run(cli, &config)
}
