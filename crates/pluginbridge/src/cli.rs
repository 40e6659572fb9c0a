//! Command line interface.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::app::catalog::{CatalogFormat, CatalogOptions, CatalogRenderer};
use crate::app::messages::Facade;
use crate::infra::config::Config;

#[derive(Debug, Parser)]
#[command(name = "pluginbridge", author, version, about = "Host editor plugin bridge tooling", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the host message catalog
    Catalog {
        #[arg(long, value_enum)]
        format: Option<CatalogFormat>,
        /// Only list messages sent by one facade
        #[arg(long, value_enum)]
        facade: Option<FacadeArg>,
        /// Template name or path
        #[arg(long)]
        template: Option<String>,
        /// Write the catalog to a file as well
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FacadeArg {
    Editor,
    Article,
}

impl From<FacadeArg> for Facade {
    fn from(value: FacadeArg) -> Self {
        match value {
            FacadeArg::Editor => Facade::Editor,
            FacadeArg::Article => Facade::Article,
        }
    }
}

/// Execute a parsed command against the loaded configuration.
pub fn run(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Commands::Catalog {
            format,
            facade,
            template,
            output,
        } => {
            let mut options = CatalogOptions::from_config(config);
            if let Some(format) = format {
                options.format = format;
            }
            if template.is_some() {
                options.template = template;
            }
            options.facade = facade.map(Facade::from);
            options.output_path = output;

            let rendered = CatalogRenderer::new()?.export(&options)?;
            tracing::debug!(format = options.format.as_str(), "catalog rendered");
            if options.output_path.is_none() {
                println!("{rendered}");
            }
        }
        Commands::Config => print!("{}", config.to_toml()?),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "pluginbridge", &mut io::stdout());
        }
    }
    Ok(())
}
