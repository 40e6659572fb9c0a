use std::path::PathBuf;
use std::process::Command;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo nextest with default configuration
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Regenerate the host message catalog document
    Catalog {
        #[arg(long, default_value = "docs/host-messages.md")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, release } => run_nextest(profile, release)?,
        Commands::Catalog { output } => write_catalog(output)?,
    }
    Ok(())
}

fn run_nextest(profile: Option<String>, release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("nextest").arg("run").arg("--workspace");
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if release {
        cmd.arg("--release");
    }
    run(cmd, "cargo nextest run")
}

fn write_catalog(output: PathBuf) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["run", "--quiet", "-p", "pluginbridge", "--", "catalog", "--format", "markdown", "--output"])
        .arg(output);
    run(cmd, "pluginbridge catalog")
}

fn run(mut cmd: Command, label: &str) -> Result<()> {
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("{label} failed");
    }
    Ok(())
}
