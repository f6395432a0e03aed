use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

use commands::actual::{self, ActualArgs};
use commands::badge::{self, BadgeArgs};
use commands::doctor;
use commands::plan::{self, PlanArgs};

#[derive(Parser, Debug)]
#[command(name = "impact", version, about = "Environmental footprint of infrastructure changes")]
struct Cli {
    /// Configuration file (YAML, or TOML by extension). Defaults to
    /// ./impact.yaml when present.
    #[arg(long, global = true, env = "IMPACT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the monthly footprint of a Terraform plan.
    Plan(PlanArgs),

    /// Query the measured footprint of an organization.
    Actual(ActualArgs),

    /// Write a Shields.io endpoint badge from a JSON plan report.
    Badge(BadgeArgs),

    /// Print configuration, credential and API status as JSON.
    Doctor,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;

    // RUST_LOG wins over the configured level. Logs go to stderr so report
    // output on stdout stays machine-readable.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Plan(args) => plan::run(args, &config).await?,
        Command::Actual(args) => actual::run(args, &config).await?,
        Command::Badge(args) => badge::run(args)?,
        Command::Doctor => doctor::run(&config).await?,
    }

    Ok(())
}
