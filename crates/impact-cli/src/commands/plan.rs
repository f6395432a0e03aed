//! `impact plan` command implementation.
//!
//! Reads planned changes (plan file or `terraform show -json`), loads the
//! product catalog (snapshot or public API), estimates, and prints the
//! report on stdout.

use anyhow::{Context, Result, bail};
use clap::Args;
use impact_catalog::{ProductLister, SnapshotCatalog};
use impact_core::{DefaultsConfig, ImpactConfig, OutputFormat, ResourceChange, SortKey};
use std::path::PathBuf;
use std::time::Duration;

use crate::render;

/// Upper bound for `terraform show -json`.
const TERRAFORM_SHOW_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Plan JSON produced by `terraform show -json <planfile>`.
    #[arg(long, conflicts_with = "from_terraform", required_unless_present = "from_terraform")]
    pub file: Option<PathBuf>,

    /// Run `terraform show -json` in the current directory.
    #[arg(long, default_value_t = false)]
    pub from_terraform: bool,

    /// Catalog snapshot to use instead of the public API.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Output format: table or json. Overrides `output.format`.
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Table row order: co2 or water. Overrides `output.sort`.
    #[arg(long)]
    pub sort: Option<SortKey>,
}

pub async fn run(args: PlanArgs, config: &ImpactConfig) -> Result<()> {
    let mut changes = match &args.file {
        Some(path) => impact_plan::parse_file(path)
            .with_context(|| format!("could not read plan file {}", path.display()))?,
        None => read_changes_from_terraform().await?,
    };
    apply_locality_defaults(&mut changes, &config.defaults);
    tracing::info!(changes = changes.len(), "Loaded planned changes");

    let lister: Box<dyn ProductLister> = match args.catalog.as_ref().or(config.catalog.snapshot_file.as_ref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Using catalog snapshot");
            Box::new(SnapshotCatalog::new(path))
        }
        None => {
            tracing::debug!(url = %config.catalog.api_base_url, "Using public catalog API");
            impact_catalog::from_config(&config.catalog).context("could not create catalog client")?
        }
    };
    let products = lister
        .list_all_products()
        .await
        .context("could not fetch catalog products")?;

    let report = impact_estimate::build(&changes, &products);

    let format = args.format.unwrap_or(config.output.format);
    let sort = args.sort.unwrap_or(config.output.sort);
    let output = match format {
        OutputFormat::Table => render::table(&report, sort),
        OutputFormat::Json => render::json(&report).context("could not encode json report")?,
    };
    println!("{output}");

    Ok(())
}

/// Fill the plan-level zone/region of changes whose plan had none.
fn apply_locality_defaults(changes: &mut [ResourceChange], defaults: &DefaultsConfig) {
    for change in changes {
        if change.zone.is_none() {
            change.zone = defaults.zone.clone();
        }
        if change.region.is_none() {
            change.region = defaults.region.clone();
        }
    }
}

async fn read_changes_from_terraform() -> Result<Vec<ResourceChange>> {
    let mut command = tokio::process::Command::new("terraform");
    command.args(["show", "-json"]).kill_on_drop(true);

    let output = tokio::time::timeout(TERRAFORM_SHOW_TIMEOUT, command.output())
        .await
        .context("could not run terraform show -json: timed out")?
        .context("could not run terraform show -json")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            bail!("could not run terraform show -json: {}", output.status);
        }
        bail!("could not run terraform show -json: {stderr}");
    }

    impact_plan::parse_bytes(&output.stdout).context("could not decode terraform show output")
}
