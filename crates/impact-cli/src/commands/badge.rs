//! `impact badge` command implementation.
//!
//! Turns the JSON report of `impact plan --format json` into a Shields.io
//! endpoint badge.

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const BADGE_LABEL: &str = "impact estimate/month";
pub const COLOR_AVAILABLE: &str = "2e7d32";
pub const COLOR_UNAVAILABLE: &str = "9e9e9e";
pub const CACHE_SECONDS: u32 = 3600;

#[derive(Args, Debug)]
pub struct BadgeArgs {
    /// Report written by `impact plan --format json`.
    #[arg(long)]
    pub input: PathBuf,

    /// Where to write the Shields.io endpoint JSON.
    #[arg(long)]
    pub output: PathBuf,
}

/// The parts of a plan report a badge needs.
#[derive(Debug, Default, Deserialize)]
struct ReportSummary {
    #[serde(default)]
    totals: Option<ReportTotals>,
}

#[derive(Debug, Default, Deserialize)]
struct ReportTotals {
    #[serde(default)]
    kgco2e_month: f64,
    #[serde(default)]
    m3_water_month: f64,
}

/// Shields.io endpoint payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub schema_version: u32,
    pub label: String,
    pub message: String,
    pub color: String,
    pub cache_seconds: u32,
}

pub fn run(args: BadgeArgs) -> Result<()> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("could not read impact report {}", args.input.display()))?;
    let summary: ReportSummary = serde_json::from_str(&content)
        .with_context(|| format!("could not decode impact report {}", args.input.display()))?;

    let badge = build_badge(summary.totals.as_ref());
    write_badge(&args.output, &badge)
        .with_context(|| format!("could not write badge {}", args.output.display()))?;

    tracing::info!(output = %args.output.display(), message = %badge.message, "Wrote badge");
    Ok(())
}

fn build_badge(totals: Option<&ReportTotals>) -> Badge {
    let (message, color) = match totals {
        Some(totals) => (
            format!(
                "~{} kgCO2e | ~{} m3",
                format_significant(totals.kgco2e_month),
                format_significant(totals.m3_water_month)
            ),
            COLOR_AVAILABLE,
        ),
        None => ("estimate unavailable".to_string(), COLOR_UNAVAILABLE),
    };

    Badge {
        schema_version: 1,
        label: BADGE_LABEL.to_string(),
        message,
        color: color.to_string(),
        cache_seconds: CACHE_SECONDS,
    }
}

fn write_badge(path: &Path, badge: &Badge) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut payload = serde_json::to_string_pretty(badge)?;
    payload.push('\n');
    fs::write(path, payload)?;
    Ok(())
}

/// Six significant digits, trailing zeros dropped; exponent notation below
/// 1e-4 and from 1e6 (`0.73`, `1.23457e+06`, `1e-05`).
fn format_significant(value: f64) -> String {
    const DIGITS: i32 = 6;

    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }

    let scientific = format!("{:.*e}", (DIGITS - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (DIGITS - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
