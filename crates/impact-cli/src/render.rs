//! Report rendering for the terminal.
//!
//! Table output lists totals first, then rows ordered by the chosen metric
//! (largest first, unknown values last), then the resources that could not
//! be estimated. [`actual_table`] summarizes measured footprint data.

use chrono::{DateTime, SecondsFormat, Utc};
use impact_core::SortKey;
use impact_estimate::{Report, Row};
use impact_footprint::ImpactData;
use std::cmp::Ordering;

const NOT_AVAILABLE: &str = "N/A";
const HEADERS: [&str; 5] = ["ADDRESS", "ACTION", "KGCO2E/MO", "M3/MO", "SKU"];
/// Columns right-aligned in the table.
const NUMERIC_COLUMNS: [usize; 2] = [2, 3];

pub fn format_metric(value: Option<f64>, known: bool) -> String {
    match value {
        Some(v) if known => format!("{v:.6}"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn unknown_note(unknown_rows: usize) -> Option<String> {
    (unknown_rows > 0)
        .then(|| format!("partial totals: {unknown_rows} row(s) have unknown footprint data"))
}

/// Rows ordered by `key`, descending, unknown values last. Ties keep their
/// report order.
pub fn sorted_rows(rows: &[Row], key: SortKey) -> Vec<&Row> {
    let metric = |row: &Row| match key {
        SortKey::Co2 => row.kg_co2e_month,
        SortKey::Water => row.m3_water_month,
    };

    let mut sorted: Vec<&Row> = rows.iter().collect();
    sorted.sort_by(|a, b| match (metric(a), metric(b)) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted
}

pub fn json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn table(report: &Report, sort: SortKey) -> String {
    let totals = &report.totals;
    let mut lines = vec![
        "Totals".to_string(),
        format!(
            "  kgCO2e/month: {}",
            format_metric(Some(totals.kg_co2e_month), totals.kg_co2e_known)
        ),
        format!(
            "  m3 water/month: {}",
            format_metric(Some(totals.m3_water_month), totals.m3_water_known)
        ),
    ];
    if let Some(note) = unknown_note(totals.unknown_rows) {
        lines.push(format!("  note: {note}"));
    }
    lines.push(String::new());

    let cells: Vec<[String; 5]> = sorted_rows(&report.rows, sort)
        .into_iter()
        .map(|row| {
            [
                row.address.clone(),
                row.action.clone(),
                format_metric(row.kg_co2e_month, row.kg_co2e_known()),
                format_metric(row.m3_water_month, row.m3_water_known()),
                row.sku.clone(),
            ]
        })
        .collect();
    lines.extend(align_columns(&cells));

    if !report.unsupported.is_empty() {
        lines.push(String::new());
        lines.push(format!("Unsupported resources ({}):", report.unsupported.len()));
        lines.extend(
            report
                .unsupported
                .iter()
                .map(|u| format!("  - {}: {}", u.address, u.reason)),
        );
    }

    lines.join("\n")
}

/// Measured footprint summary: period, totals, then one line per project.
pub fn actual_table(data: &ImpactData) -> String {
    let date = |value: Option<DateTime<Utc>>| {
        value.map_or_else(
            || NOT_AVAILABLE.to_string(),
            |d| d.to_rfc3339_opts(SecondsFormat::Secs, true),
        )
    };

    let mut lines = vec![
        format!("Period: {} -> {}", date(data.start_date), date(data.end_date)),
        format!("Total kgCO2e: {:.6}", data.total_impact.kg_co2_equivalent),
        format!("Total m3 water: {:.6}", data.total_impact.m3_water_usage),
    ];

    if !data.projects.is_empty() {
        lines.push(String::new());
    }
    lines.extend(data.projects.iter().map(|project| {
        format!(
            "Project {}: kgCO2e={:.6} m3={:.6}",
            project.project_id,
            project.total_project_impact.kg_co2_equivalent,
            project.total_project_impact.m3_water_usage
        )
    }));

    lines.join("\n")
}

fn align_columns(rows: &[[String; 5]]) -> Vec<String> {
    let mut widths = HEADERS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = HEADERS.map(str::to_string);
    std::iter::once(&header)
        .chain(rows)
        .map(|row| {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    let width = widths[i];
                    if NUMERIC_COLUMNS.contains(&i) {
                        format!("{cell:>width$}")
                    } else {
                        format!("{cell:<width$}")
                    }
                })
                .collect();
            line.join("  ").trim_end().to_string()
        })
        .collect()
}
