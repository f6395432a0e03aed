//! `impact doctor` command implementation.
//!
//! Prints a JSON object describing the effective setup:
//! - `api_base_url`: catalog API in use
//! - `auth`: `ok` or the missing Scaleway credential variables
//! - `catalog`: reachability of the public catalog (one single-item page)
//! - `footprint`: an authenticated impact data query over the last 30
//!   days, skipped while credentials are missing
//! - `snapshot`: load status of the configured snapshot, when one is set

use anyhow::Result;
use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use impact_catalog::{CatalogClient, ProductLister, SnapshotCatalog};
use impact_core::{Credentials, ImpactConfig};
use impact_footprint::{FootprintClient, ImpactQuery};
use std::collections::BTreeMap;

/// Days covered by the footprint reachability query.
const FOOTPRINT_WINDOW_DAYS: i64 = 30;

pub async fn run(config: &ImpactConfig) -> Result<()> {
    let status = collect_status(config, |key| std::env::var(key).ok()).await;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

async fn collect_status(
    config: &ImpactConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> BTreeMap<&'static str, String> {
    let mut status = BTreeMap::new();
    let credentials = Credentials::from_lookup(lookup);
    status.insert("api_base_url", config.catalog.api_base_url.clone());
    status.insert("auth", auth_status(&credentials));

    let catalog = match CatalogClient::from_config(&config.catalog) {
        Ok(client) => match client.list_products(1, 1).await {
            Ok(_) => "ok".to_string(),
            Err(e) => format!("error: {e}"),
        },
        Err(e) => format!("error: {e}"),
    };
    status.insert("catalog", catalog);
    status.insert("footprint", footprint_status(config, &credentials, Utc::now()).await);

    if let Some(path) = &config.catalog.snapshot_file {
        let snapshot = match SnapshotCatalog::new(path).list_all_products().await {
            Ok(products) => format!("ok ({} products)", products.len()),
            Err(e) => format!("error: {e}"),
        };
        status.insert("snapshot", snapshot);
    }

    status
}

fn auth_status(credentials: &Credentials) -> String {
    let missing = credentials.missing();
    if missing.is_empty() {
        "ok".to_string()
    } else {
        format!("missing: {}", missing.join(","))
    }
}

async fn footprint_status(config: &ImpactConfig, credentials: &Credentials, now: DateTime<Utc>) -> String {
    let Some(organization_id) = credentials.organization_id.clone().filter(|_| credentials.is_complete())
    else {
        return "skipped (missing auth)".to_string();
    };

    let client = match FootprintClient::from_config(&config.catalog, credentials) {
        Ok(client) => client,
        Err(e) => return format!("error: {e}"),
    };

    let (start, end) = query_window(now);
    let query = ImpactQuery {
        start_date: Some(start),
        end_date: Some(end),
        ..ImpactQuery::new(organization_id)
    };
    match client.query(&query).await {
        Ok(_) => "ok".to_string(),
        Err(e) => format!("error: {e}"),
    }
}

/// The last [`FOOTPRINT_WINDOW_DAYS`] days up to `now`, whole seconds.
fn query_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = now.trunc_subsecs(0);
    (end - TimeDelta::days(FOOTPRINT_WINDOW_DAYS), end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn auth_reports_missing_variables_in_order() {
        assert_eq!(
            auth_status(&Credentials::from_lookup(lookup(&[]))),
            "missing: SCW_ACCESS_KEY,SCW_SECRET_KEY,SCW_ORGANIZATION_ID"
        );
        assert_eq!(
            auth_status(&Credentials::from_lookup(lookup(&[
                ("SCW_ACCESS_KEY", "SCWXXX"),
                ("SCW_SECRET_KEY", " ")
            ]))),
            "missing: SCW_SECRET_KEY,SCW_ORGANIZATION_ID"
        );
        assert_eq!(auth_status(&Credentials::from_lookup(lookup(FULL_AUTH))), "ok");
    }

    const FULL_AUTH: &[(&str, &str)] = &[
        ("SCW_ACCESS_KEY", "SCWXXX"),
        ("SCW_SECRET_KEY", "secret"),
        ("SCW_ORGANIZATION_ID", "org"),
    ];

    fn offline_config() -> ImpactConfig {
        let mut config = ImpactConfig::default();
        // Unroutable base URL keeps the API probes offline.
        config.catalog.api_base_url = "https://127.0.0.1:9".to_string();
        config.catalog.timeout_secs = 1;
        config
    }

    #[test]
    fn query_window_covers_thirty_days() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap() + TimeDelta::milliseconds(250);
        let (start, end) = query_window(now);
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap());
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn reports_snapshot_status() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"[{"sku": "/compute/dev1_s/run_fr-par-1"}]"#).unwrap();

        let mut config = offline_config();
        config.catalog.snapshot_file = Some(path);

        let status = collect_status(&config, lookup(&[])).await;
        assert_eq!(status["api_base_url"], "https://127.0.0.1:9");
        assert_eq!(status["snapshot"], "ok (1 products)");
        assert!(status["catalog"].starts_with("error: "));
        assert!(status["auth"].starts_with("missing: "));
        assert_eq!(status["footprint"], "skipped (missing auth)");
    }

    #[tokio::test]
    async fn footprint_is_queried_once_authenticated() {
        let status = collect_status(&offline_config(), lookup(FULL_AUTH)).await;
        assert_eq!(status["auth"], "ok");
        assert!(status["footprint"].starts_with("error: "), "{}", status["footprint"]);
        assert!(!status.contains_key("snapshot"));
    }
}
