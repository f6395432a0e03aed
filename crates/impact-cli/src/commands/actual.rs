//! `impact actual` command implementation.
//!
//! Queries the measured footprint of an organization over a period and
//! prints it as a summary table or the raw JSON response.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use impact_core::{Credentials, ImpactConfig, OutputFormat};
use impact_footprint::{FootprintClient, ImpactDataSource, ImpactQuery, ProductCategory, ServiceCategory};

use crate::render;

#[derive(Args, Debug)]
pub struct ActualArgs {
    /// Organization ID. Defaults to SCW_ORGANIZATION_ID.
    #[arg(long)]
    pub org: Option<String>,

    /// Start of the period: YYYY-MM-DD or RFC 3339.
    #[arg(long, value_parser = parse_date)]
    pub start: Option<DateTime<Utc>>,

    /// End of the period: YYYY-MM-DD or RFC 3339.
    #[arg(long, value_parser = parse_date)]
    pub end: Option<DateTime<Utc>>,

    /// Comma-separated project IDs.
    #[arg(long = "project", value_delimiter = ',')]
    pub projects: Vec<String>,

    /// Comma-separated regions.
    #[arg(long = "region", value_delimiter = ',')]
    pub regions: Vec<String>,

    /// Comma-separated zones.
    #[arg(long = "zone", value_delimiter = ',')]
    pub zones: Vec<String>,

    /// Comma-separated service categories: baremetal, compute, storage.
    #[arg(long = "service-category", value_delimiter = ',')]
    pub service_categories: Vec<ServiceCategory>,

    /// Comma-separated product categories: applesilicon, blockstorage,
    /// dedibox, elasticmetal, instances, objectstorage.
    #[arg(long = "product-category", value_delimiter = ',')]
    pub product_categories: Vec<ProductCategory>,

    /// Output format: table or json. Overrides `output.format`.
    #[arg(long)]
    pub format: Option<OutputFormat>,
}

pub async fn run(args: ActualArgs, config: &ImpactConfig) -> Result<()> {
    let credentials = Credentials::from_env();
    let query = build_query(&args, &credentials)?;
    let client = FootprintClient::from_config(&config.catalog, &credentials)
        .context("could not create footprint client")?;

    let format = args.format.unwrap_or(config.output.format);
    println!("{}", query_and_render(&client, &query, format).await?);
    Ok(())
}

/// Query `source` and render the response in `format`.
pub async fn query_and_render<S>(source: &S, query: &ImpactQuery, format: OutputFormat) -> Result<String>
where
    S: ImpactDataSource + ?Sized,
{
    tracing::debug!(organization_id = %query.organization_id, "Querying impact data");
    let data = source
        .query_impact_data(query)
        .await
        .context("could not query impact data")?;

    Ok(match format {
        OutputFormat::Table => render::actual_table(&data),
        OutputFormat::Json => serde_json::to_string_pretty(&data).context("could not encode json report")?,
    })
}

fn build_query(args: &ActualArgs, credentials: &Credentials) -> Result<ImpactQuery> {
    let organization_id = args
        .org
        .as_deref()
        .map(str::trim)
        .filter(|org| !org.is_empty())
        .map(str::to_string)
        .or_else(|| credentials.organization_id.clone());
    let Some(organization_id) = organization_id else {
        bail!("could not resolve organization id (use --org or SCW_ORGANIZATION_ID)");
    };

    Ok(ImpactQuery {
        start_date: args.start,
        end_date: args.end,
        project_ids: non_blank(&args.projects),
        regions: non_blank(&args.regions),
        zones: non_blank(&args.zones),
        service_categories: args.service_categories.clone(),
        product_categories: args.product_categories.clone(),
        ..ImpactQuery::new(organization_id)
    })
}

fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_date(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("date is empty".to_string());
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
        .ok_or_else(|| format!("could not validate date '{raw}' (use YYYY-MM-DD or RFC3339)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use clap::Parser;
    use impact_footprint::{FootprintError, Impact, ImpactData, ProjectImpact};
    use std::sync::Mutex;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        actual: ActualArgs,
    }

    fn parse(args: &[&str]) -> ActualArgs {
        let mut argv = vec!["impact"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().actual
    }

    struct FixedSource {
        data: ImpactData,
        seen: Mutex<Vec<ImpactQuery>>,
    }

    #[async_trait]
    impl ImpactDataSource for FixedSource {
        async fn query_impact_data(&self, query: &ImpactQuery) -> Result<ImpactData, FootprintError> {
            self.seen.lock().unwrap().push(query.clone());
            Ok(self.data.clone())
        }
    }

    #[test]
    fn parses_dates_in_both_layouts() {
        assert_eq!(
            parse_date("2025-03-01").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date("2025-03-01T12:30:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 1, 10, 30, 0).unwrap()
        );
        assert!(parse_date("01/03/2025").unwrap_err().contains("YYYY-MM-DD"));
        assert!(parse_date(" ").is_err());
    }

    #[test]
    fn parses_filters_and_rejects_unknown_categories() {
        let args = parse(&[
            "--org",
            "org-1",
            "--start",
            "2025-01-01",
            "--project",
            "p1,,p2",
            "--service-category",
            "compute,Storage",
            "--product-category",
            "block-storage",
        ]);
        let query = build_query(&args, &Credentials::default()).unwrap();

        assert_eq!(query.organization_id, "org-1");
        assert_eq!(query.start_date, Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(query.end_date, None);
        assert_eq!(query.project_ids, vec!["p1", "p2"]);
        assert_eq!(
            query.service_categories,
            vec![ServiceCategory::Compute, ServiceCategory::Storage]
        );
        assert_eq!(query.product_categories, vec![ProductCategory::BlockStorage]);

        assert!(TestCli::try_parse_from(["impact", "--service-category", "network"]).is_err());
        assert!(TestCli::try_parse_from(["impact", "--start", "yesterday"]).is_err());
    }

    #[test]
    fn organization_falls_back_to_credentials() {
        let credentials = Credentials {
            organization_id: Some("org-env".to_string()),
            ..Default::default()
        };
        assert_eq!(build_query(&parse(&[]), &credentials).unwrap().organization_id, "org-env");
        assert_eq!(
            build_query(&parse(&["--org", "org-flag"]), &credentials).unwrap().organization_id,
            "org-flag"
        );

        let err = build_query(&parse(&["--org", " "]), &Credentials::default()).unwrap_err();
        assert!(err.to_string().contains("could not resolve organization id"));
    }

    #[tokio::test]
    async fn renders_queried_data() {
        let source = FixedSource {
            data: ImpactData {
                start_date: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
                end_date: Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap()),
                total_impact: Impact {
                    kg_co2_equivalent: 12.5,
                    m3_water_usage: 0.75,
                },
                projects: vec![ProjectImpact {
                    project_id: "p1".to_string(),
                    total_project_impact: Impact {
                        kg_co2_equivalent: 12.5,
                        m3_water_usage: 0.75,
                    },
                    regions: Vec::new(),
                }],
            },
            seen: Mutex::new(Vec::new()),
        };
        let query = ImpactQuery::new("org-1");

        let table = query_and_render(&source, &query, OutputFormat::Table).await.unwrap();
        assert!(table.starts_with("Period: 2025-01-01T00:00:00Z -> 2025-02-01T00:00:00Z\n"));
        assert!(table.contains("Project p1: kgCO2e=12.500000 m3=0.750000"));

        let json = query_and_render(&source, &query, OutputFormat::Json).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_impact"]["kg_co2_equivalent"], 12.5);
        assert_eq!(value["projects"][0]["project_id"], "p1");

        assert_eq!(source.seen.lock().unwrap().len(), 2);
    }
}
