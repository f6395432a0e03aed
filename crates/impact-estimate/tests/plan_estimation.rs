//! End-to-end estimation of a decoded Terraform plan.

use impact_core::{CatalogProduct, EnvironmentalEstimation, Locality, MeasureUnit, UnitOfMeasure};
use impact_estimate::build;

const PLAN: &str = r#"{
  "format_version": "1.2",
  "terraform_version": "1.7.5",
  "variables": {
    "zone": {"value": "fr-par-1"},
    "region": {"value": "fr-par"}
  },
  "resource_changes": [
    {
      "address": "scaleway_instance_server.web",
      "type": "scaleway_instance_server",
      "change": {
        "actions": ["create"],
        "before": null,
        "after": {"type": "DEV1-S", "zone": null}
      }
    },
    {
      "address": "scaleway_rdb_instance.main",
      "type": "scaleway_rdb_instance",
      "change": {
        "actions": ["delete", "create"],
        "before": {"node_type": "DB-DEV-S"},
        "after": {"node_type": "DB-DEV-M"}
      }
    },
    {
      "address": "scaleway_redis_cluster.cache",
      "type": "scaleway_redis_cluster",
      "change": {
        "actions": ["create"],
        "before": null,
        "after": {"node_type": "RED1-MICRO", "cluster_size": 3}
      }
    },
    {
      "address": "scaleway_lb.edge",
      "type": "scaleway_lb",
      "change": {
        "actions": ["create"],
        "before": null,
        "after": {"type": "LB-GP-M"}
      }
    },
    {
      "address": "scaleway_object_bucket.logs",
      "type": "scaleway_object_bucket",
      "change": {
        "actions": ["create"],
        "before": null,
        "after": {"name": "logs"}
      }
    },
    {
      "address": "scaleway_instance_ip.public",
      "type": "scaleway_instance_ip",
      "change": {"actions": ["no-op"], "before": {}, "after": {}}
    }
  ]
}"#;

fn product(sku: &str, locality: Locality, unit: MeasureUnit, kg: Option<f64>) -> CatalogProduct {
    CatalogProduct {
        sku: sku.to_string(),
        locality,
        unit_of_measure: UnitOfMeasure::new(unit, 1),
        environmental_impact_estimation: Some(EnvironmentalEstimation {
            kg_co2_equivalent: kg,
            m3_water_usage: Some(0.01),
        }),
        ..Default::default()
    }
}

fn catalog() -> Vec<CatalogProduct> {
    vec![
        product("/compute/dev1_s/run_fr-par-1", Locality::zone("fr-par-1"), MeasureUnit::Hour, Some(0.001)),
        product("/compute/dev1_s/run_nl-ams-1", Locality::zone("nl-ams-1"), MeasureUnit::Hour, Some(0.5)),
        product("/storage/rdb/instance/db-dev-s/fr-par", Locality::region("fr-par"), MeasureUnit::Month, Some(4.0)),
        product("/storage/rdb/instance/db-dev-m/fr-par", Locality::region("fr-par"), MeasureUnit::Month, Some(6.0)),
        product("/storage/redis/main-node/red1-micro/fr-par-1", Locality::zone("fr-par-1"), MeasureUnit::Month, Some(1.0)),
        product("/storage/redis/additional-node/red1-micro/fr-par-1", Locality::zone("fr-par-1"), MeasureUnit::Month, Some(0.5)),
        product("/network/lb/loadbalancer-gp-m/fr-par-1", Locality::zone("fr-par-1"), MeasureUnit::Month, None),
    ]
}

#[test]
fn estimates_a_decoded_plan() {
    let changes = impact_plan::parse_str(PLAN).expect("plan must decode");
    assert_eq!(changes.len(), 6);

    let catalog = catalog();
    let report = build(&changes, &catalog);

    let rows: Vec<_> = report
        .rows
        .iter()
        .map(|r| (r.address.as_str(), r.action.as_str(), r.sku.as_str()))
        .collect();
    assert_eq!(
        rows,
        vec![
            ("scaleway_instance_server.web", "create", "/compute/dev1_s/run_fr-par-1"),
            ("scaleway_rdb_instance.main", "delete", "/storage/rdb/instance/db-dev-s/fr-par"),
            ("scaleway_rdb_instance.main", "create", "/storage/rdb/instance/db-dev-m/fr-par"),
            ("scaleway_redis_cluster.cache", "create", "/storage/redis/main-node/red1-micro/fr-par-1"),
            ("scaleway_redis_cluster.cache", "create", "/storage/redis/additional-node/red1-micro/fr-par-1"),
            ("scaleway_lb.edge", "create", "/network/lb/loadbalancer-gp-m/fr-par-1"),
        ]
    );

    // 0.73 (instance) - 4 + 6 (rdb replace) + 1 + 2 * 0.5 (redis); lb unknown
    let expected = 0.73 + 2.0 + 2.0;
    assert!((report.totals.kg_co2e_month - expected).abs() < 1e-9);
    assert!(!report.totals.kg_co2e_known);
    assert!(report.totals.m3_water_known);
    assert_eq!(report.totals.unknown_rows, 1);

    assert_eq!(report.unsupported.len(), 1);
    assert_eq!(report.unsupported[0].address, "scaleway_object_bucket.logs");
    assert_eq!(report.unsupported[0].code, "not_implemented");
}

#[test]
fn plan_locality_defaults_steer_selection() {
    let plan = PLAN.replace("fr-par-1", "nl-ams-1").replace("\"fr-par\"", "\"nl-ams\"");
    let changes = impact_plan::parse_str(&plan).expect("plan must decode");

    let catalog = catalog();
    let report = build(&changes[..1], &catalog);
    assert_eq!(report.rows[0].sku, "/compute/dev1_s/run_nl-ams-1");
    assert!((report.rows[0].kg_co2e_month.unwrap() - 365.0).abs() < 1e-9);
}

#[test]
fn report_json_has_wire_field_names() {
    let changes = impact_plan::parse_str(PLAN).expect("plan must decode");
    let catalog = catalog();
    let report = build(&changes, &catalog);

    let value = serde_json::to_value(&report).expect("report must serialize");
    let totals = &value["totals"];
    assert_eq!(totals["kgco2e_known"], false);
    assert_eq!(totals["unknown_rows"], 1);
    assert_eq!(value["rows"][5]["kgco2e_known"], false);
    assert_eq!(value["rows"][5]["kgco2e_month"], 0.0);
    assert_eq!(value["unsupported"][0]["reason"], "not implemented");
}
