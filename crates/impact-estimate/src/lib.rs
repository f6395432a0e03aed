//! Monthly footprint estimation.
//!
//! [`build`] walks every planned change, projects it into signed
//! [`Transition`]s, resolves each transition against the catalog and turns
//! the matched products into [`Row`]s:
//!
//! - the consumed quantity is divided by the SKU bundle size
//! - the per-unit rate is normalized to one month (730 hours)
//! - the result is signed by the transition (-1 removal, +1 addition)
//!
//! Transitions that cannot be resolved become [`UnsupportedResource`]
//! entries instead of failing the batch. Estimation never fails.

pub mod report;
pub mod transition;

use impact_core::{CatalogProduct, MeasureUnit, ResourceChange};
use impact_mapping::{Match, Resolver};

pub use report::{Report, Row, Totals, UnsupportedResource};
pub use transition::{Transition, TransitionAction, transitions};

/// Hours in a billing month.
pub const HOURS_PER_MONTH: f64 = 730.0;

/// Quantity expressed in catalog billing units.
///
/// A bundle size of 0 or 1 bills per unit.
pub fn billed_quantity(quantity: f64, bundle_size: u64) -> f64 {
    if bundle_size <= 1 {
        quantity
    } else {
        quantity / bundle_size as f64
    }
}

/// Factor converting a per-unit rate to a monthly rate.
pub fn unit_to_month_multiplier(unit: &MeasureUnit) -> f64 {
    match unit {
        MeasureUnit::Hour => HOURS_PER_MONTH,
        MeasureUnit::Month => 1.0,
        MeasureUnit::Year => 1.0 / 12.0,
        MeasureUnit::Other(_) | MeasureUnit::Unknown => 1.0,
    }
}

/// Turns resolved changes into a [`Report`].
#[derive(Debug, Clone, Copy)]
pub struct Estimator<'r> {
    resolver: Resolver<'r>,
}

impl Default for Estimator<'static> {
    fn default() -> Self {
        Self::new(Resolver::default())
    }
}

impl<'r> Estimator<'r> {
    pub fn new(resolver: Resolver<'r>) -> Self {
        Self { resolver }
    }

    pub fn build(&self, changes: &[ResourceChange], catalog: &[CatalogProduct]) -> Report {
        let mut rows = Vec::new();
        let mut unsupported = Vec::new();

        for change in changes {
            for transition in transitions(change) {
                tracing::debug!(
                    address = %change.address,
                    resource_type = %change.resource_type,
                    action = %transition.action,
                    sign = transition.sign,
                    "Estimating transition"
                );

                match self.resolver.resolve(&transition.change, catalog) {
                    Ok(resolution) => rows.extend(
                        resolution
                            .into_iter()
                            .map(|m| impact_row(&transition, &m)),
                    ),
                    Err(err) => {
                        tracing::debug!(
                            address = %change.address,
                            code = err.code(),
                            reason = %err.reason,
                            "Resource not estimated"
                        );
                        unsupported.push(UnsupportedResource {
                            address: change.address.clone(),
                            code: err.code().to_string(),
                            reason: err.reason.clone(),
                        });
                    }
                }
            }
        }

        let totals = Totals::from_rows(&rows);

        tracing::info!(
            changes = changes.len(),
            rows = rows.len(),
            unsupported = unsupported.len(),
            unknown_rows = totals.unknown_rows,
            "Estimation complete"
        );

        Report {
            rows,
            unsupported,
            totals,
        }
    }
}

/// Estimate `changes` with the built-in resolution rules.
pub fn build(changes: &[ResourceChange], catalog: &[CatalogProduct]) -> Report {
    Estimator::default().build(changes, catalog)
}

fn impact_row(transition: &Transition, matched: &Match<'_>) -> Row {
    let product = matched.product;
    let billed = billed_quantity(matched.quantity, product.unit_of_measure.size);
    let factor = billed * unit_to_month_multiplier(&product.unit_of_measure.unit) * transition.sign;

    Row {
        address: transition.change.address.clone(),
        resource_type: transition.change.resource_type.clone(),
        action: transition.action.as_str().to_string(),
        sku: product.sku.clone(),
        kg_co2e_month: product.kg_co2_equivalent().map(|rate| rate * factor),
        m3_water_month: product.m3_water_usage().map(|rate| rate * factor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use impact_core::{
        AttrValue, Attributes, ChangeAction, EnvironmentalEstimation, Locality, UnitOfMeasure,
    };

    fn attrs(pairs: &[(&str, AttrValue)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn product(sku: &str, unit: MeasureUnit, size: u64, kg: Option<f64>, m3: Option<f64>) -> CatalogProduct {
        CatalogProduct {
            sku: sku.to_string(),
            locality: Locality::zone("fr-par-1"),
            unit_of_measure: UnitOfMeasure::new(unit, size),
            environmental_impact_estimation: Some(EnvironmentalEstimation {
                kg_co2_equivalent: kg,
                m3_water_usage: m3,
            }),
            ..Default::default()
        }
    }

    fn change(
        address: &str,
        resource_type: &str,
        actions: &[ChangeAction],
        before: Attributes,
        after: Attributes,
    ) -> ResourceChange {
        ResourceChange {
            address: address.to_string(),
            resource_type: resource_type.to_string(),
            actions: actions.to_vec(),
            before,
            after,
            zone: None,
            region: None,
        }
    }

    fn instance(type_: &str) -> Attributes {
        attrs(&[
            ("type", AttrValue::from(type_)),
            ("zone", AttrValue::from("fr-par-1")),
        ])
    }

    #[test]
    fn billed_quantity_divides_by_bundle_size() {
        assert_eq!(billed_quantity(250.0, 100), 2.5);
        assert_eq!(billed_quantity(3.0, 1), 3.0);
        assert_eq!(billed_quantity(3.0, 0), 3.0);
    }

    #[test]
    fn unit_multipliers() {
        assert_eq!(unit_to_month_multiplier(&MeasureUnit::Hour), 730.0);
        assert_eq!(unit_to_month_multiplier(&MeasureUnit::Month), 1.0);
        assert!((unit_to_month_multiplier(&MeasureUnit::Year) - 1.0 / 12.0).abs() < 1e-12);
        assert_eq!(unit_to_month_multiplier(&MeasureUnit::Other("gb".into())), 1.0);
        assert_eq!(unit_to_month_multiplier(&MeasureUnit::Unknown), 1.0);
    }

    #[test]
    fn bundled_monthly_volume_is_exact() {
        let catalog = vec![CatalogProduct {
            product_category: "Block Storage".to_string(),
            ..product("/storage/block/sbs_5k/fr-par-1", MeasureUnit::Month, 100, Some(2.0), Some(0.0))
        }];
        let changes = vec![change(
            "scaleway_block_volume.data",
            "scaleway_block_volume",
            &[ChangeAction::Create],
            Attributes::new(),
            attrs(&[
                ("size_in_gb", AttrValue::Number(250.0)),
                ("zone", AttrValue::from("fr-par-1")),
            ]),
        )];

        let report = build(&changes, &catalog);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].kg_co2e_month, Some(5.0));
        assert_eq!(report.totals.kg_co2e_month, 5.0);
    }

    #[test]
    fn hourly_rate_is_scaled_to_month() {
        let catalog = vec![product("/compute/dev1_s/run_fr-par-1", MeasureUnit::Hour, 1, Some(0.001), Some(0.0))];
        let changes = vec![change(
            "scaleway_instance_server.web",
            "scaleway_instance_server",
            &[ChangeAction::Create],
            Attributes::new(),
            instance("DEV1-S"),
        )];

        let report = build(&changes, &catalog);
        let kg = report.rows[0].kg_co2e_month.unwrap();
        assert!((kg - 0.73).abs() < 1e-9);
        assert_eq!(report.rows[0].action, "create");
        assert_eq!(report.rows[0].sku, "/compute/dev1_s/run_fr-par-1");
    }

    #[test]
    fn replace_on_same_sku_nets_zero() {
        let catalog = vec![product("/compute/dev1_s/run_fr-par-1", MeasureUnit::Hour, 1, Some(0.001), Some(0.002))];
        let changes = vec![change(
            "scaleway_instance_server.web",
            "scaleway_instance_server",
            &[ChangeAction::Delete, ChangeAction::Create],
            instance("DEV1-S"),
            instance("DEV1-S"),
        )];

        let report = build(&changes, &catalog);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].action, "delete");
        assert!(report.rows[0].kg_co2e_month.unwrap() < 0.0);
        assert_eq!(report.totals.kg_co2e_month, 0.0);
        assert_eq!(report.totals.m3_water_month, 0.0);
    }

    #[test]
    fn update_reports_rate_difference() {
        let catalog = vec![
            product("/compute/dev1_s/run_fr-par-1", MeasureUnit::Month, 1, Some(1.0), Some(0.0)),
            product("/compute/dev1_m/run_fr-par-1", MeasureUnit::Month, 1, Some(3.0), Some(0.0)),
        ];
        let changes = vec![change(
            "scaleway_instance_server.web",
            "scaleway_instance_server",
            &[ChangeAction::Update],
            instance("DEV1-S"),
            instance("DEV1-M"),
        )];

        let report = build(&changes, &catalog);
        let actions: Vec<_> = report.rows.iter().map(|r| (r.action.as_str(), r.kg_co2e_month)).collect();
        assert_eq!(actions, vec![("update", Some(-1.0)), ("update", Some(3.0))]);
        assert_eq!(report.totals.kg_co2e_month, 2.0);
    }

    #[test]
    fn missing_co2_rate_marks_row_unknown() {
        let catalog = vec![product("/compute/dev1_s/run_fr-par-1", MeasureUnit::Hour, 1, None, Some(0.001))];
        let changes = vec![change(
            "scaleway_instance_server.web",
            "scaleway_instance_server",
            &[ChangeAction::Create],
            Attributes::new(),
            instance("DEV1-S"),
        )];

        let report = build(&changes, &catalog);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].kg_co2e_month, None);
        assert_eq!(report.totals.kg_co2e_month, 0.0);
        assert!(!report.totals.kg_co2e_known);
        assert!(report.totals.m3_water_known);
        assert_eq!(report.totals.unknown_rows, 1);
    }

    #[test]
    fn product_without_estimation_is_unknown_on_both_metrics() {
        let catalog = vec![CatalogProduct {
            environmental_impact_estimation: None,
            ..product("/compute/dev1_s/run_fr-par-1", MeasureUnit::Hour, 1, None, None)
        }];
        let changes = vec![change(
            "scaleway_instance_server.web",
            "scaleway_instance_server",
            &[ChangeAction::Create],
            Attributes::new(),
            instance("DEV1-S"),
        )];

        let report = build(&changes, &catalog);
        assert_eq!(report.totals.unknown_rows, 1);
        assert!(!report.totals.kg_co2e_known);
        assert!(!report.totals.m3_water_known);
    }

    #[test]
    fn redis_cluster_yields_one_row_per_role() {
        let catalog = vec![
            product("/storage/redis/main-node/red1-micro/fr-par-1", MeasureUnit::Month, 1, Some(1.0), Some(0.1)),
            product("/storage/redis/additional-node/red1-micro/fr-par-1", MeasureUnit::Month, 1, Some(0.5), Some(0.1)),
        ];
        let redis = |size: f64| {
            change(
                "scaleway_redis_cluster.cache",
                "scaleway_redis_cluster",
                &[ChangeAction::Create],
                Attributes::new(),
                attrs(&[
                    ("node_type", AttrValue::from("RED1-MICRO")),
                    ("cluster_size", AttrValue::Number(size)),
                    ("zone", AttrValue::from("fr-par-1")),
                ]),
            )
        };

        let report = build(&[redis(3.0)], &catalog);
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].kg_co2e_month, Some(1.0));
        assert_eq!(report.rows[1].kg_co2e_month, Some(1.0));
        assert_eq!(report.totals.kg_co2e_month, 2.0);

        let report = build(&[redis(1.0)], &catalog);
        assert_eq!(report.rows.len(), 1);
    }

    #[test]
    fn unsupported_type_is_reported_without_rows() {
        let catalog = vec![product("/compute/dev1_s/run_fr-par-1", MeasureUnit::Hour, 1, Some(0.001), Some(0.0))];
        let changes = vec![change(
            "scaleway_object_bucket.logs",
            "scaleway_object_bucket",
            &[ChangeAction::Create],
            Attributes::new(),
            attrs(&[("name", AttrValue::from("logs"))]),
        )];

        let report = build(&changes, &catalog);
        assert!(report.rows.is_empty());
        assert_eq!(
            report.unsupported,
            vec![UnsupportedResource {
                address: "scaleway_object_bucket.logs".to_string(),
                code: "not_implemented".to_string(),
                reason: "not implemented".to_string(),
            }]
        );
        assert_eq!(report.totals, Totals::default());
    }

    #[test]
    fn missing_attribute_is_reported_per_transition() {
        let changes = vec![change(
            "scaleway_rdb_instance.main",
            "scaleway_rdb_instance",
            &[ChangeAction::Create],
            Attributes::new(),
            attrs(&[("name", AttrValue::from("main"))]),
        )];

        let report = build(&changes, &[]);
        assert_eq!(report.unsupported.len(), 1);
        assert_eq!(report.unsupported[0].code, "missing_required_attribute");
        assert_eq!(report.unsupported[0].reason, "missing required attribute: node_type");
    }

    #[test]
    fn empty_plan_produces_known_zero_totals() {
        let report = build(&[], &[]);
        assert!(report.is_empty());
        assert_eq!(report.totals.kg_co2e_month, 0.0);
        assert!(report.totals.kg_co2e_known);
        assert!(report.totals.m3_water_known);
        assert_eq!(report.totals.unknown_rows, 0);
    }

    #[test]
    fn build_does_not_mutate_inputs() {
        let catalog = vec![product("/compute/dev1_s/run_fr-par-1", MeasureUnit::Hour, 1, Some(0.001), Some(0.0))];
        let changes = vec![change(
            "scaleway_instance_server.web",
            "scaleway_instance_server",
            &[ChangeAction::Delete, ChangeAction::Create],
            instance("DEV1-S"),
            instance("DEV1-S"),
        )];
        let (changes_before, catalog_before) = (changes.clone(), catalog.clone());

        let first = build(&changes, &catalog);
        let second = build(&changes, &catalog);
        assert_eq!(first, second);
        assert_eq!(changes, changes_before);
        assert_eq!(catalog, catalog_before);
    }
}
