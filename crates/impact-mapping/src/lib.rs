//! Catalog matching for planned resource changes.
//!
//! [`resolve`] maps one [`ResourceChange`] to the catalog product(s) that
//! bill it:
//!
//! 1. **Rule lookup** - the resource type selects a [`ResourceRule`]
//! 2. **Attribute checks** - required attributes must be present
//! 3. **Selection** - candidates are filtered by category and locality,
//!    scored, and tie-broken on SKU
//! 4. **Role expansion** - multi-node resources resolve one product per role
//!
//! Resolution is pure and deterministic: the same change and catalog always
//! select the same products.

pub mod error;
pub mod locality;
pub mod rules;
pub mod select;
pub mod token;

use impact_core::{CatalogProduct, ResourceChange};

pub use error::{MappingError, MappingErrorKind};
pub use locality::{region_from_zone, score_locality};
pub use rules::{BUILTIN_RULES, QuantitySource, ResourceRule, RoleExpansion, TokenSource};
pub use select::{Candidate, Criteria, find_best_product};
pub use token::normalize_token;

/// One catalog product and the quantity of it a resource consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub product: &'a CatalogProduct,
    pub quantity: f64,
}

/// Products billing one logical resource. Never empty; multi-role
/// resources carry one match per role, primary role first.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    matches: Vec<Match<'a>>,
}

impl<'a> Resolution<'a> {
    fn single(product: &'a CatalogProduct, quantity: f64) -> Self {
        Self {
            matches: vec![Match { product, quantity }],
        }
    }

    pub fn matches(&self) -> &[Match<'a>] {
        &self.matches
    }

    /// The primary match (the only one for single-role resources).
    pub fn primary(&self) -> &Match<'a> {
        &self.matches[0]
    }

    /// Total quantity across all roles.
    pub fn total_quantity(&self) -> f64 {
        self.matches.iter().map(|m| m.quantity).sum()
    }

    pub fn is_multi_role(&self) -> bool {
        self.matches.len() > 1
    }
}

impl<'a> IntoIterator for Resolution<'a> {
    type Item = Match<'a>;
    type IntoIter = std::vec::IntoIter<Match<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

/// Resolves changes against a rule table.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    rules: &'r [ResourceRule],
}

impl Default for Resolver<'static> {
    fn default() -> Self {
        Self::new(BUILTIN_RULES)
    }
}

impl<'r> Resolver<'r> {
    pub fn new(rules: &'r [ResourceRule]) -> Self {
        Self { rules }
    }

    pub fn rule_for(&self, resource_type: &str) -> Option<&'r ResourceRule> {
        self.rules.iter().find(|r| r.resource_type == resource_type)
    }

    /// Whether the resource type has a rule.
    pub fn supports(&self, resource_type: &str) -> bool {
        self.rule_for(resource_type).is_some()
    }

    /// Resolve one change against the catalog.
    ///
    /// Attributes are read from `after` when non-empty, otherwise `before`;
    /// `zone`/`region` fall back to the plan-level defaults.
    pub fn resolve<'a>(
        &self,
        change: &ResourceChange,
        catalog: &'a [CatalogProduct],
    ) -> Result<Resolution<'a>, MappingError> {
        let rule = self
            .rule_for(&change.resource_type)
            .ok_or_else(MappingError::not_implemented)?;

        let token = rule.token.extract(change);

        // A required token attribute must survive normalization: "--" is as
        // absent as a missing key.
        if let Some(required) = rule.required_attribute
            && (change.string_attr(required).is_none()
                || (rule.token.attribute() == Some(required) && token.is_none()))
        {
            return Err(MappingError::missing_attribute(required));
        }

        let zone = change.effective_zone();
        let region = change.effective_region();

        let criteria = Criteria {
            zone,
            region,
            token: token.as_ref().map(|(_, _, t)| t.as_str()),
        };
        let no_match = || {
            MappingError::no_catalog_match(
                token.as_ref().map(|(key, raw, _)| (*key, *raw)),
                zone,
                region,
            )
        };

        let resolution = match &rule.roles {
            None => {
                let best = find_best_product(catalog, rule.category, &criteria).ok_or_else(no_match)?;
                tracing::debug!(
                    address = %change.address,
                    resource_type = %change.resource_type,
                    sku = %best.product.sku,
                    score = best.score,
                    "Resolved catalog product"
                );
                Resolution::single(best.product, rule.quantity.quantity(change))
            }
            Some(roles) => {
                let count = roles.count(change);

                let primary = find_role_product(catalog, rule, roles, roles.primary_role, &criteria)
                    .ok_or_else(no_match)?;
                let mut resolution = Resolution::single(primary, 1.0);

                if count > 1 {
                    let additional =
                        find_role_product(catalog, rule, roles, roles.additional_role, &criteria)
                            .ok_or_else(no_match)?;
                    resolution.matches.push(Match {
                        product: additional,
                        quantity: (count - 1) as f64,
                    });
                }

                tracing::debug!(
                    address = %change.address,
                    resource_type = %change.resource_type,
                    sku = %primary.sku,
                    count,
                    "Resolved multi-role catalog products"
                );
                resolution
            }
        };

        Ok(resolution)
    }
}

fn find_role_product<'a>(
    catalog: &'a [CatalogProduct],
    rule: &ResourceRule,
    roles: &RoleExpansion,
    role: &str,
    criteria: &Criteria<'_>,
) -> Option<&'a CatalogProduct> {
    let role_path = roles.role_path(role);
    let in_role = catalog
        .iter()
        .filter(|p| p.sku.to_lowercase().contains(&role_path));

    find_best_product(in_role, rule.category, criteria).map(|c| c.product)
}

/// Resolve a change with the built-in rules.
pub fn resolve<'a>(
    change: &ResourceChange,
    catalog: &'a [CatalogProduct],
) -> Result<Resolution<'a>, MappingError> {
    Resolver::default().resolve(change, catalog)
}
