//! Resource type rules.
//!
//! Each supported resource type is one [`ResourceRule`] row in
//! [`BUILTIN_RULES`]: which attribute is required, which catalog entries are
//! candidates, where the quantity and the type token come from, and whether
//! the resource expands into several catalog roles. Supporting a new
//! resource type means adding a row.

use impact_core::{CatalogProduct, ResourceChange};
use std::fmt;

use crate::token::{normalize_load_balancer_type, normalize_token};

/// Catalog candidate filter for a rule.
pub type CategoryFilter = fn(&CatalogProduct) -> bool;

/// Where a rule reads the billed quantity from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantitySource {
    /// Always this quantity.
    Fixed(f64),
    /// A numeric attribute, or `default` when absent.
    Attribute { key: &'static str, default: f64 },
}

impl QuantitySource {
    pub fn quantity(&self, change: &ResourceChange) -> f64 {
        match *self {
            QuantitySource::Fixed(quantity) => quantity,
            QuantitySource::Attribute { key, default } => change.number_attr(key, default),
        }
    }
}

/// Where a rule reads the commercial type token from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// The rule matches on category and locality only.
    None,
    /// A string attribute, normalized with [`normalize_token`].
    Attribute(&'static str),
    /// A load balancer type attribute, normalized with
    /// [`normalize_load_balancer_type`].
    LoadBalancerType(&'static str),
}

impl TokenSource {
    /// The attribute the token is read from, if any.
    pub fn attribute(&self) -> Option<&'static str> {
        match *self {
            TokenSource::None => None,
            TokenSource::Attribute(key) | TokenSource::LoadBalancerType(key) => Some(key),
        }
    }

    /// Raw attribute value and its normalized token. `None` when the rule
    /// has no token or the change does not carry the attribute.
    pub fn extract<'c>(&self, change: &'c ResourceChange) -> Option<(&'static str, &'c str, String)> {
        let key = self.attribute()?;
        let raw = change.string_attr(key)?;
        let token = match self {
            TokenSource::LoadBalancerType(_) => normalize_load_balancer_type(raw),
            _ => normalize_token(raw),
        };
        (!token.is_empty()).then_some((key, raw, token))
    }
}

/// A resource billed as several catalog roles (a primary node plus
/// additional nodes).
///
/// Role candidates are restricted to SKUs containing
/// `{path_prefix}{role}/` before the rule's category filter applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleExpansion {
    /// Numeric attribute holding the total node count.
    pub count_attribute: &'static str,
    pub path_prefix: &'static str,
    /// Role billed once.
    pub primary_role: &'static str,
    /// Role billed `count - 1` times, only looked up when `count > 1`.
    pub additional_role: &'static str,
}

impl RoleExpansion {
    /// Node count from the change: default 1, floored, at least 1.
    pub fn count(&self, change: &ResourceChange) -> u64 {
        let value = change.number_attr(self.count_attribute, 1.0);
        if value.is_nan() || value < 1.0 {
            1
        } else {
            value.trunc() as u64
        }
    }

    pub fn role_path(&self, role: &str) -> String {
        format!("{}{}/", self.path_prefix, role.trim().to_lowercase())
    }
}

/// Mapping rule for one resource type.
#[derive(Clone, Copy)]
pub struct ResourceRule {
    pub resource_type: &'static str,
    /// Attribute whose absence fails resolution up front.
    pub required_attribute: Option<&'static str>,
    pub category: CategoryFilter,
    pub quantity: QuantitySource,
    pub token: TokenSource,
    pub roles: Option<RoleExpansion>,
}

impl fmt::Debug for ResourceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRule")
            .field("resource_type", &self.resource_type)
            .field("required_attribute", &self.required_attribute)
            .field("quantity", &self.quantity)
            .field("token", &self.token)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

const REDIS_ROLES: RoleExpansion = RoleExpansion {
    count_attribute: "cluster_size",
    path_prefix: "/storage/redis/",
    primary_role: "main-node",
    additional_role: "additional-node",
};

/// Rules for the supported Scaleway resource types.
pub static BUILTIN_RULES: &[ResourceRule] = &[
    ResourceRule {
        resource_type: "scaleway_instance_server",
        required_attribute: Some("type"),
        category: is_instance_product,
        quantity: QuantitySource::Fixed(1.0),
        token: TokenSource::Attribute("type"),
        roles: None,
    },
    ResourceRule {
        resource_type: "scaleway_baremetal_server",
        required_attribute: None,
        category: is_baremetal_product,
        quantity: QuantitySource::Fixed(1.0),
        token: TokenSource::Attribute("type"),
        roles: None,
    },
    ResourceRule {
        resource_type: "scaleway_k8s_pool",
        required_attribute: Some("node_type"),
        category: is_instance_product,
        quantity: QuantitySource::Attribute {
            key: "size",
            default: 1.0,
        },
        token: TokenSource::Attribute("node_type"),
        roles: None,
    },
    ResourceRule {
        resource_type: "scaleway_lb",
        required_attribute: Some("type"),
        category: is_load_balancer_product,
        quantity: QuantitySource::Fixed(1.0),
        token: TokenSource::LoadBalancerType("type"),
        roles: None,
    },
    ResourceRule {
        resource_type: "scaleway_block_volume",
        required_attribute: None,
        category: is_block_storage_product,
        quantity: QuantitySource::Attribute {
            key: "size_in_gb",
            default: 1.0,
        },
        token: TokenSource::None,
        roles: None,
    },
    ResourceRule {
        resource_type: "scaleway_rdb_instance",
        required_attribute: Some("node_type"),
        category: is_rdb_product,
        quantity: QuantitySource::Fixed(1.0),
        token: TokenSource::Attribute("node_type"),
        roles: None,
    },
    ResourceRule {
        resource_type: "scaleway_redis_cluster",
        required_attribute: Some("node_type"),
        category: is_redis_product,
        quantity: QuantitySource::Fixed(1.0),
        token: TokenSource::Attribute("node_type"),
        roles: Some(REDIS_ROLES),
    },
];

fn sku_contains(product: &CatalogProduct, needle: &str) -> bool {
    product.sku.to_lowercase().contains(needle)
}

pub fn is_instance_product(product: &CatalogProduct) -> bool {
    let category = normalize_token(&product.product_category);
    category == "instance" || category == "instances" || sku_contains(product, "/compute/")
}

pub fn is_baremetal_product(product: &CatalogProduct) -> bool {
    let category = normalize_token(&product.product_category);
    category == "elasticmetal"
        || category == "baremetal"
        || sku_contains(product, "/elastic-metal/")
        || sku_contains(product, "/apple-silicon/")
}

pub fn is_load_balancer_product(product: &CatalogProduct) -> bool {
    normalize_token(&product.product_category) == "loadbalancer"
        || sku_contains(product, "/network/lb/")
        || sku_contains(product, "/loadbalancer/")
}

pub fn is_block_storage_product(product: &CatalogProduct) -> bool {
    normalize_token(&product.product_category) == "blockstorage"
        || sku_contains(product, "/storage/block/")
}

pub fn is_rdb_product(product: &CatalogProduct) -> bool {
    sku_contains(product, "/storage/rdb/")
}

pub fn is_redis_product(product: &CatalogProduct) -> bool {
    sku_contains(product, "/storage/redis/")
}
