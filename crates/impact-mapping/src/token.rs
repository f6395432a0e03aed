//! Type token normalization and matching.
//!
//! Commercial type names are spelled inconsistently between plans and the
//! catalog (`POP2-HC-2C-4G`, `pop2_hc_2c_4g`, `RED1-micro`). Tokens are
//! compared after [`normalize_token`].

use impact_core::CatalogProduct;

/// Lower-case and strip `-`, `_`, spaces and `/`.
pub fn normalize_token(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '-' | '_' | ' ' | '/'))
        .collect()
}

/// Load balancer types are `LB-S`, `LB-GP-M`, ... in plans and
/// `loadbalancer-s`, `loadbalancer-gp-m`, ... in the catalog.
pub fn normalize_load_balancer_type(raw: &str) -> String {
    let value = raw.trim().to_lowercase();
    if value.is_empty() {
        return String::new();
    }

    let value = value.strip_prefix("lb-").unwrap_or(&value);
    let value = value.replace('_', "-").replace(' ', "");

    normalize_token(&format!("loadbalancer-{}", value))
}

/// Whether `token` (already normalized) occurs in the product's SKU,
/// name, variant or description.
pub fn matches_token(product: &CatalogProduct, token: &str) -> bool {
    let haystack = normalize_token(&format!(
        "{} {} {} {}",
        product.sku, product.product, product.variant, product.description
    ));
    haystack.contains(token)
}
