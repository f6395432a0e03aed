//! Best-product selection.

use crate::locality::score_locality;
use crate::token::matches_token;
use impact_core::CatalogProduct;

/// Score bonus for a product whose descriptive fields contain the type token.
pub const SCORE_TOKEN: u32 = 100;

/// What a candidate must satisfy to be considered.
#[derive(Debug, Clone, Copy)]
pub struct Criteria<'q> {
    pub zone: Option<&'q str>,
    pub region: Option<&'q str>,
    /// Normalized type token. When present, candidates must contain it.
    pub token: Option<&'q str>,
}

/// A selected product and the score it won with.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub product: &'a CatalogProduct,
    pub score: u32,
}

/// Pick the highest scoring product accepted by `accept` and the locality
/// filter. Ties go to the lexicographically smallest SKU, so the result
/// does not depend on catalog order.
pub fn find_best_product<'a, I, F>(products: I, accept: F, criteria: &Criteria<'_>) -> Option<Candidate<'a>>
where
    I: IntoIterator<Item = &'a CatalogProduct>,
    F: Fn(&CatalogProduct) -> bool,
{
    let token = criteria.token.filter(|t| !t.is_empty());
    let mut best: Option<Candidate<'a>> = None;

    for product in products {
        if !accept(product) {
            continue;
        }

        let Some(mut score) = score_locality(&product.locality, criteria.zone, criteria.region)
        else {
            continue;
        };

        if let Some(token) = token {
            if !matches_token(product, token) {
                continue;
            }
            score += SCORE_TOKEN;
        }

        let better = match &best {
            None => true,
            Some(current) => {
                score > current.score
                    || (score == current.score && product.sku < current.product.sku)
            }
        };

        if better {
            best = Some(Candidate { product, score });
        }
    }

    best
}
