//! Locality scoring.
//!
//! A product is zone-scoped, region-scoped or global. Given the zone and/or
//! region a resource is deployed in, each product either gets a score
//! (closer is higher) or is rejected.
//!
//! With a zone requested:
//!
//! | product                                   | score |
//! |-------------------------------------------|-------|
//! | same zone                                 | 50    |
//! | region == region of requested zone        | 35    |
//! | region == requested region                | 35    |
//! | zone in the same region as requested zone | 30    |
//! | global                                    | 5     |
//!
//! With only a region requested: same region 40, zone inside that region
//! 35, global 5. With neither, everything scores 1.

use impact_core::Locality;

pub const SCORE_ZONE: u32 = 50;
pub const SCORE_REGION_EXACT: u32 = 40;
pub const SCORE_REGION: u32 = 35;
pub const SCORE_SIBLING_ZONE: u32 = 30;
pub const SCORE_GLOBAL: u32 = 5;
pub const SCORE_ANY: u32 = 1;

/// Score `locality` against the requested zone/region. `None` rejects the
/// product.
pub fn score_locality(locality: &Locality, zone: Option<&str>, region: Option<&str>) -> Option<u32> {
    let zone = zone.map(str::trim).filter(|z| !z.is_empty());
    let region = region.map(str::trim).filter(|r| !r.is_empty());

    if let Some(zone) = zone {
        if locality.zone.eq_ignore_ascii_case(zone) {
            return Some(SCORE_ZONE);
        }

        let zone_region = region_from_zone(zone);
        if !zone_region.is_empty() && locality.region.eq_ignore_ascii_case(&zone_region) {
            return Some(SCORE_REGION);
        }

        if let Some(region) = region
            && locality.region.eq_ignore_ascii_case(region)
        {
            return Some(SCORE_REGION);
        }

        if !zone_region.is_empty() && region_from_zone(&locality.zone) == zone_region {
            return Some(SCORE_SIBLING_ZONE);
        }

        return locality.is_global().then_some(SCORE_GLOBAL);
    }

    if let Some(region) = region {
        if locality.region.eq_ignore_ascii_case(region) {
            return Some(SCORE_REGION_EXACT);
        }

        if region_from_zone(&locality.zone).eq_ignore_ascii_case(region) {
            return Some(SCORE_REGION);
        }

        return locality.is_global().then_some(SCORE_GLOBAL);
    }

    Some(SCORE_ANY)
}

/// First two hyphen-delimited tokens of a zone, lower-cased
/// (`fr-par-2` -> `fr-par`). Empty when the zone has fewer than two.
pub fn region_from_zone(zone: &str) -> String {
    let zone = zone.trim().to_lowercase();
    let mut parts = zone.split('-');
    match (parts.next(), parts.next()) {
        (Some(country), Some(city)) => format!("{}-{}", country, city),
        _ => String::new(),
    }
}
