//! Resolution error types.
//!
//! Every error is scoped to one resource: callers record it and move on to
//! the next change.

use std::fmt;

/// Error returned when a resource change cannot be matched to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render(.kind, .reason))]
pub struct MappingError {
    /// The kind of resolution failure.
    pub kind: MappingErrorKind,
    /// Human-readable reason, including attempted filters where relevant.
    pub reason: String,
}

impl MappingError {
    /// Create a new mapping error.
    pub fn new(kind: MappingErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    /// The resource type has no mapping rule.
    pub fn not_implemented() -> Self {
        Self::new(MappingErrorKind::NotImplemented, "not implemented")
    }

    /// The rule needs `attribute` and the change does not carry it.
    pub fn missing_attribute(attribute: &str) -> Self {
        Self::new(
            MappingErrorKind::MissingRequiredAttribute,
            format!("missing required attribute: {}", attribute),
        )
    }

    /// No catalog entry passed the rule's filters.
    ///
    /// The reason lists the attempted type/zone/region, omitting whichever
    /// are absent.
    pub fn no_catalog_match(
        type_filter: Option<(&str, &str)>,
        zone: Option<&str>,
        region: Option<&str>,
    ) -> Self {
        let mut parts = Vec::with_capacity(3);

        if let Some((key, value)) = type_filter {
            parts.push(format!("{}={}", key, value));
        }
        if let Some(zone) = zone {
            parts.push(format!("zone={}", zone));
        }
        if let Some(region) = region {
            parts.push(format!("region={}", region));
        }

        let mut reason = "no catalog match".to_string();
        if !parts.is_empty() {
            reason.push_str(&format!(" ({})", parts.join(", ")));
        }

        Self::new(MappingErrorKind::NoCatalogMatch, reason)
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

fn render(kind: &MappingErrorKind, reason: &str) -> String {
    if reason.is_empty() {
        kind.code().to_string()
    } else {
        format!("{}: {}", kind.code(), reason)
    }
}

/// Categories of resolution failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingErrorKind {
    /// The resource type has no mapping rule.
    NotImplemented,
    /// The rule requires an attribute the change lacks.
    MissingRequiredAttribute,
    /// A rule ran but no catalog entry qualified.
    NoCatalogMatch,
}

impl MappingErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            MappingErrorKind::NotImplemented => "not_implemented",
            MappingErrorKind::MissingRequiredAttribute => "missing_required_attribute",
            MappingErrorKind::NoCatalogMatch => "no_catalog_match",
        }
    }
}

impl fmt::Display for MappingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_catalog_match_lists_attempted_filters() {
        let err = MappingError::no_catalog_match(Some(("type", "DEV1-M")), Some("fr-par-2"), None);
        assert_eq!(err.reason, "no catalog match (type=DEV1-M, zone=fr-par-2)");
        assert_eq!(
            err.to_string(),
            "no_catalog_match: no catalog match (type=DEV1-M, zone=fr-par-2)"
        );

        let bare = MappingError::no_catalog_match(None, None, None);
        assert_eq!(bare.reason, "no catalog match");
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(MappingError::not_implemented().code(), "not_implemented");
        assert_eq!(
            MappingError::missing_attribute("node_type").to_string(),
            "missing_required_attribute: missing required attribute: node_type"
        );
        assert_eq!(MappingError::new(MappingErrorKind::NotImplemented, "").to_string(), "not_implemented");
    }
}
