//! Routing decisions produced by the query classifier.

use serde::{Deserialize, Serialize};

use super::routing::RoutingPath;

/// How demanding a query is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityTier {
    Simple,
    Moderate,
    Complex,
}

impl ComplexityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        }
    }
}

/// Where a classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// Deterministic pattern match; no external call was made.
    Heuristic,
    /// External AI classification service.
    Service,
    /// The service was unreachable and the safe fallback was used.
    Degraded,
    /// The caller forced a routing path.
    Forced,
}

/// Structured filters pulled out of the query text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedFilters {
    pub databases: Vec<String>,
    pub object_types: Vec<String>,
    pub categories: Vec<String>,
    /// Dotted identifiers such as `orders.customer_id`.
    pub qualified_names: Vec<String>,
}

impl ExtractedFilters {
    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
            && self.object_types.is_empty()
            && self.categories.is_empty()
            && self.qualified_names.is_empty()
    }

    /// Merge another filter set into this one, skipping duplicates.
    pub fn merge(&mut self, other: ExtractedFilters) {
        fn extend_unique(into: &mut Vec<String>, from: Vec<String>) {
            for item in from {
                if !into.iter().any(|existing| existing.eq_ignore_ascii_case(&item)) {
                    into.push(item);
                }
            }
        }
        extend_unique(&mut self.databases, other.databases);
        extend_unique(&mut self.object_types, other.object_types);
        extend_unique(&mut self.categories, other.categories);
        extend_unique(&mut self.qualified_names, other.qualified_names);
    }
}

/// A routing decision for one query. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryClassification {
    pub query: String,
    pub primary: RoutingPath,
    pub secondary: Option<RoutingPath>,
    pub complexity: ComplexityTier,
    /// Confidence in [0.0, 1.0].
    pub confidence: f64,
    pub rationale: String,
    pub entities: Vec<String>,
    pub filters: ExtractedFilters,
    pub source: ClassificationSource,
}

impl QueryClassification {
    /// Paths to fan out to, primary first, without duplicates.
    pub fn paths(&self) -> Vec<RoutingPath> {
        let mut paths = vec![self.primary];
        if let Some(secondary) = self.secondary {
            if secondary != self.primary {
                paths.push(secondary);
            }
        }
        paths
    }

    /// Whether the classification came from the degraded fallback.
    pub fn is_degraded(&self) -> bool {
        self.source == ClassificationSource::Degraded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(primary: RoutingPath, secondary: Option<RoutingPath>) -> QueryClassification {
        QueryClassification {
            query: "q".into(),
            primary,
            secondary,
            complexity: ComplexityTier::Simple,
            confidence: 1.0,
            rationale: String::new(),
            entities: Vec::new(),
            filters: ExtractedFilters::default(),
            source: ClassificationSource::Heuristic,
        }
    }

    #[test]
    fn paths_deduplicates_secondary() {
        let c = classification(RoutingPath::Keyword, Some(RoutingPath::Keyword));
        assert_eq!(c.paths(), vec![RoutingPath::Keyword]);

        let c = classification(RoutingPath::Metadata, Some(RoutingPath::Keyword));
        assert_eq!(c.paths(), vec![RoutingPath::Metadata, RoutingPath::Keyword]);
    }

    #[test]
    fn merge_skips_case_insensitive_duplicates() {
        let mut a = ExtractedFilters {
            databases: vec!["Sales".into()],
            ..Default::default()
        };
        a.merge(ExtractedFilters {
            databases: vec!["sales".into(), "finance".into()],
            ..Default::default()
        });
        assert_eq!(a.databases, vec!["Sales".to_string(), "finance".to_string()]);
    }
}
