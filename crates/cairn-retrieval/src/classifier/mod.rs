//! Query classifier: deterministic heuristics first, the external
//! classification service second, keyword routing as the degraded fallback.

pub mod extraction;
pub mod patterns;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use cairn_core::errors::{CairnError, CairnResult};
use cairn_core::models::query::validate_query_text;
use cairn_core::models::{
    ClassificationSource, ComplexityTier, QueryClassification, RoutingPath,
};
use cairn_core::traits::{IClassificationService, ServiceClassification};

use patterns::{QUALIFIED_NAME, QUOTED, RELATIONSHIP};

/// Stateless; safe to share across requests.
pub struct QueryClassifier {
    service: Option<Arc<dyn IClassificationService>>,
    timeout: Duration,
}

impl QueryClassifier {
    pub fn new(service: Option<Arc<dyn IClassificationService>>, timeout: Duration) -> Self {
        Self { service, timeout }
    }

    /// Heuristics only; never calls out.
    pub fn heuristic_only() -> Self {
        Self::new(None, Duration::ZERO)
    }

    /// Classify `query`. Only invalid input is an error; service trouble
    /// yields a degraded keyword classification.
    pub async fn classify(&self, query: &str) -> CairnResult<QueryClassification> {
        validate_query_text(query)?;

        if let Some(classification) = classify_heuristic(query) {
            debug!(
                primary = %classification.primary,
                rationale = %classification.rationale,
                "heuristic classification"
            );
            return Ok(classification);
        }

        match self.call_service(query).await {
            Ok(raw) => Ok(from_service(query, raw)),
            Err(e) => {
                warn!(error = %e, "classification service unavailable, routing to keyword");
                Ok(degraded(query, &e))
            }
        }
    }

    async fn call_service(&self, query: &str) -> CairnResult<ServiceClassification> {
        let service = self
            .service
            .as_ref()
            .ok_or_else(|| CairnError::ClassificationDegraded {
                reason: "no classification service configured".into(),
            })?;
        match tokio::time::timeout(self.timeout, service.classify(query)).await {
            Ok(Ok(raw)) => Ok(raw),
            Ok(Err(e)) => Err(CairnError::ClassificationDegraded {
                reason: format!("{} failed: {e}", service.name()),
            }),
            Err(_) => Err(CairnError::ClassificationDegraded {
                reason: format!(
                    "{} timed out after {}ms",
                    service.name(),
                    self.timeout.as_millis()
                ),
            }),
        }
    }
}

/// Caller-forced routing.
pub fn forced(query: &str, path: RoutingPath) -> QueryClassification {
    build(
        query,
        path,
        None,
        1.0,
        format!("routing forced to {path}"),
        ClassificationSource::Forced,
    )
}

/// Ambiguous service classifications get an agentic second opinion.
pub fn apply_low_confidence_rule(classification: &mut QueryClassification, min_confidence: f64) {
    if classification.source == ClassificationSource::Service
        && classification.confidence < min_confidence
        && classification.secondary.is_none()
        && classification.primary != RoutingPath::Agentic
    {
        classification.secondary = Some(RoutingPath::Agentic);
        classification.rationale.push_str(&format!(
            "; confidence {:.2} below {:.2}, adding agentic path",
            classification.confidence, min_confidence
        ));
    }
}

/// Deterministic pattern routing. `None` when no pattern applies.
pub fn classify_heuristic(query: &str) -> Option<QueryClassification> {
    let has_identifier = patterns::is_match(&QUALIFIED_NAME, query);

    if patterns::is_match(&RELATIONSHIP, query) {
        let secondary = has_identifier.then_some(RoutingPath::Metadata);
        return Some(build(
            query,
            RoutingPath::Relationship,
            secondary,
            1.0,
            "relationship language".to_string(),
            ClassificationSource::Heuristic,
        ));
    }
    if has_identifier {
        return Some(build(
            query,
            RoutingPath::Metadata,
            Some(RoutingPath::Keyword),
            1.0,
            "qualified identifier".to_string(),
            ClassificationSource::Heuristic,
        ));
    }
    if patterns::is_match(&QUOTED, query) {
        return Some(build(
            query,
            RoutingPath::Keyword,
            Some(RoutingPath::Metadata),
            1.0,
            "quoted literal".to_string(),
            ClassificationSource::Heuristic,
        ));
    }
    None
}

fn from_service(query: &str, raw: ServiceClassification) -> QueryClassification {
    let confidence = if raw.confidence.is_nan() {
        0.0
    } else {
        raw.confidence.clamp(0.0, 1.0)
    };
    let secondary = raw.secondary.filter(|s| *s != raw.primary);
    let rationale = if raw.rationale.trim().is_empty() {
        "classification service".to_string()
    } else {
        raw.rationale
    };
    let mut classification = build(
        query,
        raw.primary,
        secondary,
        confidence,
        rationale,
        ClassificationSource::Service,
    );
    classification.complexity = raw.complexity;
    for entity in raw.entities {
        let entity = entity.trim().to_string();
        if !entity.is_empty()
            && !classification
                .entities
                .iter()
                .any(|e| e.eq_ignore_ascii_case(&entity))
        {
            classification.entities.push(entity);
        }
    }
    classification
}

fn degraded(query: &str, error: &CairnError) -> QueryClassification {
    build(
        query,
        RoutingPath::Keyword,
        None,
        0.0,
        error.to_string(),
        ClassificationSource::Degraded,
    )
}

fn build(
    query: &str,
    primary: RoutingPath,
    secondary: Option<RoutingPath>,
    confidence: f64,
    rationale: String,
    source: ClassificationSource,
) -> QueryClassification {
    let entities = extraction::extract_entities(query);
    let filters = extraction::extract_filters(query);
    let complexity = estimate_complexity(query, primary, entities.len());
    QueryClassification {
        query: query.to_string(),
        primary,
        secondary,
        complexity,
        confidence,
        rationale,
        entities,
        filters,
        source,
    }
}

fn estimate_complexity(query: &str, primary: RoutingPath, entity_count: usize) -> ComplexityTier {
    let words = query.split_whitespace().count();
    match primary {
        RoutingPath::Agentic => ComplexityTier::Complex,
        RoutingPath::Relationship if entity_count > 1 || words > 12 => ComplexityTier::Complex,
        RoutingPath::Relationship => ComplexityTier::Moderate,
        _ if words > 12 => ComplexityTier::Complex,
        _ if words > 4 => ComplexityTier::Moderate,
        _ => ComplexityTier::Simple,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_identifier_routes_to_metadata() {
        let c = classify_heuristic("orders.customer_id").unwrap();
        assert_eq!(c.primary, RoutingPath::Metadata);
        assert_eq!(c.secondary, Some(RoutingPath::Keyword));
        assert_eq!(c.confidence, 1.0);
        assert_eq!(c.source, ClassificationSource::Heuristic);
        assert_eq!(c.filters.qualified_names, vec!["orders.customer_id"]);
    }

    #[test]
    fn relationship_wins_over_identifier() {
        let c = classify_heuristic("what flows into PaymentsTable.CardNumber").unwrap();
        assert_eq!(c.primary, RoutingPath::Relationship);
        assert_eq!(c.secondary, Some(RoutingPath::Metadata));
    }

    #[test]
    fn quoted_literal_routes_to_keyword() {
        let c = classify_heuristic(r#"find "card number""#).unwrap();
        assert_eq!(c.primary, RoutingPath::Keyword);
        assert_eq!(c.secondary, Some(RoutingPath::Metadata));
    }

    #[test]
    fn plain_language_has_no_heuristic() {
        assert!(classify_heuristic("customer contact information").is_none());
    }

    #[test]
    fn low_confidence_rule_only_touches_service_results() {
        let mut c = forced("q", RoutingPath::Semantic);
        c.source = ClassificationSource::Service;
        c.confidence = 0.3;
        apply_low_confidence_rule(&mut c, 0.5);
        assert_eq!(c.secondary, Some(RoutingPath::Agentic));

        let mut d = forced("q", RoutingPath::Keyword);
        d.source = ClassificationSource::Degraded;
        d.confidence = 0.0;
        apply_low_confidence_rule(&mut d, 0.5);
        assert_eq!(d.secondary, None);
    }

    #[test]
    fn service_confidence_is_clamped() {
        let c = from_service(
            "q",
            ServiceClassification {
                primary: RoutingPath::Semantic,
                secondary: Some(RoutingPath::Semantic),
                complexity: ComplexityTier::Moderate,
                confidence: 1.7,
                rationale: String::new(),
                entities: vec!["Orders".into(), " ".into()],
            },
        );
        assert_eq!(c.confidence, 1.0);
        assert_eq!(c.secondary, None);
        assert_eq!(c.entities, vec!["Orders"]);
        assert_eq!(c.complexity, ComplexityTier::Moderate);
    }
}
