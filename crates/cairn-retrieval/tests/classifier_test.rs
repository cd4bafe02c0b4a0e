//! Classifier behaviour against a mock classification service.

use std::sync::Arc;
use std::time::Duration;

use cairn_core::errors::CairnError;
use cairn_core::models::{ClassificationSource, ComplexityTier, RoutingPath};
use cairn_core::traits::ServiceClassification;
use cairn_retrieval::classifier::apply_low_confidence_rule;
use cairn_retrieval::QueryClassifier;
use test_fixtures::MockClassificationService;

fn semantic(confidence: f64) -> ServiceClassification {
    ServiceClassification {
        primary: RoutingPath::Semantic,
        secondary: None,
        complexity: ComplexityTier::Simple,
        confidence,
        rationale: "descriptive question".into(),
        entities: vec![],
    }
}

fn classifier(service: Arc<MockClassificationService>) -> QueryClassifier {
    QueryClassifier::new(Some(service), Duration::from_millis(200))
}

#[tokio::test]
async fn heuristic_hit_never_calls_the_service() {
    let service = Arc::new(MockClassificationService::returning(semantic(0.9)));
    let c = classifier(service.clone())
        .classify("orders.customer_id")
        .await
        .unwrap();
    assert_eq!(c.primary, RoutingPath::Metadata);
    assert_eq!(c.source, ClassificationSource::Heuristic);
    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn plain_language_goes_to_the_service() {
    let service = Arc::new(MockClassificationService::returning(semantic(0.9)));
    let c = classifier(service.clone())
        .classify("where do we keep customer contact details")
        .await
        .unwrap();
    assert_eq!(c.primary, RoutingPath::Semantic);
    assert_eq!(c.source, ClassificationSource::Service);
    assert_eq!(c.confidence, 0.9);
    assert_eq!(service.call_count(), 1);
}

#[tokio::test]
async fn failing_service_degrades_to_keyword() {
    let service = Arc::new(MockClassificationService::failing());
    let c = classifier(service)
        .classify("customer contact details")
        .await
        .unwrap();
    assert_eq!(c.primary, RoutingPath::Keyword);
    assert_eq!(c.confidence, 0.0);
    assert!(c.is_degraded());
    assert!(c.rationale.contains("mock-classifier"));
}

#[tokio::test]
async fn slow_service_degrades_on_timeout() {
    let service = Arc::new(MockClassificationService::returning(semantic(0.9)));
    service.set_delay(Duration::from_millis(500));
    let c = QueryClassifier::new(Some(service), Duration::from_millis(20))
        .classify("customer contact details")
        .await
        .unwrap();
    assert_eq!(c.source, ClassificationSource::Degraded);
    assert!(c.rationale.contains("timed out"));
}

#[tokio::test]
async fn missing_service_degrades() {
    let c = QueryClassifier::heuristic_only()
        .classify("customer contact details")
        .await
        .unwrap();
    assert_eq!(c.primary, RoutingPath::Keyword);
    assert!(c.is_degraded());
}

#[tokio::test]
async fn invalid_text_is_rejected() {
    let classifier = QueryClassifier::heuristic_only();
    assert!(matches!(
        classifier.classify("   ").await,
        Err(CairnError::InvalidInput { .. })
    ));
    assert!(matches!(
        classifier.classify(&"x".repeat(501)).await,
        Err(CairnError::InvalidInput { .. })
    ));
}

#[tokio::test]
async fn ambiguous_service_answer_gets_agentic_secondary() {
    let service = Arc::new(MockClassificationService::returning(semantic(0.3)));
    let mut c = classifier(service)
        .classify("stuff about money")
        .await
        .unwrap();
    apply_low_confidence_rule(&mut c, 0.5);
    assert_eq!(c.paths(), vec![RoutingPath::Semantic, RoutingPath::Agentic]);
}

#[tokio::test]
async fn filters_are_extracted_for_service_answers() {
    let service = Arc::new(MockClassificationService::returning(semantic(0.9)));
    let c = classifier(service)
        .classify("payment tables in database finance")
        .await
        .unwrap();
    assert_eq!(c.filters.object_types, vec!["table"]);
    assert_eq!(c.filters.databases, vec!["finance"]);
}
