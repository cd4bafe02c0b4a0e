//! Tests for cairn-observability: metrics, degradation alerts, query log.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;
use cairn_core::config::ObservabilityConfig;
use cairn_core::errors::CairnError;
use cairn_core::models::{
    ClassificationSource, DegradationEvent, ExecutionMetadata, GraphStats, LearningAnalytics,
    PathOutcome, RoutingPath, SearchResponse,
};

use cairn_observability::degradation::{evaluate_alerts, AlertLevel, DegradationTracker};
use cairn_observability::query_log::{QueryLog, QueryLogEntry};
use cairn_observability::ObservabilityEngine;

fn response(query_id: &str, outcomes: Vec<PathOutcome>, cache_hit: bool) -> SearchResponse {
    let metadata = ExecutionMetadata {
        path_outcomes: outcomes,
        cache_hit,
        ..Default::default()
    };
    SearchResponse {
        query_id: query_id.into(),
        original_query: "orders".into(),
        expanded_query: None,
        routing_path: RoutingPath::Keyword,
        results: vec![],
        follow_ups: vec![],
        pii_flows: vec![],
        metadata,
        created_at: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Search metrics
// ---------------------------------------------------------------------------

#[test]
fn responses_update_path_and_request_counters() {
    let mut engine = ObservabilityEngine::new();
    engine.record_response(
        &response(
            "q1",
            vec![
                PathOutcome::succeeded(RoutingPath::Keyword, 3, 10),
                PathOutcome::timed_out(RoutingPath::Semantic, 5000),
            ],
            false,
        ),
        Duration::from_millis(120),
    );
    engine.record_response(&response("q2", vec![], true), Duration::from_millis(2));

    let search = &engine.metrics.search;
    assert_eq!(search.searches, 2);
    assert_eq!(search.cache_hits, 1);
    assert_eq!(search.paths["semantic"].timed_out, 1);
    assert_eq!(search.paths["keyword"].succeeded, 1);
    assert_eq!(search.path_success_rate(RoutingPath::Semantic), 0.0);
    assert_eq!(engine.query_log.count(), 2);

    let first = engine.query_log.entries().next().unwrap();
    assert_eq!(first.failed_paths, vec![RoutingPath::Semantic]);
}

#[test]
fn errors_are_counted_by_kind() {
    let mut engine = ObservabilityEngine::new();
    engine.record_error(&CairnError::invalid("empty"));
    engine.record_error(&CairnError::Cancelled);
    engine.record_error(&CairnError::AllPathsFailed { failures: vec![] });
    let search = &engine.metrics.search;
    assert_eq!(search.invalid_requests, 1);
    assert_eq!(search.cancelled, 1);
    assert_eq!(search.all_paths_failed, 1);
}

#[test]
fn rerank_skips_are_counted() {
    let mut engine = ObservabilityEngine::new();
    engine.record_rerank(true);
    engine.record_rerank(false);
    engine.record_rerank(false);
    assert_eq!(engine.metrics.search.reranks_applied, 1);
    assert_eq!(engine.metrics.search.reranks_skipped, 2);
}

// ---------------------------------------------------------------------------
// Degradation tracking
// ---------------------------------------------------------------------------

#[test]
fn degradation_recovers_per_component() {
    let mut tracker = DegradationTracker::new();
    tracker.record(DegradationEvent::now("classifier", "timeout", "keyword routing"));
    tracker.record(DegradationEvent::now("reranker", "error", "fused order"));
    assert!(tracker.is_degraded("classifier"));
    assert!(tracker.mark_recovered("classifier").is_some());
    assert!(!tracker.is_degraded("classifier"));
    assert_eq!(tracker.active_degradations().len(), 1);
    assert_eq!(tracker.recoveries("classifier"), 1);
}

#[test]
fn service_classification_closes_the_classifier_episode() {
    let mut engine = ObservabilityEngine::new();
    engine.record_classification(ClassificationSource::Degraded, "classification timed out");
    assert!(engine.degradation.is_degraded("classifier"));

    engine.record_classification(ClassificationSource::Heuristic, "qualified identifier");
    assert!(engine.degradation.is_degraded("classifier"));

    engine.record_classification(ClassificationSource::Service, "semantic intent");
    assert!(!engine.degradation.is_degraded("classifier"));
    assert_eq!(engine.metrics.search.degraded_classifications, 1);
    let snapshot = engine.metrics_snapshot().unwrap();
    assert_eq!(snapshot["active_degradations"], 0);
}

#[test]
fn recovered_component_raises_no_critical_alert() {
    let mut engine = ObservabilityEngine::new();
    let mut event = DegradationEvent::now("classifier", "timeout", "keyword routing");
    event.timestamp = Utc::now() - chrono::Duration::hours(2);
    engine.record_degradation(event);
    assert_eq!(engine.degradation_alerts()[0].level, AlertLevel::Critical);

    engine.record_classification(ClassificationSource::Service, "semantic intent");
    assert!(engine.degradation_alerts().is_empty());
}

#[test]
fn repeated_degradation_raises_warning() {
    let mut tracker = DegradationTracker::new();
    for _ in 0..4 {
        tracker.record(DegradationEvent::now("vector_index", "unavailable", "other paths"));
    }
    let alerts = evaluate_alerts(&tracker);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Warning);
}

#[test]
fn long_degradation_is_critical() {
    let mut tracker = DegradationTracker::new();
    let mut event = DegradationEvent::now("graph", "source down", "previous snapshot");
    event.timestamp = Utc::now() - chrono::Duration::hours(2);
    tracker.record(event);
    let alerts = evaluate_alerts(&tracker);
    assert_eq!(alerts[0].level, AlertLevel::Critical);
}

#[test]
fn graph_rebuild_clears_graph_degradation() {
    let mut engine = ObservabilityEngine::new();
    engine.record_graph_rebuild_failure("catalog unreachable");
    assert!(engine.degradation.is_degraded("graph"));
    engine.record_graph_rebuild(&GraphStats {
        node_count: 10,
        edge_count: 4,
        nodes_by_type: BTreeMap::new(),
        edges_by_kind: BTreeMap::new(),
        pii_node_count: 1,
        generation: 2,
        built_at: Some(Utc::now()),
        build_duration_ms: 3,
    });
    assert!(!engine.degradation.is_degraded("graph"));
    assert_eq!(engine.metrics.graph.rebuild_failures, 1);
    assert_eq!(engine.metrics.graph.generation, 2);
}

// ---------------------------------------------------------------------------
// Query log & snapshot
// ---------------------------------------------------------------------------

#[test]
fn query_log_is_bounded() {
    let mut log = QueryLog::with_capacity(3);
    for i in 0..5 {
        log.record(QueryLogEntry::from_response(
            &response(&format!("q{i}"), vec![], false),
            Duration::from_millis(i * 10),
        ));
    }
    assert_eq!(log.count(), 3);
    let recent: Vec<_> = log.recent(2).iter().map(|e| e.query_id.clone()).collect();
    assert_eq!(recent, vec!["q4", "q3"]);
    assert_eq!(log.latency_percentile(0.0), Duration::from_millis(20));
    assert_eq!(log.latency_percentile(1.0), Duration::from_millis(40));
}

#[test]
fn snapshot_serializes_metrics() {
    let mut engine = ObservabilityEngine::with_config(&ObservabilityConfig::default());
    engine.record_learning_update(
        &LearningAnalytics {
            processed_sequence: 42,
            click_through_rate: 0.25,
            ..Default::default()
        },
        7,
    );
    let snapshot = engine.metrics_snapshot().unwrap();
    assert_eq!(snapshot["metrics"]["learning"]["processed_sequence"], 42);
    assert_eq!(snapshot["metrics"]["learning"]["dropped_events"], 7);
    assert_eq!(snapshot["query_log_count"], 0);
}
