//! [`ObservabilityEngine`]: owns metrics, degradation tracking and the query log.

use std::time::Duration;

use cairn_core::config::ObservabilityConfig;
use cairn_core::errors::{CairnError, CairnResult};
use cairn_core::models::{
    ClassificationSource, DegradationEvent, GraphStats, LearningAnalytics, SearchResponse,
};

use crate::degradation::{evaluate_alerts, DegradationAlert, DegradationTracker};
use crate::metrics::MetricsCollector;
use crate::query_log::{QueryLog, QueryLogEntry};
use crate::tracing_setup::events;

pub const CLASSIFIER_COMPONENT: &str = "classifier";
pub const GRAPH_COMPONENT: &str = "graph";

/// Central observability engine that orchestrates all subsystems.
#[derive(Debug)]
pub struct ObservabilityEngine {
    pub metrics: MetricsCollector,
    pub degradation: DegradationTracker,
    pub query_log: QueryLog,
}

impl ObservabilityEngine {
    pub fn new() -> Self {
        Self::with_config(&ObservabilityConfig::default())
    }

    pub fn with_config(config: &ObservabilityConfig) -> Self {
        Self {
            metrics: MetricsCollector::new(),
            degradation: DegradationTracker::new(),
            query_log: QueryLog::with_capacity(config.query_log_capacity),
        }
    }

    /// Record a served response: path outcomes, request counters, query log.
    pub fn record_response(&mut self, response: &SearchResponse, latency: Duration) {
        let meta = &response.metadata;
        for outcome in &meta.path_outcomes {
            self.metrics.search.record_path(outcome);
            if !outcome.is_success() {
                events::path_failed(
                    &response.query_id,
                    outcome.path.as_str(),
                    outcome.reason.as_deref().unwrap_or("unknown"),
                    outcome.elapsed_ms,
                );
            }
        }
        self.metrics
            .search
            .record_search(response.routing_path, meta.cache_hit, meta.degraded);
        if meta.cache_hit {
            events::cache_hit(&response.query_id, &response.original_query);
        }
        self.query_log
            .record(QueryLogEntry::from_response(response, latency));
        events::search_completed(
            &response.query_id,
            response.routing_path.as_str(),
            response.results.len(),
            latency.as_millis() as u64,
            meta.degraded,
        );
    }

    /// Record a request that ended in an error instead of a response.
    pub fn record_error(&mut self, error: &CairnError) {
        match error {
            CairnError::InvalidInput { .. } => self.metrics.search.record_invalid(),
            CairnError::AllPathsFailed { .. } => self.metrics.search.record_all_paths_failed(),
            CairnError::Cancelled => self.metrics.search.record_cancelled(),
            _ => {}
        }
    }

    pub fn record_rerank(&mut self, applied: bool) {
        self.metrics.search.record_rerank(applied);
    }

    /// A degraded classification opens (or extends) the classifier episode;
    /// the next answer from the service closes it. Heuristic and forced
    /// routing never reach the service and leave the episode untouched.
    pub fn record_classification(&mut self, source: ClassificationSource, reason: &str) {
        match source {
            ClassificationSource::Degraded => {
                self.metrics.search.record_degraded_classification();
                self.record_degradation(DegradationEvent::now(
                    CLASSIFIER_COMPONENT,
                    reason,
                    "keyword routing",
                ));
            }
            ClassificationSource::Service => self.mark_recovered(CLASSIFIER_COMPONENT),
            ClassificationSource::Heuristic | ClassificationSource::Forced => {}
        }
    }

    pub fn record_degradation(&mut self, event: DegradationEvent) {
        self.degradation.record(event);
    }

    pub fn mark_recovered(&mut self, component: &str) {
        self.degradation.mark_recovered(component);
    }

    pub fn degradation_alerts(&self) -> Vec<DegradationAlert> {
        evaluate_alerts(&self.degradation)
    }

    pub fn record_graph_rebuild(&mut self, stats: &GraphStats) {
        self.metrics.graph.record_rebuild(stats);
        self.mark_recovered(GRAPH_COMPONENT);
        events::graph_rebuilt(
            stats.generation,
            stats.node_count,
            stats.edge_count,
            stats.build_duration_ms,
        );
    }

    pub fn record_graph_rebuild_failure(&mut self, reason: &str) {
        self.metrics.graph.record_rebuild_failure();
        self.record_degradation(DegradationEvent::now(
            GRAPH_COMPONENT,
            reason,
            "previous snapshot",
        ));
    }

    pub fn record_learning_update(&mut self, analytics: &LearningAnalytics, dropped: u64) {
        self.metrics.learning.record_update(analytics);
        self.metrics.learning.set_dropped(dropped);
        events::learning_update_completed(
            analytics.processed_sequence,
            analytics.total_responses,
            analytics.total_interactions,
        );
    }

    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Current metrics and query log summary as JSON.
    pub fn metrics_snapshot(&self) -> CairnResult<serde_json::Value> {
        let metrics_json = serde_json::to_value(&self.metrics)?;
        Ok(serde_json::json!({
            "metrics": metrics_json,
            "query_log_count": self.query_log.count(),
            "query_avg_latency_ms": self.query_log.avg_latency().as_millis() as u64,
            "query_p95_latency_ms": self.query_log.latency_percentile(0.95).as_millis() as u64,
            "active_degradations": self.degradation.active_degradations().len(),
        }))
    }
}

impl Default for ObservabilityEngine {
    fn default() -> Self {
        Self::new()
    }
}
