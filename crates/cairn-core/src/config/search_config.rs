use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::RoutingPath;

/// Search orchestration configuration. All timeouts are milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_max_results: usize,
    pub default_min_confidence: f64,
    /// Wall-clock budget for a whole request.
    pub outer_deadline_ms: u64,
    pub classifier_timeout_ms: u64,
    pub rerank_timeout_ms: u64,
    pub keyword_timeout_ms: u64,
    pub metadata_timeout_ms: u64,
    pub relationship_timeout_ms: u64,
    pub semantic_timeout_ms: u64,
    pub agentic_timeout_ms: u64,
    /// How many top results get lineage/PII annotations.
    pub annotate_top_n: usize,
    pub lineage_summary_depth: usize,
    pub max_follow_ups: usize,
    pub autocomplete_max: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_max_results: defaults::DEFAULT_MAX_RESULTS,
            default_min_confidence: defaults::DEFAULT_MIN_CONFIDENCE,
            outer_deadline_ms: defaults::DEFAULT_OUTER_DEADLINE_MS,
            classifier_timeout_ms: defaults::DEFAULT_CLASSIFIER_TIMEOUT_MS,
            rerank_timeout_ms: defaults::DEFAULT_RERANK_TIMEOUT_MS,
            keyword_timeout_ms: defaults::DEFAULT_KEYWORD_TIMEOUT_MS,
            metadata_timeout_ms: defaults::DEFAULT_METADATA_TIMEOUT_MS,
            relationship_timeout_ms: defaults::DEFAULT_RELATIONSHIP_TIMEOUT_MS,
            semantic_timeout_ms: defaults::DEFAULT_SEMANTIC_TIMEOUT_MS,
            agentic_timeout_ms: defaults::DEFAULT_AGENTIC_TIMEOUT_MS,
            annotate_top_n: defaults::DEFAULT_ANNOTATE_TOP_N,
            lineage_summary_depth: defaults::DEFAULT_LINEAGE_SUMMARY_DEPTH,
            max_follow_ups: defaults::DEFAULT_MAX_FOLLOW_UPS,
            autocomplete_max: defaults::DEFAULT_AUTOCOMPLETE_MAX,
        }
    }
}

impl SearchConfig {
    /// Per-path retrieval timeout.
    pub fn path_timeout(&self, path: RoutingPath) -> Duration {
        let ms = match path {
            RoutingPath::Keyword => self.keyword_timeout_ms,
            RoutingPath::Metadata => self.metadata_timeout_ms,
            RoutingPath::Relationship => self.relationship_timeout_ms,
            RoutingPath::Semantic => self.semantic_timeout_ms,
            RoutingPath::Agentic => self.agentic_timeout_ms,
        };
        Duration::from_millis(ms)
    }

    pub fn outer_deadline(&self) -> Duration {
        Duration::from_millis(self.outer_deadline_ms)
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_millis(self.classifier_timeout_ms)
    }

    pub fn rerank_timeout(&self) -> Duration {
        Duration::from_millis(self.rerank_timeout_ms)
    }
}
