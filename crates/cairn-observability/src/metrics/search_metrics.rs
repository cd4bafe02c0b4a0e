//! Per-path outcomes and latency, routing distribution, cache hits, rerank
//! skips and request-level failures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cairn_core::models::{PathOutcome, PathStatus, RoutingPath};

/// Outcome counts for one routing path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathCounters {
    pub succeeded: u64,
    pub failed: u64,
    pub timed_out: u64,
    pub total_latency_ms: u64,
    pub total_candidates: u64,
}

impl PathCounters {
    pub fn runs(&self) -> u64 {
        self.succeeded + self.failed + self.timed_out
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchMetrics {
    pub searches: u64,
    pub cache_hits: u64,
    pub degraded_responses: u64,
    pub degraded_classifications: u64,
    pub all_paths_failed: u64,
    pub cancelled: u64,
    pub invalid_requests: u64,
    pub reranks_applied: u64,
    pub reranks_skipped: u64,
    /// Requests per primary routing path.
    pub routing_distribution: BTreeMap<String, u64>,
    pub paths: BTreeMap<String, PathCounters>,
}

impl SearchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a served response.
    pub fn record_search(&mut self, routing_path: RoutingPath, cache_hit: bool, degraded: bool) {
        self.searches += 1;
        *self
            .routing_distribution
            .entry(routing_path.as_str().to_string())
            .or_default() += 1;
        if cache_hit {
            self.cache_hits += 1;
        }
        if degraded {
            self.degraded_responses += 1;
        }
    }

    pub fn record_path(&mut self, outcome: &PathOutcome) {
        let counters = self.paths.entry(outcome.path.as_str().to_string()).or_default();
        match outcome.status {
            PathStatus::Succeeded => counters.succeeded += 1,
            PathStatus::Failed => counters.failed += 1,
            PathStatus::TimedOut => counters.timed_out += 1,
        }
        counters.total_latency_ms += outcome.elapsed_ms;
        counters.total_candidates += outcome.candidate_count as u64;
    }

    pub fn record_rerank(&mut self, applied: bool) {
        if applied {
            self.reranks_applied += 1;
        } else {
            self.reranks_skipped += 1;
        }
    }

    pub fn record_degraded_classification(&mut self) {
        self.degraded_classifications += 1;
    }

    pub fn record_all_paths_failed(&mut self) {
        self.all_paths_failed += 1;
    }

    pub fn record_cancelled(&mut self) {
        self.cancelled += 1;
    }

    pub fn record_invalid(&mut self) {
        self.invalid_requests += 1;
    }

    pub fn cache_hit_rate(&self) -> f64 {
        if self.searches == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / self.searches as f64
    }

    /// Fraction of runs of `path` that succeeded; 0 when it never ran.
    pub fn path_success_rate(&self, path: RoutingPath) -> f64 {
        match self.paths.get(path.as_str()) {
            Some(c) if c.runs() > 0 => c.succeeded as f64 / c.runs() as f64,
            _ => 0.0,
        }
    }

    pub fn avg_path_latency_ms(&self, path: RoutingPath) -> f64 {
        match self.paths.get(path.as_str()) {
            Some(c) if c.runs() > 0 => c.total_latency_ms as f64 / c.runs() as f64,
            _ => 0.0,
        }
    }
}
