//! Query performance logging: query id, normalized text, routing, latency,
//! result count, failed paths, cache hits.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cairn_core::models::{RoutingPath, SearchResponse};

/// A single query log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub query_id: String,
    pub query: String,
    pub routing_path: RoutingPath,
    pub latency: Duration,
    pub result_count: usize,
    pub failed_paths: Vec<RoutingPath>,
    pub cache_hit: bool,
    pub degraded: bool,
    pub timestamp_epoch_ms: i64,
}

impl QueryLogEntry {
    /// Entry for a served response, timestamped now.
    pub fn from_response(response: &SearchResponse, latency: Duration) -> Self {
        Self {
            query_id: response.query_id.clone(),
            query: response.original_query.clone(),
            routing_path: response.routing_path,
            latency,
            result_count: response.results.len(),
            failed_paths: response.metadata.failed_paths().map(|o| o.path).collect(),
            cache_hit: response.metadata.cache_hit,
            degraded: response.metadata.degraded,
            timestamp_epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Bounded query log; the oldest entries fall off.
#[derive(Debug, Clone)]
pub struct QueryLog {
    entries: VecDeque<QueryLogEntry>,
    max_entries: usize,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryLog {
    pub fn new() -> Self {
        Self::with_capacity(cairn_core::config::defaults::DEFAULT_QUERY_LOG_CAPACITY)
    }

    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn record(&mut self, entry: QueryLogEntry) {
        tracing::debug!(
            event = "query_logged",
            query_id = %entry.query_id,
            routing_path = %entry.routing_path,
            latency_ms = entry.latency.as_millis() as u64,
            result_count = entry.result_count,
            cache_hit = entry.cache_hit,
            "query logged"
        );

        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueryLogEntry> {
        self.entries.iter()
    }

    /// Most recent `n` entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<&QueryLogEntry> {
        self.entries.iter().rev().take(n).collect()
    }

    pub fn avg_latency(&self) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.entries.iter().map(|e| e.latency).sum();
        total / self.entries.len() as u32
    }

    /// Latency at the given percentile (0.0 to 1.0).
    pub fn latency_percentile(&self, p: f64) -> Duration {
        if self.entries.is_empty() {
            return Duration::ZERO;
        }
        let mut latencies: Vec<Duration> = self.entries.iter().map(|e| e.latency).collect();
        latencies.sort();
        let idx = ((p.clamp(0.0, 1.0) * (latencies.len() - 1) as f64).round() as usize)
            .min(latencies.len() - 1);
        latencies[idx]
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }
}
