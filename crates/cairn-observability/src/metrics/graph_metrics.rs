//! Graph rebuild counters and the shape of the current snapshot.

use serde::{Deserialize, Serialize};

use cairn_core::models::GraphStats;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphMetrics {
    pub rebuilds: u64,
    pub rebuild_failures: u64,
    pub generation: u64,
    pub node_count: usize,
    pub edge_count: usize,
    pub pii_node_count: usize,
    pub last_build_ms: u64,
}

impl GraphMetrics {
    pub fn record_rebuild(&mut self, stats: &GraphStats) {
        self.rebuilds += 1;
        self.generation = stats.generation;
        self.node_count = stats.node_count;
        self.edge_count = stats.edge_count;
        self.pii_node_count = stats.pii_node_count;
        self.last_build_ms = stats.build_duration_ms;
    }

    pub fn record_rebuild_failure(&mut self) {
        self.rebuild_failures += 1;
    }
}
