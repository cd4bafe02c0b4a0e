use serde::{Deserialize, Serialize};

use super::defaults;

/// Graph store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub max_traversal_depth: usize,
    /// Node visits allowed for one lineage-path search.
    pub visit_budget: usize,
    /// Interval between scheduled rebuilds (seconds). 0 disables the schedule.
    pub rebuild_interval_secs: u64,
    /// Nearest upstream/downstream ids kept in a lineage summary.
    pub lineage_summary_limit: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_traversal_depth: defaults::DEFAULT_MAX_TRAVERSAL_DEPTH,
            visit_budget: defaults::DEFAULT_VISIT_BUDGET,
            rebuild_interval_secs: defaults::DEFAULT_REBUILD_INTERVAL_SECS,
            lineage_summary_limit: defaults::DEFAULT_LINEAGE_SUMMARY_LIMIT,
        }
    }
}
