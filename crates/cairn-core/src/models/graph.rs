//! Derived graph views returned by the graph store.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::EdgeKind;

/// A node reached during a dependency/dependent traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalHit {
    pub node_id: String,
    pub depth: usize,
    /// Edge kind used to reach this node.
    pub relationship: EdgeKind,
    /// The node this one was reached from.
    pub via: String,
}

/// Direction of a lineage path relative to data flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineageDirection {
    Downstream,
    Upstream,
}

/// Shortest path between two catalog nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineagePath {
    pub source_id: String,
    pub target_id: String,
    pub direction: LineageDirection,
    /// Every node on the path, source first, target last.
    pub nodes: Vec<String>,
    /// Edge kinds between consecutive nodes.
    pub edges: Vec<EdgeKind>,
}

impl LineagePath {
    pub fn hop_count(&self) -> usize {
        self.edges.len()
    }
}

/// How personally identifiable information propagates from a source column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiiFlowPath {
    pub source_id: String,
    pub pii_category: String,
    pub destination_id: String,
    /// Nodes strictly between source and destination, in flow order.
    pub intermediate_ids: Vec<String>,
}

/// Compact upstream/downstream view attached to a search result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineageSummary {
    pub upstream_count: usize,
    pub downstream_count: usize,
    /// Nearest upstream objects (bounded).
    pub upstream: Vec<String>,
    /// Nearest downstream objects (bounded).
    pub downstream: Vec<String>,
}

/// Everything the orchestrator needs about one result, from a single graph call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAnnotation {
    pub node_id: String,
    pub description: String,
    pub lineage: LineageSummary,
    pub pii_category: Option<String>,
    /// PII flows that start or end at this node.
    pub pii_flows: Vec<PiiFlowPath>,
}

/// Graph store statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_type: BTreeMap<String, usize>,
    pub edges_by_kind: BTreeMap<String, usize>,
    pub pii_node_count: usize,
    /// Incremented on every successful rebuild.
    pub generation: u64,
    pub built_at: Option<DateTime<Utc>>,
    pub build_duration_ms: u64,
}
