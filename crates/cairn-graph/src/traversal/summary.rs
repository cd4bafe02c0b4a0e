//! Compact per-result lineage view.

use petgraph::graph::NodeIndex;

use cairn_core::models::{LineageDirection, LineageSummary, NodeAnnotation, PiiFlowPath};

use crate::graph::CatalogGraph;

use super::walk;

pub fn lineage_summary(
    graph: &CatalogGraph,
    idx: NodeIndex,
    depth: usize,
    limit: usize,
) -> LineageSummary {
    let upstream = walk::walk(graph, idx, LineageDirection::Upstream, depth);
    let downstream = walk::walk(graph, idx, LineageDirection::Downstream, depth);
    LineageSummary {
        upstream_count: upstream.len(),
        downstream_count: downstream.len(),
        upstream: upstream.into_iter().take(limit).map(|h| h.node_id).collect(),
        downstream: downstream.into_iter().take(limit).map(|h| h.node_id).collect(),
    }
}

/// Lineage summary, PII tag and touching PII flows for one node.
pub fn annotate(
    graph: &CatalogGraph,
    idx: NodeIndex,
    depth: usize,
    limit: usize,
    all_flows: &[PiiFlowPath],
) -> NodeAnnotation {
    let object = graph.node(idx);
    let pii_flows = all_flows
        .iter()
        .filter(|f| f.source_id == object.id || f.destination_id == object.id)
        .cloned()
        .collect();
    NodeAnnotation {
        node_id: object.id.clone(),
        description: object.description.clone(),
        lineage: lineage_summary(graph, idx, depth, limit),
        pii_category: object.pii_category.clone(),
        pii_flows,
    }
}
