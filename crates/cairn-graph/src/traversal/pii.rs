//! PII propagation: downstream reachability from PII-tagged objects.

use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use cairn_core::models::{LineageDirection, PiiFlowPath};

use crate::graph::CatalogGraph;

use super::walk;

/// One flow per downstream node reachable from `source`.
pub fn trace_from(graph: &CatalogGraph, source: NodeIndex, max_depth: usize) -> Vec<PiiFlowPath> {
    let origin = graph.node(source);
    let Some(category) = origin.pii_category.as_deref() else {
        return Vec::new();
    };

    let hits = walk::walk(graph, source, LineageDirection::Downstream, max_depth);
    let via: HashMap<&str, &str> = hits
        .iter()
        .map(|h| (h.node_id.as_str(), h.via.as_str()))
        .collect();

    hits.iter()
        .map(|hit| {
            let mut intermediate_ids = Vec::new();
            let mut cursor = hit.via.as_str();
            while cursor != origin.id {
                intermediate_ids.push(cursor.to_string());
                match via.get(cursor) {
                    Some(prev) => cursor = *prev,
                    None => break,
                }
            }
            intermediate_ids.reverse();
            PiiFlowPath {
                source_id: origin.id.clone(),
                pii_category: category.to_string(),
                destination_id: hit.node_id.clone(),
                intermediate_ids,
            }
        })
        .collect()
}

/// Flows from every PII-tagged object, ordered by source id.
pub fn trace_all(graph: &CatalogGraph, max_depth: usize) -> Vec<PiiFlowPath> {
    graph
        .pii_objects()
        .into_iter()
        .filter_map(|object| graph.index_of(&object.id))
        .flat_map(|idx| trace_from(graph, idx, max_depth))
        .collect()
}
