//! Breadth-first, depth-bounded walk in one lineage direction.

use std::collections::{HashSet, VecDeque};

use petgraph::graph::NodeIndex;

use cairn_core::models::{LineageDirection, TraversalHit};

use crate::graph::CatalogGraph;

/// Walk from `start`, reporting every reachable node once with its BFS depth.
/// The start node itself is never reported. Cycles terminate on the visited set.
pub fn walk(
    graph: &CatalogGraph,
    start: NodeIndex,
    direction: LineageDirection,
    max_depth: usize,
) -> Vec<TraversalHit> {
    let mut hits = Vec::new();

    let mut visited = HashSet::new();
    visited.insert(start);

    let mut queue = VecDeque::new();
    queue.push_back((start, 0_usize));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for (neighbor, kind) in graph.neighbors(current, direction) {
            if !visited.insert(neighbor) {
                continue;
            }
            hits.push(TraversalHit {
                node_id: graph.node(neighbor).id.clone(),
                depth: depth + 1,
                relationship: kind,
                via: graph.node(current).id.clone(),
            });
            queue.push_back((neighbor, depth + 1));
        }
    }

    hits
}
