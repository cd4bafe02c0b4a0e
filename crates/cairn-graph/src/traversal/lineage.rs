//! Shortest lineage path between two nodes.

use std::collections::{HashMap, VecDeque};

use petgraph::graph::NodeIndex;

use cairn_core::models::{EdgeKind, LineageDirection, LineagePath};

use crate::graph::CatalogGraph;

/// Shortest path by edge count, trying downstream first and then upstream.
///
/// Unknown endpoints, no path within `max_depth`, or an exhausted visit
/// budget all yield `None`.
pub fn find_path(
    graph: &CatalogGraph,
    source: &str,
    target: &str,
    max_depth: usize,
    visit_budget: usize,
) -> Option<LineagePath> {
    let source_idx = graph.resolve(source).and_then(|o| graph.index_of(&o.id))?;
    let target_idx = graph.resolve(target).and_then(|o| graph.index_of(&o.id))?;

    [LineageDirection::Downstream, LineageDirection::Upstream]
        .into_iter()
        .find_map(|direction| {
            shortest(graph, source_idx, target_idx, direction, max_depth, visit_budget)
                .map(|(nodes, edges)| LineagePath {
                    source_id: graph.node(source_idx).id.clone(),
                    target_id: graph.node(target_idx).id.clone(),
                    direction,
                    nodes: nodes.into_iter().map(|n| graph.node(n).id.clone()).collect(),
                    edges,
                })
        })
}

fn shortest(
    graph: &CatalogGraph,
    source: NodeIndex,
    target: NodeIndex,
    direction: LineageDirection,
    max_depth: usize,
    visit_budget: usize,
) -> Option<(Vec<NodeIndex>, Vec<EdgeKind>)> {
    if source == target {
        return Some((vec![source], Vec::new()));
    }

    // node -> (predecessor, edge used)
    let mut parents: HashMap<NodeIndex, (NodeIndex, EdgeKind)> = HashMap::new();
    let mut queue = VecDeque::new();
    queue.push_back((source, 0_usize));
    let mut visits = 1_usize;

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for (neighbor, kind) in graph.neighbors(current, direction) {
            if neighbor == source || parents.contains_key(&neighbor) {
                continue;
            }
            parents.insert(neighbor, (current, kind));
            if neighbor == target {
                return Some(unwind(&parents, source, target));
            }
            visits += 1;
            if visits > visit_budget {
                return None;
            }
            queue.push_back((neighbor, depth + 1));
        }
    }
    None
}

fn unwind(
    parents: &HashMap<NodeIndex, (NodeIndex, EdgeKind)>,
    source: NodeIndex,
    target: NodeIndex,
) -> (Vec<NodeIndex>, Vec<EdgeKind>) {
    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut cursor = target;
    while cursor != source {
        match parents.get(&cursor) {
            Some(&(prev, kind)) => {
                nodes.push(prev);
                edges.push(kind);
                cursor = prev;
            }
            None => break,
        }
    }
    nodes.reverse();
    edges.reverse();
    (nodes, edges)
}
