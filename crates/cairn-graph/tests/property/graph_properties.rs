//! Property tests for cairn-graph: traversal termination and uniqueness on
//! arbitrary (possibly cyclic) graphs.

use std::collections::HashSet;

use proptest::prelude::*;

use cairn_core::models::{CatalogDependency, CatalogObject, EdgeKind, ObjectType};
use cairn_graph::graph::CatalogGraph;
use cairn_graph::traversal::{TraversalConfig, TraversalEngine};

fn object(i: usize) -> CatalogObject {
    CatalogObject {
        id: format!("db.dbo.n{i}"),
        object_type: ObjectType::Table,
        name: format!("n{i}"),
        database: "db".into(),
        schema: Some("dbo".into()),
        parent_id: None,
        description: String::new(),
        category: None,
        pii_category: (i % 4 == 0).then(|| "email".to_string()),
        data_type: None,
        properties: Default::default(),
    }
}

fn kind(k: u8) -> EdgeKind {
    EdgeKind::ALL[k as usize % EdgeKind::ALL.len()]
}

/// Build an arbitrary directed graph; cycles and self-loops allowed.
fn build_graph(n: usize, edges: &[(usize, usize, u8)]) -> CatalogGraph {
    let mut graph = CatalogGraph::new(1);
    for i in 0..n {
        graph.add_node(object(i));
    }
    for &(src, tgt, k) in edges {
        graph
            .add_edge(&CatalogDependency {
                source_id: format!("db.dbo.n{}", src % n),
                target_id: format!("db.dbo.n{}", tgt % n),
                kind: kind(k),
            })
            .unwrap();
    }
    graph
}

fn edge_strategy(n: usize) -> impl Strategy<Value = Vec<(usize, usize, u8)>> {
    prop::collection::vec((0..n, 0..n, 0_u8..3), 0..n * 3)
}

// =============================================================================
// No node is reported twice and the start node is never reported
// =============================================================================
proptest! {
    #[test]
    fn traversal_never_repeats_a_node(
        max_depth in 0_usize..=10,
        edges in edge_strategy(15)
    ) {
        let graph = build_graph(15, &edges);
        let engine = TraversalEngine::new(TraversalConfig::default());

        for i in 0..15 {
            let start = format!("db.dbo.n{i}");
            for hits in [
                engine.dependents(&graph, &start, max_depth).unwrap(),
                engine.dependencies(&graph, &start, max_depth).unwrap(),
            ] {
                let mut seen = HashSet::new();
                for hit in &hits {
                    prop_assert!(seen.insert(hit.node_id.clone()), "{} reported twice", hit.node_id);
                    prop_assert_ne!(&hit.node_id, &start);
                    prop_assert!(hit.depth >= 1 && hit.depth <= max_depth);
                }
            }
        }
    }
}

// =============================================================================
// BFS depths are non-decreasing in output order
// =============================================================================
proptest! {
    #[test]
    fn traversal_reports_nearest_first(edges in edge_strategy(12)) {
        let graph = build_graph(12, &edges);
        let engine = TraversalEngine::new(TraversalConfig::default());
        let hits = engine.dependents(&graph, "db.dbo.n0", 10).unwrap();
        for pair in hits.windows(2) {
            prop_assert!(pair[0].depth <= pair[1].depth);
        }
    }
}

// =============================================================================
// A found lineage path is well-formed and no longer than the depth bound
// =============================================================================
proptest! {
    #[test]
    fn lineage_paths_are_well_formed(
        edges in edge_strategy(12),
        a in 0_usize..12,
        b in 0_usize..12
    ) {
        let graph = build_graph(12, &edges);
        let engine = TraversalEngine::new(TraversalConfig::default());
        let source = format!("db.dbo.n{a}");
        let target = format!("db.dbo.n{b}");
        if let Some(path) = engine.lineage_path(&graph, &source, &target) {
            prop_assert_eq!(path.nodes.first(), Some(&source));
            prop_assert_eq!(path.nodes.last(), Some(&target));
            prop_assert_eq!(path.nodes.len(), path.edges.len() + 1);
            prop_assert!(path.hop_count() <= 10);
            let distinct: HashSet<_> = path.nodes.iter().collect();
            prop_assert_eq!(distinct.len(), path.nodes.len());
        }
    }
}

// =============================================================================
// PII flows start at a tagged node and never revisit a node
// =============================================================================
proptest! {
    #[test]
    fn pii_flows_are_acyclic(edges in edge_strategy(12)) {
        let graph = build_graph(12, &edges);
        let engine = TraversalEngine::new(TraversalConfig::default());
        for flow in engine.all_pii_flows(&graph) {
            prop_assert!(graph.get(&flow.source_id).unwrap().pii_category.is_some());
            let mut seen = HashSet::new();
            seen.insert(flow.source_id.as_str());
            for id in &flow.intermediate_ids {
                prop_assert!(seen.insert(id.as_str()));
            }
            prop_assert!(seen.insert(flow.destination_id.as_str()));
        }
    }
}
