//! Builds a fresh `CatalogGraph` from the relational catalog.

use std::time::Instant;

use chrono::Utc;
use tracing::warn;

use cairn_core::errors::{CairnError, CairnResult, GraphError};
use cairn_core::traits::ICatalogSource;

use super::arena::CatalogGraph;

/// What happened while building one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub nodes_added: usize,
    pub edges_added: usize,
    pub duplicate_nodes: usize,
    pub duplicate_edges: usize,
    /// Edges whose endpoints were not in the catalog.
    pub dangling_edges: usize,
}

/// Load every object and dependency from `source` into a new graph.
///
/// Source failures are fatal; malformed rows (duplicates, dangling edges) are
/// skipped and counted.
pub fn build_from_source(
    source: &dyn ICatalogSource,
    generation: u64,
) -> CairnResult<(CatalogGraph, BuildReport)> {
    let started = Instant::now();
    let unavailable = |e: CairnError| {
        CairnError::GraphError(GraphError::SourceUnavailable {
            source_name: source.name().to_string(),
            reason: e.to_string(),
        })
    };

    let objects = source.load_objects().map_err(unavailable)?;
    let dependencies = source.load_dependencies().map_err(unavailable)?;

    let mut graph = CatalogGraph::new(generation);
    let mut report = BuildReport::default();

    for object in objects {
        let id = object.id.clone();
        match graph.add_node(object) {
            Some(_) => report.nodes_added += 1,
            None => {
                warn!(node_id = %id, "duplicate catalog object skipped");
                report.duplicate_nodes += 1;
            }
        }
    }

    for dependency in &dependencies {
        match graph.add_edge(dependency) {
            Ok(true) => report.edges_added += 1,
            Ok(false) => report.duplicate_edges += 1,
            Err(e) => {
                warn!(error = %e, "dangling dependency skipped");
                report.dangling_edges += 1;
            }
        }
    }

    graph.mark_built(Utc::now(), started.elapsed().as_millis() as u64);
    Ok((graph, report))
}
