//! GraphStore: owns the snapshot manager, rebuilds from the catalog source,
//! and answers traversal queries against the current snapshot.

use std::sync::Arc;

use tracing::{info, warn};

use cairn_core::config::GraphConfig;
use cairn_core::errors::{CairnError, CairnResult};
use cairn_core::models::{
    CatalogObject, GraphStats, LineagePath, NodeAnnotation, PiiFlowPath, TraversalHit,
};
use cairn_core::traits::ICatalogSource;

use crate::graph::{build_from_source, CatalogGraph, GraphManager};
use crate::traversal::{TraversalConfig, TraversalEngine};

/// The catalog dependency/lineage graph store.
pub struct GraphStore {
    source: Arc<dyn ICatalogSource>,
    manager: GraphManager,
    traversal: TraversalEngine,
}

impl GraphStore {
    /// Create a store with an empty graph. Call [`rebuild`](Self::rebuild) to load it.
    pub fn new(source: Arc<dyn ICatalogSource>, config: &GraphConfig) -> Self {
        Self {
            source,
            manager: GraphManager::new(),
            traversal: TraversalEngine::new(TraversalConfig::from(config)),
        }
    }

    /// Create a store and perform the initial build.
    pub fn open(source: Arc<dyn ICatalogSource>, config: &GraphConfig) -> CairnResult<Self> {
        let store = Self::new(source, config);
        store.rebuild()?;
        Ok(store)
    }

    /// The snapshot in-flight readers should use for the rest of a request.
    pub fn snapshot(&self) -> CairnResult<Arc<CatalogGraph>> {
        self.manager.snapshot()
    }

    pub fn traversal(&self) -> &TraversalEngine {
        &self.traversal
    }

    // --- Traversal ---

    pub fn find_dependents(&self, node: &str, max_depth: usize) -> CairnResult<Vec<TraversalHit>> {
        let graph = self.snapshot()?;
        self.traversal.dependents(&graph, node, max_depth)
    }

    pub fn find_dependencies(
        &self,
        node: &str,
        max_depth: usize,
    ) -> CairnResult<Vec<TraversalHit>> {
        let graph = self.snapshot()?;
        self.traversal.dependencies(&graph, node, max_depth)
    }

    pub fn find_lineage_path(&self, source: &str, target: &str) -> CairnResult<Option<LineagePath>> {
        let graph = self.snapshot()?;
        Ok(self.traversal.lineage_path(&graph, source, target))
    }

    pub fn trace_pii_flow(&self, source: &str) -> CairnResult<Vec<PiiFlowPath>> {
        let graph = self.snapshot()?;
        self.traversal.pii_flows_from(&graph, source)
    }

    pub fn get_all_pii_flows(&self) -> CairnResult<Vec<PiiFlowPath>> {
        let graph = self.snapshot()?;
        Ok(self.traversal.all_pii_flows(&graph).to_vec())
    }

    /// Lineage summary and PII information for one node in a single call.
    pub fn annotate(&self, node: &str, depth: usize) -> CairnResult<NodeAnnotation> {
        let graph = self.snapshot()?;
        self.traversal.annotate(&graph, node, depth)
    }

    pub fn resolve(&self, identifier: &str) -> CairnResult<Option<CatalogObject>> {
        let graph = self.snapshot()?;
        Ok(graph.resolve(identifier).cloned())
    }

    // --- Maintenance ---

    /// Build a new generation from the catalog source and swap it in.
    ///
    /// On failure the previous snapshot stays authoritative.
    pub fn rebuild(&self) -> CairnResult<GraphStats> {
        let _writer = self.manager.writer_lock()?;
        let generation = self.manager.next_generation();

        let (graph, report) = match build_from_source(self.source.as_ref(), generation) {
            Ok(built) => built,
            Err(e) => {
                warn!(
                    source = self.source.name(),
                    generation,
                    error = %e,
                    "graph rebuild failed, keeping previous snapshot"
                );
                return Err(CairnError::GraphRebuildFailed {
                    reason: e.to_string(),
                });
            }
        };

        let stats = graph.stats();
        self.manager.publish(graph)?;
        info!(
            generation,
            nodes = stats.node_count,
            edges = stats.edge_count,
            skipped_edges = report.dangling_edges + report.duplicate_edges,
            duration_ms = stats.build_duration_ms,
            "graph rebuilt"
        );
        Ok(stats)
    }

    pub fn get_stats(&self) -> CairnResult<GraphStats> {
        Ok(self.snapshot()?.stats())
    }

    pub fn generation(&self) -> u64 {
        self.manager.generation()
    }
}
