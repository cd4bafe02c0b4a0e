//! Traversal engine: bounded breadth-first walks over a graph snapshot.

pub mod lineage;
pub mod pii;
pub mod summary;
pub mod walk;

use petgraph::graph::NodeIndex;

use cairn_core::config::GraphConfig;
use cairn_core::constants::MAX_TRAVERSAL_DEPTH;
use cairn_core::errors::{CairnError, CairnResult, GraphError};
use cairn_core::models::{
    LineageDirection, LineagePath, NodeAnnotation, PiiFlowPath, TraversalHit,
};

use crate::graph::CatalogGraph;

/// Configuration for traversal operations.
#[derive(Debug, Clone)]
pub struct TraversalConfig {
    /// Maximum depth a caller may request. Never above 10.
    pub max_depth: usize,
    /// Node visits allowed per lineage-path search direction.
    pub visit_budget: usize,
    /// Nearest ids kept per direction in a lineage summary.
    pub summary_limit: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self::from(&GraphConfig::default())
    }
}

impl From<&GraphConfig> for TraversalConfig {
    fn from(config: &GraphConfig) -> Self {
        Self {
            max_depth: config.max_traversal_depth.min(MAX_TRAVERSAL_DEPTH),
            visit_budget: config.visit_budget,
            summary_limit: config.lineage_summary_limit,
        }
    }
}

/// Stateless traversal operations over a snapshot.
#[derive(Debug, Clone, Default)]
pub struct TraversalEngine {
    config: TraversalConfig,
}

impl TraversalEngine {
    pub fn new(config: TraversalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    fn check_depth(&self, max_depth: usize) -> CairnResult<()> {
        if max_depth > self.config.max_depth {
            return Err(CairnError::invalid(format!(
                "max_depth {max_depth} exceeds limit {}",
                self.config.max_depth
            )));
        }
        Ok(())
    }

    /// Resolve `node` to an index or fail with `NodeNotFound`.
    pub fn locate(&self, graph: &CatalogGraph, node: &str) -> CairnResult<NodeIndex> {
        graph
            .resolve(node)
            .and_then(|object| graph.index_of(&object.id))
            .ok_or_else(|| {
                GraphError::NodeNotFound {
                    node_id: node.to_string(),
                }
                .into()
            })
    }

    /// Everything that depends on `node` (downstream), nearest first.
    pub fn dependents(
        &self,
        graph: &CatalogGraph,
        node: &str,
        max_depth: usize,
    ) -> CairnResult<Vec<TraversalHit>> {
        self.check_depth(max_depth)?;
        let start = self.locate(graph, node)?;
        Ok(walk::walk(graph, start, LineageDirection::Downstream, max_depth))
    }

    /// Everything `node` depends on (upstream), nearest first.
    pub fn dependencies(
        &self,
        graph: &CatalogGraph,
        node: &str,
        max_depth: usize,
    ) -> CairnResult<Vec<TraversalHit>> {
        self.check_depth(max_depth)?;
        let start = self.locate(graph, node)?;
        Ok(walk::walk(graph, start, LineageDirection::Upstream, max_depth))
    }

    pub fn lineage_path(
        &self,
        graph: &CatalogGraph,
        source: &str,
        target: &str,
    ) -> Option<LineagePath> {
        lineage::find_path(
            graph,
            source,
            target,
            self.config.max_depth,
            self.config.visit_budget,
        )
    }

    /// PII flows starting at `source`. Empty when the node carries no PII tag.
    pub fn pii_flows_from(
        &self,
        graph: &CatalogGraph,
        source: &str,
    ) -> CairnResult<Vec<PiiFlowPath>> {
        let start = self.locate(graph, source)?;
        Ok(pii::trace_from(graph, start, self.config.max_depth))
    }

    /// Every PII flow in the snapshot; computed once per generation.
    pub fn all_pii_flows<'g>(&self, graph: &'g CatalogGraph) -> &'g [PiiFlowPath] {
        let max_depth = self.config.max_depth;
        graph.pii_flows_cached(|| pii::trace_all(graph, max_depth))
    }

    /// Lineage summary and PII details for one node.
    pub fn annotate(
        &self,
        graph: &CatalogGraph,
        node: &str,
        depth: usize,
    ) -> CairnResult<NodeAnnotation> {
        self.check_depth(depth)?;
        let idx = self.locate(graph, node)?;
        let flows = self.all_pii_flows(graph);
        Ok(summary::annotate(
            graph,
            idx,
            depth,
            self.config.summary_limit,
            flows,
        ))
    }
}
