//! Relationship path: graph neighbourhood of the objects a query names.

use async_trait::async_trait;

use cairn_core::errors::CairnResult;
use cairn_core::models::{CatalogObject, LineageDirection, PathDetail, RoutingPath};
use cairn_graph::traversal::walk::walk;
use cairn_graph::CatalogGraph;

use super::{candidate, sort_and_dedup, RetrievalStrategy, StrategyContext, StrategyOutput};
use crate::text;

pub struct RelationshipStrategy {
    depth: usize,
}

impl RelationshipStrategy {
    pub fn new(depth: usize) -> Self {
        Self { depth: depth.max(1) }
    }
}

#[async_trait]
impl RetrievalStrategy for RelationshipStrategy {
    fn path(&self) -> RoutingPath {
        RoutingPath::Relationship
    }

    async fn retrieve(&self, ctx: &StrategyContext) -> CairnResult<StrategyOutput> {
        let graph = ctx.graph.as_ref();
        let seeds = seeds(graph, ctx);
        if seeds.is_empty() {
            return Ok(StrategyOutput::default());
        }

        let mut candidates = Vec::new();
        for seed in seeds {
            candidates.push(candidate(
                seed,
                1.0,
                PathDetail::Graph {
                    depth: 0,
                    relationship: "SEED".to_string(),
                },
            ));
            let Some(start) = graph.index_of(&seed.id) else {
                continue;
            };
            for direction in [LineageDirection::Upstream, LineageDirection::Downstream] {
                for hit in walk(graph, start, direction, self.depth) {
                    if let Some(object) = graph.get(&hit.node_id) {
                        candidates.push(candidate(
                            object,
                            1.0 / (1.0 + hit.depth as f64),
                            PathDetail::Graph {
                                depth: hit.depth,
                                relationship: hit.relationship.to_string(),
                            },
                        ));
                    }
                }
            }
        }
        sort_and_dedup(&mut candidates);
        candidates.truncate(ctx.limit.max(1));
        Ok(StrategyOutput::new(candidates))
    }
}

/// Objects the query names: resolved entities, or failing that, content
/// terms that resolve to an object name.
fn seeds<'g>(graph: &'g CatalogGraph, ctx: &StrategyContext) -> Vec<&'g CatalogObject> {
    let mut seeds: Vec<&CatalogObject> = Vec::new();
    let classification = &ctx.classification;
    for identifier in classification
        .filters
        .qualified_names
        .iter()
        .chain(&classification.entities)
    {
        if let Some(object) = graph.resolve(identifier) {
            if !seeds.iter().any(|s| s.id == object.id) {
                seeds.push(object);
            }
        }
    }
    if !seeds.is_empty() {
        return seeds;
    }
    for term in text::terms(&ctx.query) {
        if let Some(object) = graph.resolve(&term) {
            if !seeds.iter().any(|s| s.id == object.id) {
                seeds.push(object);
            }
        }
    }
    seeds
}
