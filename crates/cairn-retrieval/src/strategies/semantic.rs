//! Semantic path: embedding similarity over both vector collections.

use std::sync::Arc;

use async_trait::async_trait;

use cairn_core::errors::CairnResult;
use cairn_core::models::{CandidateResult, PathDetail, RoutingPath};
use cairn_core::traits::VectorHit;
use cairn_graph::CatalogGraph;

use super::{candidate, sort_and_dedup, RetrievalStrategy, StrategyContext, StrategyOutput};
use crate::vector::{filter_map, VectorRetriever};

pub struct SemanticStrategy {
    vector: Arc<VectorRetriever>,
    top_k: usize,
}

impl SemanticStrategy {
    pub fn new(vector: Arc<VectorRetriever>, top_k: usize) -> Self {
        Self { vector, top_k }
    }
}

#[async_trait]
impl RetrievalStrategy for SemanticStrategy {
    fn path(&self) -> RoutingPath {
        RoutingPath::Semantic
    }

    async fn retrieve(&self, ctx: &StrategyContext) -> CairnResult<StrategyOutput> {
        let options = &ctx.options;
        let filters = filter_map(
            &options.filter_databases,
            &options.filter_object_types,
            &options.filter_categories,
        );
        let top_k = self.top_k.min(ctx.limit).max(1);
        let hits = self
            .vector
            .search_hybrid(&ctx.query, top_k, filters.as_ref())
            .await?;
        let mut candidates = hits_to_candidates(&ctx.graph, hits);
        candidates.truncate(top_k);
        Ok(StrategyOutput::new(candidates))
    }
}

/// Convert vector hits to candidates, keeping the best hit per document.
/// Objects missing from the graph snapshot fall back to the hit payload.
pub fn hits_to_candidates(graph: &CatalogGraph, hits: Vec<VectorHit>) -> Vec<CandidateResult> {
    let mut candidates: Vec<CandidateResult> = hits
        .into_iter()
        .map(|hit| {
            let detail = PathDetail::Vector {
                collection: hit.collection.clone(),
                similarity: hit.score,
            };
            match graph.get(&hit.document_id) {
                Some(object) => candidate(object, hit.score, detail),
                None => CandidateResult {
                    name: hit
                        .payload
                        .get("name")
                        .cloned()
                        .unwrap_or_else(|| hit.document_id.clone()),
                    object_type: hit.payload.get("object_type").cloned().unwrap_or_default(),
                    database: hit.payload.get("database").cloned(),
                    category: hit.payload.get("category").cloned(),
                    text: String::new(),
                    score: hit.score,
                    detail,
                    document_id: hit.document_id,
                },
            }
        })
        .collect();
    sort_and_dedup(&mut candidates);
    candidates
}
