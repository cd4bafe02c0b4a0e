//! Agentic path: multi-step retrieval for ambiguous queries.
//!
//! Rewrite the query, run vector and keyword search on the rewrite, fuse the
//! two lists, then widen the best seeds by one graph hop.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use cairn_core::errors::CairnResult;
use cairn_core::models::{CandidateResult, LineageDirection, PathDetail, RoutingPath};
use cairn_core::traits::IQueryRewriter;

use super::keyword;
use super::semantic::hits_to_candidates;
use super::{candidate, sort_and_dedup, RetrievalStrategy, StrategyContext, StrategyOutput};
use crate::expansion;
use crate::fusion;
use crate::vector::{filter_map, VectorRetriever};

pub struct AgenticStrategy {
    vector: Arc<VectorRetriever>,
    rewriter: Option<Arc<dyn IQueryRewriter>>,
    vector_top_k: usize,
    keyword_top_k: usize,
    seed_count: usize,
    rrf_k: u32,
    expand_synonyms: bool,
}

impl AgenticStrategy {
    pub fn new(
        vector: Arc<VectorRetriever>,
        rewriter: Option<Arc<dyn IQueryRewriter>>,
        vector_top_k: usize,
        keyword_top_k: usize,
        seed_count: usize,
        rrf_k: u32,
        expand_synonyms: bool,
    ) -> Self {
        Self {
            vector,
            rewriter,
            vector_top_k: vector_top_k.max(1),
            keyword_top_k: keyword_top_k.max(1),
            seed_count,
            rrf_k,
            expand_synonyms,
        }
    }

    async fn rewrite(&self, query: &str, steps: &mut Vec<String>) -> String {
        if let Some(rewriter) = &self.rewriter {
            match rewriter.rewrite(query).await {
                Ok(rewritten) if !rewritten.trim().is_empty() => {
                    steps.push(format!("rewrite:{}", rewriter.name()));
                    return rewritten;
                }
                Ok(_) => warn!(rewriter = rewriter.name(), "empty rewrite, using synonyms"),
                Err(e) => warn!(rewriter = rewriter.name(), error = %e, "rewrite failed, using synonyms"),
            }
        }
        if self.expand_synonyms {
            steps.push("expand:synonyms".to_string());
            expansion::expand(query)
        } else {
            query.to_string()
        }
    }
}

#[async_trait]
impl RetrievalStrategy for AgenticStrategy {
    fn path(&self) -> RoutingPath {
        RoutingPath::Agentic
    }

    async fn retrieve(&self, ctx: &StrategyContext) -> CairnResult<StrategyOutput> {
        let mut steps = Vec::new();
        let rewritten = self.rewrite(&ctx.query, &mut steps).await;

        let mut per_path: BTreeMap<RoutingPath, Vec<CandidateResult>> = BTreeMap::new();

        let options = &ctx.options;
        let filters = filter_map(
            &options.filter_databases,
            &options.filter_object_types,
            &options.filter_categories,
        );
        match self
            .vector
            .search_hybrid(&rewritten, self.vector_top_k, filters.as_ref())
            .await
        {
            Ok(hits) => {
                steps.push(format!("vector:{}", hits.len()));
                per_path.insert(RoutingPath::Semantic, hits_to_candidates(&ctx.graph, hits));
            }
            Err(e) => {
                warn!(error = %e, "agentic vector step failed, continuing with keyword");
                steps.push("vector:unavailable".to_string());
            }
        }

        let lexical = keyword::search(&ctx.graph, &rewritten, self.keyword_top_k);
        steps.push(format!("keyword:{}", lexical.len()));
        per_path.insert(RoutingPath::Keyword, lexical);

        let lookup: HashMap<&str, &CandidateResult> = per_path
            .values()
            .flatten()
            .map(|c| (c.document_id.as_str(), c))
            .collect();
        let fused = fusion::fuse(&per_path, self.rrf_k);

        let mut candidates = Vec::new();
        for ranked in &fused {
            let Some(source) = lookup.get(ranked.document_id.as_str()) else {
                continue;
            };
            let mut c = (*source).clone();
            c.score = ranked.fused_score;
            candidates.push(c);
        }

        let graph = ctx.graph.as_ref();
        let seeds: Vec<(String, f64)> = fused
            .iter()
            .take(self.seed_count)
            .map(|r| (r.document_id.clone(), r.fused_score))
            .collect();
        let mut widened = 0;
        for (seed_id, seed_score) in &seeds {
            let Some(idx) = graph.index_of(seed_id) else {
                continue;
            };
            for direction in [LineageDirection::Upstream, LineageDirection::Downstream] {
                for (neighbor, kind) in graph.neighbors(idx, direction) {
                    let object = graph.node(neighbor);
                    candidates.push(candidate(
                        object,
                        seed_score / 2.0,
                        PathDetail::Graph {
                            depth: 1,
                            relationship: kind.to_string(),
                        },
                    ));
                    widened += 1;
                }
            }
        }
        steps.push(format!("graph:{widened}"));

        for c in &mut candidates {
            c.detail = PathDetail::Agentic {
                steps: steps.clone(),
            };
        }
        sort_and_dedup(&mut candidates);
        candidates.truncate(ctx.limit.max(1));
        debug!(candidates = candidates.len(), steps = ?steps, "agentic retrieval complete");

        let expanded_query = (rewritten != ctx.query).then_some(rewritten);
        Ok(StrategyOutput {
            candidates,
            expanded_query,
        })
    }
}
