//! Search orchestrator: one request through
//! `Received → Classified → Retrieving → (Reranking) → Fusing → Annotating → Completed`.
//!
//! The orchestrator owns no cross-request state. Caching, response storage,
//! learning and metrics live in [`crate::engine::SearchEngine`].

pub mod fanout;
pub mod filters;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::Utc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use cairn_core::config::{RetrievalConfig, SearchConfig};
use cairn_core::errors::{CairnError, CairnResult};
use cairn_core::models::{
    CandidateResult, ClassificationSource, ComplexityTier, ExecutionMetadata, QueryClassification,
    RequestState, RoutingPath, SearchQuery, SearchResponse, ShownResponse, ShownResult,
};
use cairn_graph::GraphStore;
use cairn_retrieval::classifier::{self, QueryClassifier};
use cairn_retrieval::{fusion, rerank, Reranker, StrategyContext, StrategyTable};

use crate::annotate::{self, AnnotationLimits};
use crate::follow_ups;

/// A finished response plus what the learner needs to know about it.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub response: SearchResponse,
    pub normalized_query: String,
    pub complexity: ComplexityTier,
    /// Categories the query was filtered to or mentioned.
    pub query_categories: Vec<String>,
    /// Where the routing decision came from.
    pub classification_source: ClassificationSource,
}

impl SearchOutcome {
    /// The learning record for this response.
    pub fn shown(&self, user_id: &str) -> ShownResponse {
        ShownResponse {
            query_id: self.response.query_id.clone(),
            user_id: user_id.to_string(),
            normalized_query: self.normalized_query.clone(),
            routing_path: self.response.routing_path,
            complexity: self.complexity,
            query_categories: self.query_categories.clone(),
            results: self
                .response
                .results
                .iter()
                .map(|r| ShownResult {
                    document_id: r.document_id.clone(),
                    rank: r.rank,
                    category: r.category.clone(),
                })
                .collect(),
            timestamp: self.response.created_at,
        }
    }

    /// A copy served from cache under a fresh query id. Retrieval metadata
    /// is kept; the state trail and timings describe the cache hit.
    pub fn as_cache_hit(&self, query_id: String, total_ms: u64) -> Self {
        let mut hit = self.clone();
        hit.response.query_id = query_id;
        hit.response.created_at = Utc::now();
        let meta = &mut hit.response.metadata;
        meta.cache_hit = true;
        meta.states = vec![RequestState::Received, RequestState::Completed];
        meta.timings = Default::default();
        meta.timings.total_ms = total_ms;
        hit
    }
}

pub struct Orchestrator {
    classifier: QueryClassifier,
    strategies: StrategyTable,
    reranker: Option<Reranker>,
    graph: Arc<GraphStore>,
    config: SearchConfig,
    rrf_k: u32,
    rerank_window: usize,
}

impl Orchestrator {
    pub fn new(
        classifier: QueryClassifier,
        strategies: StrategyTable,
        reranker: Option<Reranker>,
        graph: Arc<GraphStore>,
        config: SearchConfig,
        retrieval: &RetrievalConfig,
    ) -> Self {
        Self {
            classifier,
            strategies,
            reranker,
            graph,
            config,
            rrf_k: retrieval.rrf_k,
            rerank_window: retrieval.rerank_max_candidates,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run `query` end to end. `query` must already be validated.
    ///
    /// Errors: `AllPathsFailed` when no path produced a list, `Cancelled`
    /// when `cancel` fires. Everything else degrades the response.
    pub async fn run(
        &self,
        query: &SearchQuery,
        normalized: String,
        query_id: String,
        cancel: &CancellationToken,
    ) -> CairnResult<SearchOutcome> {
        let started = Instant::now();
        let deadline = started + self.config.outer_deadline();
        let options = &query.options;
        let mut meta = ExecutionMetadata::default();

        // --- Classified ---
        let stage = Instant::now();
        let mut classification = match options.force_routing_path {
            Some(path) => classifier::forced(&query.text, path),
            None => tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(CairnError::Cancelled),
                c = self.classifier.classify(&query.text) => c?,
            },
        };
        classifier::apply_low_confidence_rule(&mut classification, options.min_confidence);
        if classification.is_degraded() {
            meta.degraded = true;
        }
        meta.classification_reason = classification.rationale.clone();
        meta.classification_confidence = classification.confidence;
        meta.timings.classification_ms = ms(stage);
        meta.enter(RequestState::Classified);
        debug!(
            query_id = %query_id,
            primary = %classification.primary,
            secondary = ?classification.secondary,
            source = ?classification.source,
            "classified"
        );

        // --- Retrieving ---
        let stage = Instant::now();
        meta.enter(RequestState::Retrieving);
        let graph = self.graph.snapshot()?;
        let paths = classification.paths();
        let ctx = Arc::new(StrategyContext {
            query: query.text.clone(),
            normalized: normalized.clone(),
            classification: classification.clone(),
            options: options.clone(),
            graph: Arc::clone(&graph),
            limit: options.max_results.max(self.rerank_window),
        });
        let mut retrieved = fanout::retrieve_all(
            &self.strategies,
            &self.config,
            ctx,
            &paths,
            &query_id,
            deadline,
            cancel,
        )
        .await?;
        meta.timings.retrieval_ms = ms(stage);
        meta.path_outcomes = retrieved.outcomes.clone();

        if !retrieved.any_succeeded() {
            meta.enter(RequestState::Failed);
            warn!(query_id = %query_id, states = ?meta.states, "all retrieval paths failed");
            return Err(CairnError::AllPathsFailed {
                failures: retrieved.failures(),
            });
        }
        if retrieved.any_failed() || retrieved.deadline_hit {
            meta.degraded = true;
        }

        for (path, candidates) in retrieved.per_path.iter_mut() {
            let removed = filters::apply(options, candidates);
            if removed > 0 {
                debug!(query_id = %query_id, path = %path, removed, "post-filtered candidates");
            }
            meta.candidate_counts.insert(*path, candidates.len());
        }

        // --- Reranking ---
        if options.enable_reranking {
            if let Some(reranker) = &self.reranker {
                self.rerank_stage(
                    reranker,
                    query,
                    &query_id,
                    &mut retrieved.per_path,
                    &mut meta,
                    deadline,
                    cancel,
                )
                .await?;
            }
        }

        // --- Fusing ---
        let stage = Instant::now();
        meta.enter(RequestState::Fusing);
        let mut ranked = fusion::fuse(&retrieved.per_path, self.rrf_k);
        ranked.truncate(options.max_results);
        meta.timings.fusion_ms = ms(stage);

        // --- Annotating ---
        if cancel.is_cancelled() {
            return Err(CairnError::Cancelled);
        }
        let stage = Instant::now();
        meta.enter(RequestState::Annotating);
        let candidates = first_candidates(&retrieved.per_path);
        let annotated = annotate::annotate(
            &graph,
            self.graph.traversal(),
            &ranked,
            &candidates,
            options,
            AnnotationLimits {
                top_n: self.config.annotate_top_n,
                depth: self.config.lineage_summary_depth,
            },
        );
        meta.timings.annotation_ms = ms(stage);

        let follow_ups = follow_ups::suggest(
            &query.text,
            &classification,
            &annotated.items,
            self.config.max_follow_ups,
        );

        let routing_path = used_path(&classification, &meta);
        if started.elapsed() > self.config.outer_deadline() {
            meta.degraded = true;
        }
        meta.timings.total_ms = ms(started);
        meta.enter(RequestState::Completed);

        info!(
            query_id = %query_id,
            routing_path = %routing_path,
            results = annotated.items.len(),
            graph_calls = annotated.graph_calls,
            degraded = meta.degraded,
            total_ms = meta.timings.total_ms,
            "search completed"
        );

        let query_categories = query_categories(query, &classification);
        Ok(SearchOutcome {
            response: SearchResponse {
                query_id,
                original_query: query.text.clone(),
                expanded_query: retrieved.expanded_query,
                routing_path,
                results: annotated.items,
                follow_ups,
                pii_flows: annotated.pii_flows,
                metadata: meta,
                created_at: Utc::now(),
            },
            normalized_query: normalized,
            complexity: classification.complexity,
            query_categories,
            classification_source: classification.source,
        })
    }

    /// Rerank the interleaved path heads and reorder every path list. Any
    /// failure or an exhausted deadline leaves the lists as they are.
    #[allow(clippy::too_many_arguments)]
    async fn rerank_stage(
        &self,
        reranker: &Reranker,
        query: &SearchQuery,
        query_id: &str,
        per_path: &mut BTreeMap<RoutingPath, Vec<CandidateResult>>,
        meta: &mut ExecutionMetadata,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> CairnResult<()> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            debug!(query_id, "no time left for reranking");
            meta.degraded = true;
            return Ok(());
        }
        let pool = rerank::interleave(per_path);
        if pool.is_empty() {
            return Ok(());
        }

        let stage = Instant::now();
        meta.enter(RequestState::Reranking);
        let top_k = reranker.max_candidates();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CairnError::Cancelled),
            r = tokio::time::timeout(remaining, reranker.rerank(&query.text, &pool, top_k)) => r,
        };
        match result {
            Ok(Ok(reranked)) => {
                rerank::apply_to_paths(per_path, &reranked);
                meta.reranked = true;
            }
            Ok(Err(e)) => {
                warn!(query_id, error = %e, "rerank skipped");
                meta.degraded = true;
            }
            Err(_) => {
                warn!(query_id, "rerank cut off by outer deadline");
                meta.degraded = true;
            }
        }
        meta.timings.rerank_ms = ms(stage);
        Ok(())
    }
}

fn ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

/// The primary path if it succeeded, else the first path that did.
fn used_path(classification: &QueryClassification, meta: &ExecutionMetadata) -> RoutingPath {
    let succeeded = |path: RoutingPath| {
        meta.path_outcomes
            .iter()
            .any(|o| o.path == path && o.is_success())
    };
    classification
        .paths()
        .into_iter()
        .find(|p| succeeded(*p))
        .unwrap_or(classification.primary)
}

/// First candidate seen per document, walking paths in routing order.
fn first_candidates(
    per_path: &BTreeMap<RoutingPath, Vec<CandidateResult>>,
) -> HashMap<String, CandidateResult> {
    let mut out: HashMap<String, CandidateResult> = HashMap::new();
    for candidates in per_path.values() {
        for c in candidates {
            out.entry(c.document_id.clone()).or_insert_with(|| c.clone());
        }
    }
    out
}

fn query_categories(query: &SearchQuery, classification: &QueryClassification) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for category in query
        .options
        .filter_categories
        .iter()
        .chain(&classification.filters.categories)
    {
        if !categories.iter().any(|c| c.eq_ignore_ascii_case(category)) {
            categories.push(category.clone());
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::models::{ClassificationSource, ExtractedFilters, PathOutcome, SearchOptions};

    fn classification(primary: RoutingPath, secondary: Option<RoutingPath>) -> QueryClassification {
        QueryClassification {
            query: "q".into(),
            primary,
            secondary,
            complexity: ComplexityTier::Simple,
            confidence: 1.0,
            rationale: String::new(),
            entities: Vec::new(),
            filters: ExtractedFilters {
                categories: vec!["PII".into()],
                ..Default::default()
            },
            source: ClassificationSource::Heuristic,
        }
    }

    #[test]
    fn used_path_falls_back_to_first_success() {
        let c = classification(RoutingPath::Semantic, Some(RoutingPath::Keyword));
        let mut meta = ExecutionMetadata::default();
        meta.path_outcomes = vec![
            PathOutcome::timed_out(RoutingPath::Semantic, 5),
            PathOutcome::succeeded(RoutingPath::Keyword, 3, 1),
        ];
        assert_eq!(used_path(&c, &meta), RoutingPath::Keyword);

        meta.path_outcomes[0] = PathOutcome::succeeded(RoutingPath::Semantic, 1, 1);
        assert_eq!(used_path(&c, &meta), RoutingPath::Semantic);
    }

    #[test]
    fn query_categories_merge_options_and_classification() {
        let query = SearchQuery::new(
            "q",
            "u",
            SearchOptions {
                filter_categories: vec!["pii".into(), "finance".into()],
                ..Default::default()
            },
        );
        let c = classification(RoutingPath::Keyword, None);
        assert_eq!(query_categories(&query, &c), vec!["pii", "finance"]);
    }
}
