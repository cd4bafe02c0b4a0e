//! The five routing strategies and the dispatch table that maps a
//! `RoutingPath` to its implementation.

pub mod agentic;
pub mod keyword;
pub mod metadata;
pub mod relationship;
pub mod semantic;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use cairn_core::config::RetrievalConfig;
use cairn_core::errors::{CairnResult, RetrievalError};
use cairn_core::models::{
    CandidateResult, CatalogObject, PathDetail, QueryClassification, RoutingPath, SearchOptions,
};
use cairn_core::traits::IQueryRewriter;
use cairn_graph::{CatalogGraph, TraversalConfig};

use crate::vector::VectorRetriever;

pub use agentic::AgenticStrategy;
pub use keyword::KeywordStrategy;
pub use metadata::MetadataStrategy;
pub use relationship::RelationshipStrategy;
pub use semantic::SemanticStrategy;

/// Everything a strategy needs for one request. Shared read-only across the
/// per-path tasks of that request.
pub struct StrategyContext {
    pub query: String,
    pub normalized: String,
    pub classification: QueryClassification,
    pub options: SearchOptions,
    /// Graph snapshot taken once at the start of the request.
    pub graph: Arc<CatalogGraph>,
    /// Per-path candidate limit.
    pub limit: usize,
}

/// What one strategy produced.
#[derive(Debug, Clone, Default)]
pub struct StrategyOutput {
    pub candidates: Vec<CandidateResult>,
    /// Set when the strategy rewrote or expanded the query.
    pub expanded_query: Option<String>,
}

impl StrategyOutput {
    pub fn new(candidates: Vec<CandidateResult>) -> Self {
        Self {
            candidates,
            expanded_query: None,
        }
    }
}

/// One retrieval path.
#[async_trait]
pub trait RetrievalStrategy: Send + Sync {
    fn path(&self) -> RoutingPath;

    /// Candidates for `ctx`, best first. An unreachable backend is an error,
    /// never an empty list.
    async fn retrieve(&self, ctx: &StrategyContext) -> CairnResult<StrategyOutput>;
}

/// Dispatch table from routing path to strategy.
#[derive(Default, Clone)]
pub struct StrategyTable {
    strategies: HashMap<RoutingPath, Arc<dyn RetrievalStrategy>>,
}

impl StrategyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard table with all five paths registered.
    pub fn standard(
        vector: Arc<VectorRetriever>,
        rewriter: Option<Arc<dyn IQueryRewriter>>,
        config: &RetrievalConfig,
        traversal: TraversalConfig,
    ) -> Self {
        let mut table = Self::new();
        table.register(Arc::new(KeywordStrategy::new(config.keyword_top_k)));
        table.register(Arc::new(MetadataStrategy::new()));
        table.register(Arc::new(SemanticStrategy::new(
            vector.clone(),
            config.vector_top_k,
        )));
        table.register(Arc::new(RelationshipStrategy::new(
            config.relationship_depth.min(traversal.max_depth),
        )));
        table.register(Arc::new(AgenticStrategy::new(
            vector,
            rewriter,
            config.vector_top_k,
            config.keyword_top_k,
            config.agentic_seed_count,
            config.rrf_k,
            config.query_expansion,
        )));
        table
    }

    /// Register `strategy` under its own path, replacing any previous one.
    pub fn register(&mut self, strategy: Arc<dyn RetrievalStrategy>) {
        self.strategies.insert(strategy.path(), strategy);
    }

    pub fn get(&self, path: RoutingPath) -> CairnResult<Arc<dyn RetrievalStrategy>> {
        self.strategies
            .get(&path)
            .cloned()
            .ok_or_else(|| RetrievalError::NoStrategy { path }.into())
    }

    pub fn contains(&self, path: RoutingPath) -> bool {
        self.strategies.contains_key(&path)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// Candidate for a catalog object with the given path-local score.
pub(crate) fn candidate(object: &CatalogObject, score: f64, detail: PathDetail) -> CandidateResult {
    CandidateResult {
        document_id: object.id.clone(),
        object_type: object.object_type.to_string(),
        name: object.name.clone(),
        score,
        detail,
        text: object.description.clone(),
        database: Some(object.database.clone()),
        category: object.category.clone(),
    }
}

/// Best score first, then document id. Keeps the first (best) entry per id.
pub(crate) fn sort_and_dedup(candidates: &mut Vec<CandidateResult>) {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.document_id.cmp(&b.document_id))
    });
    let mut seen = std::collections::HashSet::new();
    candidates.retain(|c| seen.insert(c.document_id.clone()));
}
