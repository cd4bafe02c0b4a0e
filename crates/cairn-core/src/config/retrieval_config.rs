use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// RRF k-value for rank fusion.
    pub rrf_k: u32,
    /// Upper bound on candidates sent to the reranker.
    pub rerank_max_candidates: usize,
    pub vector_top_k: usize,
    pub keyword_top_k: usize,
    /// Traversal depth used by the relationship path.
    pub relationship_depth: usize,
    /// Top semantic hits the agentic path expands through the graph.
    pub agentic_seed_count: usize,
    /// Enable synonym expansion on the agentic path.
    pub query_expansion: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            rrf_k: defaults::DEFAULT_RRF_K,
            rerank_max_candidates: defaults::DEFAULT_RERANK_MAX_CANDIDATES,
            vector_top_k: defaults::DEFAULT_VECTOR_TOP_K,
            keyword_top_k: defaults::DEFAULT_KEYWORD_TOP_K,
            relationship_depth: defaults::DEFAULT_RELATIONSHIP_DEPTH,
            agentic_seed_count: defaults::DEFAULT_AGENTIC_SEED_COUNT,
            query_expansion: defaults::DEFAULT_QUERY_EXPANSION,
        }
    }
}
