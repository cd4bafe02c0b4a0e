//! Configuration for the Cairn engine.
//! TOML-based; every section falls back to `defaults` when omitted.

pub mod cache_config;
pub mod defaults;
pub mod graph_config;
pub mod learning_config;
pub mod observability_config;
pub mod retrieval_config;
pub mod search_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use cache_config::CacheConfig;
pub use graph_config::GraphConfig;
pub use learning_config::{LearningConfig, QueueFullPolicy};
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;
pub use search_config::SearchConfig;

use crate::constants::{MAX_RERANK_CANDIDATES, MAX_SEARCH_RESULTS, MAX_TRAVERSAL_DEPTH};
use crate::errors::{CairnError, CairnResult};

/// Top-level configuration aggregating all sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CairnConfig {
    pub search: SearchConfig,
    pub retrieval: RetrievalConfig,
    pub graph: GraphConfig,
    pub learning: LearningConfig,
    pub cache: CacheConfig,
    pub observability: ObservabilityConfig,
}

impl CairnConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(toml_str: &str) -> CairnResult<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| CairnError::ConfigError(format!("<string>: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file, then apply `CAIRN_*` environment overrides.
    pub fn load(path: &Path) -> CairnResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CairnError::ConfigError(format!("{}: {e}", path.display())))?;
        let mut config: Self = toml::from_str(&raw)
            .map_err(|e| CairnError::ConfigError(format!("{}: {e}", path.display())))?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup` so tests need not touch
    /// the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("CAIRN_LOG") {
            self.observability.log_level = level;
        }
        if let Some(ms) = lookup("CAIRN_OUTER_DEADLINE_MS").and_then(|v| v.parse().ok()) {
            self.search.outer_deadline_ms = ms;
        }
        if let Some(secs) = lookup("CAIRN_CACHE_TTL_SECS").and_then(|v| v.parse().ok()) {
            self.cache.response_ttl_secs = secs;
        }
        if let Some(secs) = lookup("CAIRN_GRAPH_REBUILD_INTERVAL_SECS").and_then(|v| v.parse().ok())
        {
            self.graph.rebuild_interval_secs = secs;
        }
    }

    /// Reject values outside the ranges the engine supports.
    pub fn validate(&self) -> CairnResult<()> {
        fn fail(field: &str, message: &str) -> CairnResult<()> {
            Err(CairnError::ConfigError(format!("{field}: {message}")))
        }

        let s = &self.search;
        if s.default_max_results == 0 || s.default_max_results > MAX_SEARCH_RESULTS {
            return fail("search.default_max_results", "must be between 1 and 100");
        }
        if !(0.0..=1.0).contains(&s.default_min_confidence) {
            return fail("search.default_min_confidence", "must be between 0.0 and 1.0");
        }
        if s.outer_deadline_ms == 0 {
            return fail("search.outer_deadline_ms", "must be positive");
        }
        if self.retrieval.rrf_k == 0 {
            return fail("retrieval.rrf_k", "must be positive");
        }
        if self.retrieval.rerank_max_candidates == 0
            || self.retrieval.rerank_max_candidates > MAX_RERANK_CANDIDATES
        {
            return fail("retrieval.rerank_max_candidates", "must be between 1 and 50");
        }
        if self.graph.max_traversal_depth > MAX_TRAVERSAL_DEPTH {
            return fail("graph.max_traversal_depth", "must not exceed 10");
        }
        if self.retrieval.relationship_depth > self.graph.max_traversal_depth {
            return fail(
                "retrieval.relationship_depth",
                "must not exceed graph.max_traversal_depth",
            );
        }
        if self.learning.queue_capacity == 0 {
            return fail("learning.queue_capacity", "must be positive");
        }
        if self.learning.log_max_entries == 0 {
            return fail("learning.log_max_entries", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.learning.min_suggestion_confidence) {
            return fail(
                "learning.min_suggestion_confidence",
                "must be between 0.0 and 1.0",
            );
        }
        Ok(())
    }
}
