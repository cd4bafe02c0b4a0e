//! Response cache using moka.
//!
//! Keys are blake3 hashes of the normalized query plus every option that
//! changes the result set. Entries expire after a fixed TTL.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use cairn_core::config::CacheConfig;
use cairn_core::models::SearchOptions;

use crate::orchestrator::SearchOutcome;

pub struct ResponseCache {
    cache: Cache<String, Arc<SearchOutcome>>,
}

impl ResponseCache {
    pub fn new(config: &CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.response_capacity)
            .time_to_live(Duration::from_secs(config.response_ttl_secs))
            .build();
        Self { cache }
    }

    pub fn get(&self, key: &str) -> Option<Arc<SearchOutcome>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, outcome: Arc<SearchOutcome>) {
        self.cache.insert(key, outcome);
    }

    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Called when the graph is rebuilt.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

fn canonical(values: &[String]) -> String {
    let mut values: Vec<String> = values.iter().map(|v| v.trim().to_lowercase()).collect();
    values.sort();
    values.dedup();
    values.join(",")
}

/// Cache key for a normalized query and its options. Filter order and case
/// do not matter.
pub fn cache_key(normalized_query: &str, options: &SearchOptions) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in [
        normalized_query.to_string(),
        options.max_results.to_string(),
        options.include_lineage.to_string(),
        options.include_pii_flows.to_string(),
        options.enable_reranking.to_string(),
        options.min_confidence.to_bits().to_string(),
        canonical(&options.filter_databases),
        canonical(&options.filter_object_types),
        canonical(&options.filter_categories),
        options
            .force_routing_path
            .map_or_else(String::new, |p| p.as_str().to_string()),
    ] {
        hasher.update(part.as_bytes());
        hasher.update(&[0x1f]);
    }
    hasher.finalize().to_hex().to_string()
}
