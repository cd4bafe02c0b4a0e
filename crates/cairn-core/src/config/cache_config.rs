use serde::{Deserialize, Serialize};

use super::defaults;

/// Response cache and response store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub response_ttl_secs: u64,
    pub response_capacity: u64,
    /// Served responses kept for follow-ups and export.
    pub store_capacity: u64,
    pub store_ttl_secs: u64,
    /// Distinct recent queries tracked for autocomplete.
    pub recent_query_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            response_ttl_secs: defaults::DEFAULT_RESPONSE_CACHE_TTL_SECS,
            response_capacity: defaults::DEFAULT_RESPONSE_CACHE_CAPACITY,
            store_capacity: defaults::DEFAULT_RESPONSE_STORE_CAPACITY,
            store_ttl_secs: defaults::DEFAULT_RESPONSE_STORE_TTL_SECS,
            recent_query_capacity: defaults::DEFAULT_RECENT_QUERY_CAPACITY,
        }
    }
}
