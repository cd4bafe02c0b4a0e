//! Served responses by query id, kept for follow-up lookups and exports.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;

use cairn_core::config::CacheConfig;

use crate::orchestrator::SearchOutcome;

pub struct ResponseStore {
    responses: Cache<String, Arc<SearchOutcome>>,
}

impl ResponseStore {
    pub fn new(config: &CacheConfig) -> Self {
        let responses = Cache::builder()
            .max_capacity(config.store_capacity)
            .time_to_live(Duration::from_secs(config.store_ttl_secs))
            .build();
        Self { responses }
    }

    pub fn insert(&self, outcome: Arc<SearchOutcome>) {
        self.responses
            .insert(outcome.response.query_id.clone(), outcome);
    }

    pub fn get(&self, query_id: &str) -> Option<Arc<SearchOutcome>> {
        self.responses.get(query_id)
    }

    pub fn len(&self) -> u64 {
        self.responses.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
