use serde::{Deserialize, Serialize};

use super::defaults;

/// What the learning queue does when it is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueFullPolicy {
    /// Evict the oldest queued event to make room.
    #[default]
    DropOldest,
    /// Discard the incoming event.
    DropNewest,
}

/// Continuous learner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    pub queue_capacity: usize,
    pub queue_full_policy: QueueFullPolicy,
    /// Pending events that trigger a batch update.
    pub batch_trigger_count: usize,
    /// Maximum seconds between batch updates.
    pub update_interval_secs: u64,
    pub worker_poll_interval_ms: u64,
    pub min_click_support: usize,
    pub min_suggestion_confidence: f64,
    /// Processed log entries older than this are compacted away.
    pub log_retention_secs: u64,
    /// Processed entries beyond this count are compacted oldest first.
    pub log_max_entries: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            queue_capacity: defaults::DEFAULT_LEARNING_QUEUE_CAPACITY,
            queue_full_policy: QueueFullPolicy::default(),
            batch_trigger_count: defaults::DEFAULT_BATCH_TRIGGER_COUNT,
            update_interval_secs: defaults::DEFAULT_LEARNING_INTERVAL_SECS,
            worker_poll_interval_ms: defaults::DEFAULT_WORKER_POLL_INTERVAL_MS,
            min_click_support: defaults::DEFAULT_MIN_CLICK_SUPPORT,
            min_suggestion_confidence: defaults::DEFAULT_MIN_SUGGESTION_CONFIDENCE,
            log_retention_secs: defaults::DEFAULT_LOG_RETENTION_SECS,
            log_max_entries: defaults::DEFAULT_LOG_MAX_ENTRIES,
        }
    }
}
