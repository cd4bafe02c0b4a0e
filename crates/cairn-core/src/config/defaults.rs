// Single source of truth for all default values.

// --- Search orchestration ---
pub const DEFAULT_MAX_RESULTS: usize = 20;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_OUTER_DEADLINE_MS: u64 = 8_000;
pub const DEFAULT_CLASSIFIER_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_RERANK_TIMEOUT_MS: u64 = 1_000;
pub const DEFAULT_KEYWORD_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_METADATA_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_RELATIONSHIP_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_SEMANTIC_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_AGENTIC_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_ANNOTATE_TOP_N: usize = 10;
pub const DEFAULT_LINEAGE_SUMMARY_DEPTH: usize = 3;
pub const DEFAULT_MAX_FOLLOW_UPS: usize = 3;
pub const DEFAULT_AUTOCOMPLETE_MAX: usize = 10;

// --- Retrieval ---
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_RERANK_MAX_CANDIDATES: usize = 50;
pub const DEFAULT_VECTOR_TOP_K: usize = 20;
pub const DEFAULT_KEYWORD_TOP_K: usize = 50;
pub const DEFAULT_RELATIONSHIP_DEPTH: usize = 3;
pub const DEFAULT_AGENTIC_SEED_COUNT: usize = 5;
pub const DEFAULT_QUERY_EXPANSION: bool = true;

// --- Graph ---
pub const DEFAULT_MAX_TRAVERSAL_DEPTH: usize = 10;
pub const DEFAULT_VISIT_BUDGET: usize = 10_000;
pub const DEFAULT_REBUILD_INTERVAL_SECS: u64 = 3_600; // 1 hour
pub const DEFAULT_LINEAGE_SUMMARY_LIMIT: usize = 5;

// --- Learning ---
pub const DEFAULT_LEARNING_QUEUE_CAPACITY: usize = 10_000;
pub const DEFAULT_BATCH_TRIGGER_COUNT: usize = 100;
pub const DEFAULT_LEARNING_INTERVAL_SECS: u64 = 86_400; // daily
pub const DEFAULT_WORKER_POLL_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_MIN_CLICK_SUPPORT: usize = 3;
pub const DEFAULT_MIN_SUGGESTION_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_LOG_RETENTION_SECS: u64 = 7 * 86_400;
pub const DEFAULT_LOG_MAX_ENTRIES: usize = 50_000;

// --- Cache ---
pub const DEFAULT_RESPONSE_CACHE_TTL_SECS: u64 = 60;
pub const DEFAULT_RESPONSE_CACHE_CAPACITY: u64 = 1_000;
pub const DEFAULT_RESPONSE_STORE_CAPACITY: u64 = 10_000;
pub const DEFAULT_RESPONSE_STORE_TTL_SECS: u64 = 86_400;
pub const DEFAULT_RECENT_QUERY_CAPACITY: usize = 1_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
pub const DEFAULT_QUERY_LOG_CAPACITY: usize = 1_000;
