//! # cairn-observability
//!
//! Search metrics (per-path outcomes, cache hits, rerank skips), graph and
//! learning counters, structured tracing with span and event definitions,
//! a bounded query log, and degradation tracking with alerting.

pub mod degradation;
pub mod engine;
pub mod metrics;
pub mod query_log;
pub mod tracing_setup;

pub use engine::ObservabilityEngine;
pub use metrics::MetricsCollector;
pub use query_log::{QueryLog, QueryLogEntry};
