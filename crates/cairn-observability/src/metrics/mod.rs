//! Central metrics registry.
//!
//! [`MetricsCollector`] owns all domain-specific metric collectors and provides
//! a unified interface for recording and querying metrics.

pub mod graph_metrics;
pub mod learning_metrics;
pub mod search_metrics;

pub use graph_metrics::GraphMetrics;
pub use learning_metrics::LearningMetrics;
pub use search_metrics::{PathCounters, SearchMetrics};

/// Central metrics registry that owns all domain-specific collectors.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct MetricsCollector {
    pub search: SearchMetrics,
    pub graph: GraphMetrics,
    pub learning: LearningMetrics,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all metrics (useful for testing or periodic rotation).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
