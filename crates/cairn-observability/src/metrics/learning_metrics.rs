//! Learning queue and batch update counters.

use serde::{Deserialize, Serialize};

use cairn_core::models::LearningAnalytics;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningMetrics {
    pub updates: u64,
    pub processed_sequence: u64,
    pub dropped_events: u64,
    pub last_click_through_rate: f64,
}

impl LearningMetrics {
    pub fn record_update(&mut self, analytics: &LearningAnalytics) {
        self.updates += 1;
        self.processed_sequence = analytics.processed_sequence;
        self.last_click_through_rate = analytics.click_through_rate;
    }

    /// Dropped-event counters are cumulative at the source.
    pub fn set_dropped(&mut self, dropped: u64) {
        self.dropped_events = dropped;
    }
}
