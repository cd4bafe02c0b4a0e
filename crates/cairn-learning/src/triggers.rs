//! When a batch learning update should run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use cairn_core::config::LearningConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerReason {
    /// Enough events arrived since the last update.
    PendingThreshold,
    /// The update interval elapsed with at least one pending event.
    IntervalElapsed,
    /// Requested explicitly.
    Manual,
}

/// Evaluate the automatic triggers. Nothing pending never triggers.
pub fn evaluate(
    pending: u64,
    since_last_update: Duration,
    config: &LearningConfig,
) -> Option<TriggerReason> {
    if pending == 0 {
        return None;
    }
    if pending >= config.batch_trigger_count as u64 {
        return Some(TriggerReason::PendingThreshold);
    }
    if since_last_update >= Duration::from_secs(config.update_interval_secs) {
        return Some(TriggerReason::IntervalElapsed);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LearningConfig {
        LearningConfig {
            batch_trigger_count: 100,
            update_interval_secs: 86_400,
            ..Default::default()
        }
    }

    #[test]
    fn threshold_and_interval() {
        let c = config();
        assert_eq!(evaluate(99, Duration::from_secs(10), &c), None);
        assert_eq!(
            evaluate(100, Duration::from_secs(10), &c),
            Some(TriggerReason::PendingThreshold)
        );
        assert_eq!(
            evaluate(1, Duration::from_secs(86_400), &c),
            Some(TriggerReason::IntervalElapsed)
        );
        assert_eq!(evaluate(0, Duration::from_secs(1_000_000), &c), None);
    }
}
