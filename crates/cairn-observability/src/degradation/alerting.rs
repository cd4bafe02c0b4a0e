//! Alert thresholds: more than 3 degradations of one component in 10 minutes
//! is a warning; a component degraded for over an hour is critical.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::tracker::DegradationTracker;

const WARNING_WINDOW_SECS: i64 = 600;
const WARNING_COUNT: usize = 3;
const CRITICAL_AFTER_MINUTES: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    None,
    Warning,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationAlert {
    pub level: AlertLevel,
    pub component: String,
    pub message: String,
}

/// One alert per component at most: critical outranks warning.
pub fn evaluate_alerts(tracker: &DegradationTracker) -> Vec<DegradationAlert> {
    let critical_after = Duration::minutes(CRITICAL_AFTER_MINUTES);
    let window = Duration::seconds(WARNING_WINDOW_SECS);

    tracker
        .components()
        .into_iter()
        .filter_map(|component| {
            if let Some(episode) = tracker.episode(component) {
                if episode.duration() > critical_after {
                    return Some(DegradationAlert {
                        level: AlertLevel::Critical,
                        component: component.to_string(),
                        message: format!(
                            "{component} has been degraded for over {CRITICAL_AFTER_MINUTES} minutes"
                        ),
                    });
                }
            }
            let recent = tracker.count_recent(component, window);
            (recent > WARNING_COUNT).then(|| DegradationAlert {
                level: AlertLevel::Warning,
                component: component.to_string(),
                message: format!(
                    "{component} has {recent} degradation events in the last {} minutes",
                    WARNING_WINDOW_SECS / 60
                ),
            })
        })
        .collect()
}
