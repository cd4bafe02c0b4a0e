//! Per-component degradation state.
//!
//! A component is either healthy or inside one open episode that started at
//! its first failure. Further failures extend the episode; the next healthy
//! call closes it. A bounded event history backs the windowed alert counts.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use cairn_core::models::DegradationEvent;

const HISTORY_CAPACITY: usize = 10_000;

/// An unbroken stretch of degraded operation for one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradationEpisode {
    pub component: String,
    pub since: DateTime<Utc>,
    pub occurrences: u64,
    /// Failure and fallback of the most recent event.
    pub last_failure: String,
    pub fallback_used: String,
}

impl DegradationEpisode {
    pub fn duration(&self) -> Duration {
        Utc::now() - self.since
    }
}

#[derive(Debug, Clone)]
pub struct DegradationTracker {
    open: BTreeMap<String, DegradationEpisode>,
    recoveries: BTreeMap<String, u64>,
    history: VecDeque<DegradationEvent>,
    history_capacity: usize,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::with_history_capacity(HISTORY_CAPACITY)
    }

    pub fn with_history_capacity(history_capacity: usize) -> Self {
        Self {
            open: BTreeMap::new(),
            recoveries: BTreeMap::new(),
            history: VecDeque::new(),
            history_capacity: history_capacity.max(1),
        }
    }

    /// Open or extend the component's episode.
    pub fn record(&mut self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        let episode = self
            .open
            .entry(event.component.clone())
            .or_insert_with(|| DegradationEpisode {
                component: event.component.clone(),
                since: event.timestamp,
                occurrences: 0,
                last_failure: String::new(),
                fallback_used: String::new(),
            });
        episode.since = episode.since.min(event.timestamp);
        episode.occurrences += 1;
        episode.last_failure.clone_from(&event.failure);
        episode.fallback_used.clone_from(&event.fallback_used);

        if self.history.len() == self.history_capacity {
            self.history.pop_front();
        }
        self.history.push_back(event);
    }

    /// Close the component's open episode, if any, and return it.
    pub fn mark_recovered(&mut self, component: &str) -> Option<DegradationEpisode> {
        let episode = self.open.remove(component)?;
        *self.recoveries.entry(component.to_string()).or_default() += 1;
        tracing::info!(
            component,
            occurrences = episode.occurrences,
            degraded_ms = episode.duration().num_milliseconds(),
            "component recovered"
        );
        Some(episode)
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.open.contains_key(component)
    }

    pub fn episode(&self, component: &str) -> Option<&DegradationEpisode> {
        self.open.get(component)
    }

    pub fn active_degradations(&self) -> Vec<&DegradationEpisode> {
        self.open.values().collect()
    }

    /// Closed episodes for `component` since startup.
    pub fn recoveries(&self, component: &str) -> u64 {
        self.recoveries.get(component).copied().unwrap_or(0)
    }

    /// Every component with an open episode or retained history.
    pub fn components(&self) -> BTreeSet<&str> {
        self.open
            .keys()
            .map(String::as_str)
            .chain(self.history.iter().map(|e| e.component.as_str()))
            .collect()
    }

    pub fn history(&self) -> impl Iterator<Item = &DegradationEvent> {
        self.history.iter()
    }

    /// Events for `component` newer than `window`.
    pub fn count_recent(&self, component: &str, window: Duration) -> usize {
        let cutoff = Utc::now() - window;
        self.history
            .iter()
            .filter(|e| e.component == component && e.timestamp > cutoff)
            .count()
    }
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::new()
    }
}
