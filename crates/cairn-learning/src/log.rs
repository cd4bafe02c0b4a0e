//! Append-only interaction log with monotonically increasing sequence numbers.
//!
//! Batch updates read a snapshot "up to sequence S"; anything appended later
//! is left for the next cycle. Processed entries outside the retention
//! window are compacted away; sequence numbers keep counting regardless.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cairn_core::errors::{CairnError, CairnResult};
use cairn_core::models::LearningEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// 1-based; never reused.
    pub sequence: u64,
    pub event: LearningEvent,
}

#[derive(Debug, Default)]
struct Entries {
    retained: Vec<LogEntry>,
    last_sequence: u64,
}

#[derive(Debug, Default)]
pub struct InteractionLog {
    entries: RwLock<Entries>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append events in order. Returns the sequence of the last one, or the
    /// current latest sequence when `events` is empty.
    pub fn append(&self, events: Vec<LearningEvent>) -> CairnResult<u64> {
        let mut entries = self.write()?;
        for event in events {
            entries.last_sequence += 1;
            let sequence = entries.last_sequence;
            entries.retained.push(LogEntry { sequence, event });
        }
        Ok(entries.last_sequence)
    }

    pub fn latest_sequence(&self) -> CairnResult<u64> {
        Ok(self.read()?.last_sequence)
    }

    /// Every retained entry with `sequence <= up_to`.
    pub fn snapshot(&self, up_to: u64) -> CairnResult<Vec<LogEntry>> {
        let entries = self.read()?;
        let end = entries.retained.partition_point(|e| e.sequence <= up_to);
        Ok(entries.retained[..end].to_vec())
    }

    /// Entries strictly after `after`.
    pub fn since_sequence(&self, after: u64) -> CairnResult<Vec<LogEntry>> {
        let entries = self.read()?;
        let start = entries.retained.partition_point(|e| e.sequence <= after);
        Ok(entries.retained[start..].to_vec())
    }

    /// Drop a prefix of entries with `sequence <= processed`: those older
    /// than `cutoff`, and then the oldest until at most `max_entries` remain.
    /// Unprocessed entries are never dropped. Returns how many were dropped.
    pub fn compact(
        &self,
        processed: u64,
        cutoff: DateTime<Utc>,
        max_entries: usize,
    ) -> CairnResult<usize> {
        let mut entries = self.write()?;
        let retained = &mut entries.retained;
        let processed_end = retained.partition_point(|e| e.sequence <= processed);
        let expired = retained[..processed_end]
            .iter()
            .take_while(|e| e.event.timestamp() < cutoff)
            .count();
        let overflow = retained.len().saturating_sub(max_entries);
        let drop = expired.max(overflow).min(processed_end);
        retained.drain(..drop);
        Ok(drop)
    }

    /// Oldest retained sequence, if any.
    pub fn first_sequence(&self) -> CairnResult<Option<u64>> {
        Ok(self.read()?.retained.first().map(|e| e.sequence))
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.retained.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> CairnResult<RwLockReadGuard<'_, Entries>> {
        self.entries
            .read()
            .map_err(|e| CairnError::ConcurrencyError(format!("interaction log poisoned: {e}")))
    }

    fn write(&self) -> CairnResult<RwLockWriteGuard<'_, Entries>> {
        self.entries
            .write()
            .map_err(|e| CairnError::ConcurrencyError(format!("interaction log poisoned: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairn_core::models::{InteractionType, LearningInteraction};

    fn event(q: &str) -> LearningEvent {
        LearningEvent::Interaction(LearningInteraction::new(q, "u", InteractionType::Expand, None))
    }

    #[test]
    fn sequences_are_contiguous_and_snapshots_are_bounded() {
        let log = InteractionLog::new();
        assert_eq!(log.append(vec![event("a"), event("b")]).unwrap(), 2);
        assert_eq!(log.append(vec![]).unwrap(), 2);
        assert_eq!(log.append(vec![event("c")]).unwrap(), 3);

        let snap = log.snapshot(2).unwrap();
        assert_eq!(snap.iter().map(|e| e.sequence).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(log.since_sequence(2).unwrap().len(), 1);
        assert_eq!(log.latest_sequence().unwrap(), 3);
    }

    #[test]
    fn compaction_keeps_unprocessed_entries_and_sequence_numbers() {
        let log = InteractionLog::new();
        log.append((0..6).map(|i| event(&format!("q{i}"))).collect()).unwrap();

        // Over capacity, but only the first four are processed.
        assert_eq!(log.compact(4, DateTime::<Utc>::MIN_UTC, 1).unwrap(), 4);
        assert_eq!(log.first_sequence().unwrap(), Some(5));
        assert_eq!(log.len(), 2);

        assert_eq!(log.append(vec![event("q6")]).unwrap(), 7);
        assert_eq!(log.compact(7, Utc::now() + chrono::Duration::seconds(1), 10).unwrap(), 3);
        assert!(log.is_empty());
        assert_eq!(log.latest_sequence().unwrap(), 7);
    }

    #[test]
    fn entries_inside_the_retention_window_survive() {
        let log = InteractionLog::new();
        log.append(vec![event("a"), event("b")]).unwrap();
        let cutoff = Utc::now() - chrono::Duration::hours(1);
        assert_eq!(log.compact(2, cutoff, 10).unwrap(), 0);
        assert_eq!(log.len(), 2);
    }
}
