//! Bounded, non-blocking learning queue with an explicit full policy.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use tokio::sync::Notify;
use tracing::debug;

use cairn_core::config::QueueFullPolicy;
use cairn_core::errors::{CairnError, CairnResult, LearningError};
use cairn_core::models::LearningEvent;

/// What happened to a pushed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Queued,
    /// Queued after evicting the oldest event.
    QueuedEvictedOldest,
    /// The incoming event was discarded.
    Dropped,
}

pub struct LearningQueue {
    events: Mutex<VecDeque<LearningEvent>>,
    capacity: usize,
    policy: QueueFullPolicy,
    dropped: AtomicU64,
    closed: AtomicBool,
    notify: Notify,
}

impl LearningQueue {
    pub fn new(capacity: usize, policy: QueueFullPolicy) -> Self {
        Self {
            events: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
            policy,
            dropped: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    /// Enqueue without blocking. A full queue applies the configured policy
    /// and counts the drop; it is never an error.
    pub fn push(&self, event: LearningEvent) -> CairnResult<PushOutcome> {
        if self.closed.load(Ordering::Acquire) {
            return Err(LearningError::QueueClosed.into());
        }
        let outcome = {
            let mut events = self.lock()?;
            if events.len() < self.capacity {
                events.push_back(event);
                PushOutcome::Queued
            } else {
                match self.policy {
                    QueueFullPolicy::DropOldest => {
                        events.pop_front();
                        events.push_back(event);
                        PushOutcome::QueuedEvictedOldest
                    }
                    QueueFullPolicy::DropNewest => PushOutcome::Dropped,
                }
            }
        };
        if outcome != PushOutcome::Queued {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(dropped, policy = ?self.policy, "learning queue full");
        }
        self.notify.notify_one();
        Ok(outcome)
    }

    /// Remove up to `max` events, oldest first.
    pub fn drain(&self, max: usize) -> CairnResult<Vec<LearningEvent>> {
        let mut events = self.lock()?;
        let n = max.min(events.len());
        Ok(events.drain(..n).collect())
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy(&self) -> QueueFullPolicy {
        self.policy
    }

    /// Events discarded or evicted since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reject further pushes. Queued events can still be drained.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Resolves after the next push (or immediately if one happened since
    /// the last wait).
    pub async fn notified(&self) {
        self.notify.notified().await;
    }

    fn lock(&self) -> CairnResult<std::sync::MutexGuard<'_, VecDeque<LearningEvent>>> {
        self.events
            .lock()
            .map_err(|e| CairnError::ConcurrencyError(format!("learning queue poisoned: {e}")))
    }
}
