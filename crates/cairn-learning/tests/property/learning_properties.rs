//! Property tests for cairn-learning: bounded queue accounting and log
//! sequence monotonicity.

use proptest::prelude::*;

use cairn_core::config::QueueFullPolicy;
use cairn_core::models::{InteractionType, LearningEvent, LearningInteraction};
use cairn_learning::{InteractionLog, LearningQueue};

fn event(i: usize) -> LearningEvent {
    LearningEvent::Interaction(LearningInteraction::new(
        format!("q{i}"),
        "u",
        InteractionType::Expand,
        None,
    ))
}

fn policy(drop_oldest: bool) -> QueueFullPolicy {
    if drop_oldest {
        QueueFullPolicy::DropOldest
    } else {
        QueueFullPolicy::DropNewest
    }
}

// =============================================================================
// Queue: never exceeds capacity, queued + dropped == pushed
// =============================================================================

proptest! {
    #[test]
    fn queue_accounting_balances(
        capacity in 1usize..32,
        pushes in 0usize..128,
        drop_oldest in any::<bool>(),
    ) {
        let q = LearningQueue::new(capacity, policy(drop_oldest));
        for i in 0..pushes {
            q.push(event(i)).unwrap();
            prop_assert!(q.len() <= capacity);
        }
        prop_assert_eq!(q.len() as u64 + q.dropped(), pushes as u64);
    }

    #[test]
    fn drop_oldest_retains_most_recent(capacity in 1usize..16, pushes in 1usize..64) {
        let q = LearningQueue::new(capacity, QueueFullPolicy::DropOldest);
        for i in 0..pushes {
            q.push(event(i)).unwrap();
        }
        let drained = q.drain(usize::MAX).unwrap();
        let first_kept = pushes.saturating_sub(capacity);
        let expected: Vec<String> = (first_kept..pushes).map(|i| format!("q{i}")).collect();
        let got: Vec<String> = drained.iter().map(|e| e.query_id().to_string()).collect();
        prop_assert_eq!(got, expected);
    }
}

// =============================================================================
// Log: sequences are contiguous from 1 and snapshots are prefix-bounded
// =============================================================================

proptest! {
    #[test]
    fn log_sequences_are_contiguous(batches in proptest::collection::vec(0usize..8, 0..12)) {
        let log = InteractionLog::new();
        let mut n = 0;
        for size in &batches {
            let events = (0..*size).map(|i| event(n + i)).collect();
            log.append(events).unwrap();
            n += size;
        }
        let all = log.snapshot(u64::MAX).unwrap();
        prop_assert_eq!(all.len(), n);
        for (i, entry) in all.iter().enumerate() {
            prop_assert_eq!(entry.sequence, i as u64 + 1);
        }
        let half = (n / 2) as u64;
        prop_assert!(log.snapshot(half).unwrap().iter().all(|e| e.sequence <= half));
        prop_assert_eq!(log.since_sequence(half).unwrap().len(), n - half as usize);
    }
}
