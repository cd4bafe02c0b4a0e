//! LearningEngine: the continuous learner's public surface.
//!
//! Recording is a non-blocking enqueue. The worker (or an explicit call)
//! moves queued events into the interaction log and runs batch updates over
//! a sequence-bounded snapshot.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use cairn_core::config::LearningConfig;
use cairn_core::errors::{CairnError, CairnResult, LearningError};
use cairn_core::models::{
    CategorySuggestion, InteractionType, LearningAnalytics, LearningEvent, LearningInteraction,
    ShownResponse,
};

use crate::log::InteractionLog;
use crate::queue::{LearningQueue, PushOutcome};
use crate::triggers::{self, TriggerReason};
use crate::{analytics, suggestions};

/// Events moved from the queue to the log per pump.
const DRAIN_BATCH: usize = 1_000;

/// Largest retention `chrono::Duration` can hold.
const MAX_RETENTION_SECS: u64 = i64::MAX as u64 / 1_000;

struct UpdateState {
    last_update: Instant,
    last_analytics: Option<LearningAnalytics>,
    last_suggestions: Vec<CategorySuggestion>,
}

pub struct LearningEngine {
    config: LearningConfig,
    queue: LearningQueue,
    log: InteractionLog,
    /// Highest log sequence covered by a completed batch update.
    processed_sequence: AtomicU64,
    updating: AtomicBool,
    state: Mutex<UpdateState>,
}

impl LearningEngine {
    pub fn new(config: LearningConfig) -> Self {
        Self {
            queue: LearningQueue::new(config.queue_capacity, config.queue_full_policy),
            log: InteractionLog::new(),
            processed_sequence: AtomicU64::new(0),
            updating: AtomicBool::new(false),
            state: Mutex::new(UpdateState {
                last_update: Instant::now(),
                last_analytics: None,
                last_suggestions: Vec::new(),
            }),
            config,
        }
    }

    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// Enqueue a user interaction. Never blocks; a full queue drops per policy.
    pub fn record_interaction(&self, interaction: LearningInteraction) -> CairnResult<PushOutcome> {
        if interaction.query_id.trim().is_empty() {
            return Err(LearningError::InvalidInteraction {
                reason: "query_id must not be empty".into(),
            }
            .into());
        }
        if interaction.interaction_type == InteractionType::Click
            && interaction.document_id.is_none()
        {
            return Err(LearningError::InvalidInteraction {
                reason: "click interactions need a document_id".into(),
            }
            .into());
        }
        self.queue.push(LearningEvent::Interaction(interaction))
    }

    /// Enqueue a served response.
    pub fn record_response(&self, shown: ShownResponse) -> CairnResult<PushOutcome> {
        self.queue.push(LearningEvent::ResponseShown(shown))
    }

    /// Move queued events into the log. Returns how many moved.
    pub fn pump(&self) -> CairnResult<usize> {
        let mut moved = 0;
        loop {
            let batch = self.queue.drain(DRAIN_BATCH)?;
            if batch.is_empty() {
                break;
            }
            moved += batch.len();
            self.log.append(batch)?;
        }
        if moved > 0 {
            debug!(moved, "learning events logged");
        }
        Ok(moved)
    }

    /// Logged plus queued events not yet covered by a batch update.
    pub fn pending(&self) -> CairnResult<u64> {
        let logged = self.log.latest_sequence()?;
        Ok(logged.saturating_sub(self.processed_sequence.load(Ordering::Acquire))
            + self.queue.len() as u64)
    }

    /// Run a batch update now over everything logged so far.
    pub fn trigger_learning_update(&self) -> CairnResult<LearningAnalytics> {
        self.run_update(TriggerReason::Manual)
    }

    /// Run an update if an automatic trigger fires. Used by the worker.
    pub fn maybe_update(&self) -> CairnResult<Option<LearningAnalytics>> {
        self.pump()?;
        let since_last = self.lock_state()?.last_update.elapsed();
        match triggers::evaluate(self.pending()?, since_last, &self.config) {
            Some(reason) => self.run_update(reason).map(Some),
            None => Ok(None),
        }
    }

    fn run_update(&self, reason: TriggerReason) -> CairnResult<LearningAnalytics> {
        if self
            .updating
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(LearningError::UpdateInProgress.into());
        }
        let result = self.update_locked(reason);
        self.updating.store(false, Ordering::Release);
        result
    }

    fn update_locked(&self, reason: TriggerReason) -> CairnResult<LearningAnalytics> {
        let started = Instant::now();
        self.pump()?;
        let up_to = self.log.latest_sequence()?;
        let snapshot = self.log.snapshot(up_to)?;

        let analytics = analytics::compute(&snapshot, None);
        let suggestions = suggestions::suggest(
            &snapshot,
            usize::MAX,
            self.config.min_suggestion_confidence,
            self.config.min_click_support,
        );

        {
            let mut state = self.lock_state()?;
            state.last_update = Instant::now();
            state.last_analytics = Some(analytics.clone());
            state.last_suggestions = suggestions;
        }
        self.processed_sequence.store(up_to, Ordering::Release);
        let compacted = self.compact(up_to)?;

        info!(
            reason = ?reason,
            processed_sequence = up_to,
            responses = analytics.total_responses,
            interactions = analytics.total_interactions,
            ctr = analytics.click_through_rate,
            dropped = self.queue.dropped(),
            compacted,
            retained = self.log.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "learning update completed"
        );
        Ok(analytics)
    }

    /// Drop processed entries outside the retention window or over the
    /// entry cap. Analytics and suggestions cover what is retained.
    fn compact(&self, processed: u64) -> CairnResult<usize> {
        let secs = self.config.log_retention_secs.min(MAX_RETENTION_SECS) as i64;
        let retention = chrono::Duration::seconds(secs);
        let cutoff = Utc::now()
            .checked_sub_signed(retention)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.log
            .compact(processed, cutoff, self.config.log_max_entries)
    }

    /// Category suggestions from the log as of the last batch update, capped
    /// at `max` and filtered to `min_confidence`.
    pub fn generate_category_suggestions(
        &self,
        max: usize,
        min_confidence: f64,
    ) -> CairnResult<Vec<CategorySuggestion>> {
        let up_to = self.processed_sequence.load(Ordering::Acquire);
        let snapshot = self.log.snapshot(up_to)?;
        Ok(suggestions::suggest(
            &snapshot,
            max,
            min_confidence,
            self.config.min_click_support,
        ))
    }

    /// Analytics over every retained event at or after `since`.
    pub fn get_analytics(&self, since: Option<DateTime<Utc>>) -> CairnResult<LearningAnalytics> {
        self.pump()?;
        let snapshot = self.log.snapshot(self.log.latest_sequence()?)?;
        Ok(analytics::compute(&snapshot, since))
    }

    /// Result of the most recent batch update, if any ran.
    pub fn last_analytics(&self) -> CairnResult<Option<LearningAnalytics>> {
        Ok(self.lock_state()?.last_analytics.clone())
    }

    pub fn last_suggestions(&self) -> CairnResult<Vec<CategorySuggestion>> {
        Ok(self.lock_state()?.last_suggestions.clone())
    }

    pub fn processed_sequence(&self) -> u64 {
        self.processed_sequence.load(Ordering::Acquire)
    }

    pub fn dropped_events(&self) -> u64 {
        self.queue.dropped()
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    pub fn queue(&self) -> &LearningQueue {
        &self.queue
    }

    /// Start the background worker. See [`crate::worker`].
    pub fn spawn_worker(self: &Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let poll = Duration::from_millis(self.config.worker_poll_interval_ms.max(1));
        crate::worker::spawn(self.clone(), poll, cancel)
    }

    fn lock_state(&self) -> CairnResult<std::sync::MutexGuard<'_, UpdateState>> {
        self.state
            .lock()
            .map_err(|e| CairnError::ConcurrencyError(format!("learning state poisoned: {e}")))
    }
}

impl Default for LearningEngine {
    fn default() -> Self {
        Self::new(LearningConfig::default())
    }
}
