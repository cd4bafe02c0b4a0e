//! Periodic background rebuilds.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use cairn_core::errors::CairnResult;
use cairn_core::models::GraphStats;

use crate::engine::GraphStore;

/// Run `rebuild` every `interval` until `cancel` fires.
///
/// Each run goes to the blocking pool since the catalog source is
/// synchronous. A failed rebuild is logged and the schedule continues.
/// Callers that keep derived state (caches, metrics) pass their own rebuild
/// so that state follows every scheduled generation.
pub fn spawn_schedule<F>(
    interval: Duration,
    cancel: CancellationToken,
    rebuild: F,
) -> JoinHandle<()>
where
    F: Fn() -> CairnResult<GraphStats> + Send + Sync + 'static,
{
    let rebuild = Arc::new(rebuild);
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + interval;
        let mut ticker = tokio::time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("graph rebuild schedule stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let rebuild = Arc::clone(&rebuild);
                    match tokio::task::spawn_blocking(move || rebuild()).await {
                        Ok(Ok(stats)) => {
                            debug!(generation = stats.generation, "scheduled graph rebuild");
                        }
                        Ok(Err(e)) => warn!(error = %e, "scheduled graph rebuild failed"),
                        Err(e) => warn!(error = %e, "scheduled graph rebuild panicked"),
                    }
                }
            }
        }
    })
}

impl GraphStore {
    /// Scheduled [`GraphStore::rebuild`] with no derived state to refresh.
    pub fn spawn_rebuild_schedule(
        self: &Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let store = Arc::clone(self);
        spawn_schedule(interval, cancel, move || store.rebuild())
    }
}
