//! Background worker: drains the queue into the log and runs batch updates
//! when a trigger fires. Never runs on the request path; each cycle runs on
//! the blocking pool.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use cairn_core::errors::{CairnError, LearningError};

use crate::engine::LearningEngine;

/// Spawn the worker loop. It wakes on every push or every `poll`, whichever
/// comes first, and exits when `cancel` fires after a final drain.
pub fn spawn(engine: Arc<LearningEngine>, poll: Duration, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = engine.queue().notified() => {}
                _ = tokio::time::sleep(poll) => {}
            }
            let cycle = Arc::clone(&engine);
            match tokio::task::spawn_blocking(move || cycle.maybe_update()).await {
                Ok(Ok(Some(analytics))) => {
                    debug!(sequence = analytics.processed_sequence, "worker ran learning update")
                }
                Ok(Ok(None)) => {}
                Ok(Err(CairnError::LearningError(LearningError::UpdateInProgress))) => {}
                Ok(Err(e)) => warn!(error = %e, "learning worker cycle failed"),
                Err(e) => warn!(error = %e, "learning worker cycle panicked"),
            }
        }
        if let Err(e) = engine.pump() {
            warn!(error = %e, "final learning drain failed");
        }
        debug!("learning worker stopped");
    })
}
