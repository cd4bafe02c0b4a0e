//! Concurrent per-path retrieval.
//!
//! One task per routing path, each under its own timeout clipped to the
//! outer deadline. The caller gets nothing back until every task has
//! finished, timed out or been aborted.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Instrument};

use cairn_core::config::SearchConfig;
use cairn_core::errors::{CairnError, CairnResult, PathFailure};
use cairn_core::models::{CandidateResult, PathOutcome, PathStatus, RoutingPath};
use cairn_retrieval::{StrategyContext, StrategyTable};

/// Everything the retrieval stage produced.
#[derive(Debug, Default)]
pub struct PathResults {
    pub per_path: BTreeMap<RoutingPath, Vec<CandidateResult>>,
    /// One outcome per requested path, in request order.
    pub outcomes: Vec<PathOutcome>,
    pub expanded_query: Option<String>,
    /// A path timed out on a budget the outer deadline had cut short.
    pub deadline_hit: bool,
}

impl PathResults {
    pub fn any_succeeded(&self) -> bool {
        self.outcomes.iter().any(PathOutcome::is_success)
    }

    pub fn any_failed(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_success())
    }

    pub fn failures(&self) -> Vec<PathFailure> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| PathFailure {
                path: o.path,
                reason: o.reason.clone().unwrap_or_default(),
                timed_out: o.status == PathStatus::TimedOut,
            })
            .collect()
    }
}

/// Run every path in `paths` concurrently against `ctx`.
///
/// Cancellation aborts all in-flight tasks and returns `Cancelled`.
pub async fn retrieve_all(
    strategies: &StrategyTable,
    config: &SearchConfig,
    ctx: Arc<StrategyContext>,
    paths: &[RoutingPath],
    query_id: &str,
    deadline: Instant,
    cancel: &CancellationToken,
) -> CairnResult<PathResults> {
    let mut results = PathResults::default();
    let mut set = JoinSet::new();
    let mut pending: BTreeSet<RoutingPath> = BTreeSet::new();
    let mut clipped: BTreeSet<RoutingPath> = BTreeSet::new();
    let mut expansions: BTreeMap<RoutingPath, String> = BTreeMap::new();

    for &path in paths {
        let strategy = match strategies.get(path) {
            Ok(strategy) => strategy,
            Err(e) => {
                results.outcomes.push(PathOutcome::failed(path, e.to_string(), 0));
                continue;
            }
        };
        let own = config.path_timeout(path);
        let budget = own.min(deadline.saturating_duration_since(Instant::now()));
        if budget < own {
            clipped.insert(path);
        }
        let ctx = Arc::clone(&ctx);
        let span = cairn_observability::path_span!(query_id, path);
        pending.insert(path);
        set.spawn(
            async move {
                let started = Instant::now();
                let result = tokio::time::timeout(budget, strategy.retrieve(&ctx)).await;
                (path, started.elapsed(), result)
            }
            .instrument(span),
        );
    }

    loop {
        let joined = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                set.abort_all();
                debug!(query_id, in_flight = pending.len(), "retrieval cancelled");
                return Err(CairnError::Cancelled);
            }
            joined = set.join_next() => joined,
        };
        let Some(joined) = joined else {
            break;
        };
        let (path, elapsed, result) = match joined {
            Ok(done) => done,
            Err(e) => {
                warn!(query_id, error = %e, "retrieval task aborted");
                continue;
            }
        };
        pending.remove(&path);
        let elapsed_ms = elapsed.as_millis() as u64;
        match result {
            Ok(Ok(output)) => {
                debug!(query_id, path = %path, candidates = output.candidates.len(), elapsed_ms, "path succeeded");
                results
                    .outcomes
                    .push(PathOutcome::succeeded(path, output.candidates.len(), elapsed_ms));
                if let Some(expanded) = output.expanded_query {
                    expansions.insert(path, expanded);
                }
                results.per_path.insert(path, output.candidates);
            }
            Ok(Err(e)) => {
                warn!(query_id, path = %path, error = %e, "path failed");
                results
                    .outcomes
                    .push(PathOutcome::failed(path, e.to_string(), elapsed_ms));
            }
            Err(_) => {
                warn!(query_id, path = %path, elapsed_ms, "path timed out");
                if clipped.contains(&path) {
                    results.deadline_hit = true;
                }
                results.outcomes.push(PathOutcome::timed_out(path, elapsed_ms));
            }
        }
    }

    // Tasks that panicked never report their path.
    for path in pending {
        results
            .outcomes
            .push(PathOutcome::failed(path, "retrieval task aborted", 0));
    }

    let order = |path: RoutingPath| paths.iter().position(|p| *p == path).unwrap_or(usize::MAX);
    results.outcomes.sort_by_key(|o| order(o.path));
    results.expanded_query = paths.iter().find_map(|p| expansions.remove(p));
    Ok(results)
}
