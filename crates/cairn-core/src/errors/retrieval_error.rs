use crate::models::RoutingPath;

/// Retrieval subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("backend {backend} unavailable: {reason}")]
    Unavailable { backend: String, reason: String },

    #[error("path {path} timed out after {elapsed_ms}ms")]
    Timeout { path: RoutingPath, elapsed_ms: u64 },

    #[error("search failed: {reason}")]
    SearchFailed { reason: String },

    #[error("no strategy registered for path {path}")]
    NoStrategy { path: RoutingPath },
}
