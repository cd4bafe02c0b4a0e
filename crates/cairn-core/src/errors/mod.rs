mod export_error;
mod graph_error;
mod learning_error;
mod retrieval_error;

pub use export_error::ExportError;
pub use graph_error::GraphError;
pub use learning_error::LearningError;
pub use retrieval_error::RetrievalError;

use serde::{Deserialize, Serialize};

use crate::models::RoutingPath;

/// Why a single retrieval path did not contribute to a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathFailure {
    pub path: RoutingPath,
    pub reason: String,
    pub timed_out: bool,
}

fn describe_failures(failures: &[PathFailure]) -> String {
    if failures.is_empty() {
        return "no paths were attempted".to_string();
    }
    failures
        .iter()
        .map(|f| format!("{}: {}", f.path, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Top-level error type for the Cairn engine.
///
/// Only `InvalidInput`, `AllPathsFailed` and a caller-initiated `Cancelled`
/// ever escape `search`. The remaining variants are produced internally and
/// folded into degraded responses.
#[derive(Debug, thiserror::Error)]
pub enum CairnError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("retrieval path {path} unavailable: {reason}")]
    PathUnavailable { path: RoutingPath, reason: String },

    #[error("all retrieval paths unavailable: {}", describe_failures(.failures))]
    AllPathsFailed { failures: Vec<PathFailure> },

    #[error("classification degraded: {reason}")]
    ClassificationDegraded { reason: String },

    #[error("reranking unavailable: {reason}")]
    RerankUnavailable { reason: String },

    #[error("graph rebuild failed: {reason}")]
    GraphRebuildFailed { reason: String },

    #[error("graph error: {0}")]
    GraphError(#[from] GraphError),

    #[error("retrieval error: {0}")]
    RetrievalError(#[from] RetrievalError),

    #[error("learning error: {0}")]
    LearningError(#[from] LearningError),

    #[error("export error: {0}")]
    ExportError(#[from] ExportError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("concurrency error: {0}")]
    ConcurrencyError(String),

    #[error("request cancelled")]
    Cancelled,
}

impl CairnError {
    /// Shorthand for an `InvalidInput` error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type CairnResult<T> = Result<T, CairnError>;
