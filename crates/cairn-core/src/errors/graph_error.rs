/// Graph store errors.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("node not found: {node_id}")]
    NodeNotFound { node_id: String },

    #[error("invalid edge {source_id} -> {target_id}: {reason}")]
    InvalidEdge {
        source_id: String,
        target_id: String,
        reason: String,
    },

    #[error("catalog source {source_name} unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },
}
