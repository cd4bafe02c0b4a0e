use crate::models::ExportFormat;

/// Results export errors.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no stored response for query {query_id}")]
    QueryNotFound { query_id: String },

    #[error("failed to render {format} export: {reason}")]
    RenderFailed { format: ExportFormat, reason: String },
}
