/// Continuous learning errors.
#[derive(Debug, thiserror::Error)]
pub enum LearningError {
    #[error("learning queue is closed")]
    QueueClosed,

    #[error("invalid interaction: {reason}")]
    InvalidInteraction { reason: String },

    #[error("learning update already running")]
    UpdateInProgress,
}
