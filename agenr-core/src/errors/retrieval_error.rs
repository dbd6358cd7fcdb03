/// Errors scoped to the recall engine.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("embedding provider failed: {reason}")]
    EmbeddingFailed { reason: String },

    #[error("query embedding has {actual} dimensions, entries were indexed with {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid recall query: {reason}")]
    InvalidQuery { reason: String },
}
