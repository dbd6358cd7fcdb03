/// Errors scoped to consolidation.
#[derive(Debug, thiserror::Error)]
pub enum ConsolidationError {
    #[error("consolidation is already running")]
    AlreadyRunning,

    #[error("backup required before consolidation mutation: {reason}")]
    BackupFailed { reason: String },

    #[error("in-memory databases cannot be consolidated (backup impossible)")]
    InMemoryUnsupported,
}
