/// Cross-process database lock errors.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("another process (PID {pid}) is using this database")]
    HeldByLivePid { pid: u32 },

    #[error("failed to create lockfile at {path}: {reason}")]
    CreateFailed { path: String, reason: String },

    #[error("failed to read lockfile at {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("failed to remove stale lockfile at {path}: {reason}")]
    RemoveFailed { path: String, reason: String },
}
