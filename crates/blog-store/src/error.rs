use std::path::PathBuf;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store refused the write (constraint violation, duplicate key, ...).
    #[error("write rejected: {0}")]
    Rejected(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A journal record could not be read back.
    #[error("corrupt journal record at line {line}: {reason}")]
    CorruptRecord { line: usize, reason: String },

    /// The journal path cannot be used.
    #[error("journal path unusable: {0}")]
    InvalidPath(PathBuf),

    /// A lock guarding store state was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),

    /// The store cannot serve requests right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
