use thiserror::Error;

/// Errors that stop the server from starting or serving.
///
/// Per-request failures never use this type; they are classified into
/// [`ServiceError`](crate::classify::ServiceError).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("store error: {0}")]
    Store(#[from] blog_store::StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;
