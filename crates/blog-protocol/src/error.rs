use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures while turning bytes into messages or back.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Error codes carried in the error envelope.
///
/// `InvalidArgument` and `NotFound` are produced by the request handlers.
/// The remaining codes come from the transport itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidArgument,
    NotFound,
    Malformed,
    BadRoute,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid_argument",
            Self::NotFound => "not_found",
            Self::Malformed => "malformed",
            Self::BadRoute => "bad_route",
            Self::Internal => "internal",
        }
    }

    /// HTTP status the code is served with.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidArgument | Self::Malformed => 400,
            Self::NotFound | Self::BadRoute => 404,
            Self::Internal => 500,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error envelope: `{"code": "not_found", "msg": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: ErrorCode,
    pub msg: String,
}

impl RpcError {
    pub fn new(code: ErrorCode, msg: impl Into<String>) -> Self {
        Self { code, msg: msg.into() }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Malformed, msg)
    }

    pub fn bad_route(method: &str, path: &str) -> Self {
        Self::new(
            ErrorCode::BadRoute,
            format!("no handler for {method} {path}"),
        )
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.msg)
    }
}

impl std::error::Error for RpcError {}

impl From<ProtocolError> for RpcError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Serialization(msg) => Self::internal(msg),
            other => Self::malformed(format!("the json request could not be decoded: {other}")),
        }
    }
}
