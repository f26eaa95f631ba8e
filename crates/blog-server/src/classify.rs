//! Classification of store outcomes into client-visible errors.
//!
//! Every request either succeeds or fails with exactly one of two kinds,
//! [`ErrorKind::InvalidInput`] or [`ErrorKind::NotFound`]. The functions here
//! are the only place store errors are turned into those kinds, one per
//! store primitive, so each operation's policy can be read (and tested) in
//! isolation.
//!
//! | Outcome | Kind |
//! |---|---|
//! | identifier does not decode | `InvalidInput` (store never consulted) |
//! | insert failed | `InvalidInput` |
//! | find matched nothing, or failed | `NotFound` |
//! | update failed, or matched nothing | `InvalidInput` |
//! | delete failed, or deleted anything but one | `InvalidInput` |
//! | scan failed to start | `NotFound` |

use blog_protocol::{ErrorCode, RpcError};
use blog_store::{DeleteResult, DocumentCursor, InsertOneResult, StoreResult, UpdateResult};
use blog_types::{BlogDraft, BlogId, BlogPost};
use tracing::{debug, warn};

/// The closed set of request failure kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
}

impl ErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput => ErrorCode::InvalidArgument,
            Self::NotFound => ErrorCode::NotFound,
        }
    }
}

/// A classified request failure with a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::InvalidInput,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::NotFound,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for RpcError {
    fn from(err: ServiceError) -> Self {
        RpcError::new(err.kind.code(), err.message)
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Decode a wire identifier.
pub fn decode_id(wire_id: &str) -> ServiceResult<BlogId> {
    BlogId::from_hex(wire_id).map_err(|_| ServiceError::invalid_input("Invalid blog ID"))
}

pub fn inserted(outcome: StoreResult<InsertOneResult>) -> ServiceResult<BlogId> {
    match outcome {
        Ok(res) => Ok(res.inserted_id),
        Err(e) => {
            warn!(error = %e, "insert failed");
            Err(ServiceError::invalid_input(format!(
                "There was an error creating a blog: {e}"
            )))
        }
    }
}

pub fn found(outcome: StoreResult<Option<BlogPost>>, wire_id: &str) -> ServiceResult<BlogPost> {
    match outcome {
        Ok(Some(post)) => Ok(post),
        Ok(None) => Err(ServiceError::not_found(format!(
            "No documents were found for id: {wire_id}"
        ))),
        Err(e) => {
            warn!(id = wire_id, error = %e, "find failed");
            Err(ServiceError::not_found(format!(
                "There was an error finding a blog with ID: {wire_id} ({e})"
            )))
        }
    }
}

/// "Matched nothing" and "store failure" are deliberately the same outcome.
pub fn updated(
    outcome: StoreResult<UpdateResult>,
    wire_id: &str,
    fields: &BlogDraft,
) -> ServiceResult<()> {
    let failure = || {
        ServiceError::invalid_input(format!(
            "Blog id: {wire_id} could not be updated with {{title: {:?}, content: {:?}}}",
            fields.title, fields.content
        ))
    };
    match outcome {
        Ok(res) if res.matched_count > 0 => Ok(()),
        Ok(_) => Err(failure()),
        Err(e) => {
            warn!(id = wire_id, error = %e, "update failed");
            Err(failure())
        }
    }
}

pub fn deleted(outcome: StoreResult<DeleteResult>, wire_id: &str) -> ServiceResult<()> {
    let failure = || ServiceError::invalid_input(format!("Unable to delete blog with ID: {wire_id}"));
    match outcome {
        Ok(res) if res.deleted_count == 1 => Ok(()),
        Ok(res) => {
            debug!(id = wire_id, deleted = res.deleted_count, "delete matched no single document");
            Err(failure())
        }
        Err(e) => {
            warn!(id = wire_id, error = %e, "delete failed");
            Err(failure())
        }
    }
}

/// Only a scan that could not start is an error. A started scan with no
/// results is an empty cursor and classifies as success.
pub fn scan_started(outcome: StoreResult<DocumentCursor>) -> ServiceResult<DocumentCursor> {
    outcome.map_err(|e| {
        warn!(error = %e, "scan failed to start");
        ServiceError::not_found("There was an error listing blogs")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_store::StoreError;

    fn store_failure() -> StoreError {
        StoreError::Unavailable("connection reset".into())
    }

    #[test]
    fn malformed_ids_are_invalid_input() {
        for bad in ["", "xyz", "123", "zzzzzzzzzzzzzzzzzzzzzzzz", "5f1a2b3c4d5e6f7a8b9c0d1e00"] {
            let err = decode_id(bad).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidInput, "{bad:?}");
            assert_eq!(err.message, "Invalid blog ID");
        }
    }

    #[test]
    fn well_formed_id_decodes() {
        let id = BlogId::generate();
        assert_eq!(decode_id(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn insert_outcomes() {
        let id = BlogId::generate();
        assert_eq!(inserted(Ok(InsertOneResult { inserted_id: id })).unwrap(), id);

        let err = inserted(Err(StoreError::Rejected("duplicate key".into()))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert!(err.message.starts_with("There was an error creating a blog"));
        assert!(err.message.contains("duplicate key"));
    }

    #[test]
    fn find_outcomes() {
        let post = BlogPost::new(BlogId::generate(), "t", "c");
        assert_eq!(found(Ok(Some(post.clone())), "x").unwrap(), post);

        let err = found(Ok(None), "abc").unwrap_err();
        assert_eq!(err, ServiceError::not_found("No documents were found for id: abc"));

        let err = found(Err(store_failure()), "abc").unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("There was an error finding a blog with ID: abc"));
    }

    #[test]
    fn update_outcomes() {
        let fields = BlogDraft::new("t", "c");
        assert!(updated(Ok(UpdateResult::matched(true)), "x", &fields).is_ok());
        assert!(updated(Ok(UpdateResult::matched(false)), "x", &fields).is_ok());

        let unmatched = updated(Ok(UpdateResult::unmatched()), "x", &fields).unwrap_err();
        let failed = updated(Err(store_failure()), "x", &fields).unwrap_err();
        assert_eq!(unmatched.kind, ErrorKind::InvalidInput);
        assert_eq!(unmatched, failed);
        assert_eq!(
            unmatched.message,
            r#"Blog id: x could not be updated with {title: "t", content: "c"}"#
        );
    }

    #[test]
    fn delete_outcomes() {
        assert!(deleted(Ok(DeleteResult { deleted_count: 1 }), "x").is_ok());

        for outcome in [
            Ok(DeleteResult { deleted_count: 0 }),
            Ok(DeleteResult { deleted_count: 2 }),
            Err(store_failure()),
        ] {
            let err = deleted(outcome, "x").unwrap_err();
            assert_eq!(err, ServiceError::invalid_input("Unable to delete blog with ID: x"));
        }
    }

    #[test]
    fn scan_outcomes_are_separate_branches() {
        let cursor = scan_started(Ok(DocumentCursor::empty())).unwrap();
        assert_eq!(cursor.remaining(), 0);

        let err = scan_started(Err(store_failure())).unwrap_err();
        assert_eq!(err, ServiceError::not_found("There was an error listing blogs"));
    }

    #[test]
    fn kinds_map_to_wire_codes() {
        let rpc: RpcError = ServiceError::invalid_input("bad").into();
        assert_eq!(rpc.code, ErrorCode::InvalidArgument);
        assert_eq!(rpc.msg, "bad");

        let rpc: RpcError = ServiceError::not_found("gone").into();
        assert_eq!(rpc.code, ErrorCode::NotFound);
    }
}
