use async_trait::async_trait;
use blog_types::{BlogDraft, BlogId, BlogPost};

use crate::error::StoreResult;
use crate::results::{DeleteResult, DocumentCursor, InsertOneResult, UpdateResult};

/// A collection of blog post documents keyed by [`BlogId`].
///
/// All implementations must satisfy these invariants:
/// - The store, not the caller, assigns identifiers on insert, and never
///   reuses one.
/// - Every single-document operation is atomic.
/// - A missing document is a successful outcome (`None`, a zero count, an
///   empty cursor), never an `Err`. `Err` means the store could not perform
///   the operation at all.
/// - Implementations synchronise internally; callers share one handle
///   across tasks.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a new document and return its generated identifier.
    async fn insert_one(&self, draft: BlogDraft) -> StoreResult<InsertOneResult>;

    /// Find the document whose `_id` equals `id`.
    async fn find_one(&self, id: &BlogId) -> StoreResult<Option<BlogPost>>;

    /// Replace `title` and `content` of the document whose `_id` equals `id`.
    async fn update_one(&self, id: &BlogId, fields: BlogDraft) -> StoreResult<UpdateResult>;

    /// Delete the document whose `_id` equals `id`.
    async fn delete_one(&self, id: &BlogId) -> StoreResult<DeleteResult>;

    /// Start a scan over the whole collection returning at most `limit`
    /// documents. A `limit` of zero means no limit. Order is unspecified.
    async fn find_many(&self, limit: usize) -> StoreResult<DocumentCursor>;

    /// Number of documents in the collection.
    async fn count(&self) -> StoreResult<usize>;
}
