use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use blog_types::{BlogDraft, BlogId, BlogPost};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::results::{DeleteResult, DocumentCursor, InsertOneResult, UpdateResult};
use crate::traits::DocumentStore;

/// In-memory, map-based document store.
///
/// Intended for tests and single-process deployments. Documents are held
/// behind a `RwLock` and cloned on read. Data is lost when the store is
/// dropped.
pub struct InMemoryDocumentStore {
    posts: RwLock<BTreeMap<BlogId, BlogPost>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.read().map(|p| p.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<BlogId, BlogPost>>> {
        self.posts
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<BlogId, BlogPost>>> {
        self.posts
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_one(&self, draft: BlogDraft) -> StoreResult<InsertOneResult> {
        let id = BlogId::generate();
        let mut posts = self.write()?;
        if posts.contains_key(&id) {
            return Err(StoreError::Rejected(format!("duplicate key: {id}")));
        }
        posts.insert(id, draft.into_post(id));
        debug!(%id, "inserted document");
        Ok(InsertOneResult { inserted_id: id })
    }

    async fn find_one(&self, id: &BlogId) -> StoreResult<Option<BlogPost>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn update_one(&self, id: &BlogId, fields: BlogDraft) -> StoreResult<UpdateResult> {
        let mut posts = self.write()?;
        let Some(post) = posts.get_mut(id) else {
            return Ok(UpdateResult::unmatched());
        };
        let modified = post.title != fields.title || post.content != fields.content;
        post.replace(fields.title, fields.content);
        debug!(%id, modified, "updated document");
        Ok(UpdateResult::matched(modified))
    }

    async fn delete_one(&self, id: &BlogId) -> StoreResult<DeleteResult> {
        let removed = self.write()?.remove(id).is_some();
        debug!(%id, removed, "deleted document");
        Ok(DeleteResult {
            deleted_count: u64::from(removed),
        })
    }

    async fn find_many(&self, limit: usize) -> StoreResult<DocumentCursor> {
        let posts = self.read()?;
        let take = if limit == 0 { usize::MAX } else { limit };
        Ok(DocumentCursor::from_posts(
            posts.values().take(take).cloned().collect(),
        ))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("document_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, content: &str) -> BlogDraft {
        BlogDraft::new(title, content)
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn insert_and_find() {
        let store = InMemoryDocumentStore::new();
        let res = store.insert_one(draft("hello", "world")).await.unwrap();

        let post = store.find_one(&res.inserted_id).await.unwrap().expect("should exist");
        assert_eq!(post.id, res.inserted_id);
        assert_eq!(post.title, "hello");
        assert_eq!(post.content, "world");
    }

    #[tokio::test]
    async fn insert_assigns_distinct_ids() {
        let store = InMemoryDocumentStore::new();
        let a = store.insert_one(draft("same", "same")).await.unwrap();
        let b = store.insert_one(draft("same", "same")).await.unwrap();
        assert_ne!(a.inserted_id, b.inserted_id);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn find_missing_returns_none() {
        let store = InMemoryDocumentStore::new();
        assert!(store.find_one(&BlogId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_replaces_both_fields() {
        let store = InMemoryDocumentStore::new();
        let id = store.insert_one(draft("A", "B")).await.unwrap().inserted_id;

        let res = store.update_one(&id, draft("C", "D")).await.unwrap();
        assert_eq!(res, UpdateResult { matched_count: 1, modified_count: 1 });

        let post = store.find_one(&id).await.unwrap().unwrap();
        assert_eq!((post.title.as_str(), post.content.as_str()), ("C", "D"));
    }

    #[tokio::test]
    async fn update_with_same_values_matches_without_modifying() {
        let store = InMemoryDocumentStore::new();
        let id = store.insert_one(draft("A", "B")).await.unwrap().inserted_id;
        let res = store.update_one(&id, draft("A", "B")).await.unwrap();
        assert_eq!(res, UpdateResult { matched_count: 1, modified_count: 0 });
    }

    #[tokio::test]
    async fn update_missing_matches_nothing() {
        let store = InMemoryDocumentStore::new();
        let res = store.update_one(&BlogId::generate(), draft("x", "y")).await.unwrap();
        assert_eq!(res.matched_count, 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn delete_present_then_missing() {
        let store = InMemoryDocumentStore::new();
        let id = store.insert_one(draft("t", "c")).await.unwrap().inserted_id;

        assert_eq!(store.delete_one(&id).await.unwrap().deleted_count, 1);
        assert!(store.find_one(&id).await.unwrap().is_none());
        assert_eq!(store.delete_one(&id).await.unwrap().deleted_count, 0);
    }

    // -----------------------------------------------------------------------
    // Scans
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn find_many_respects_limit() {
        let store = InMemoryDocumentStore::new();
        for i in 0..10 {
            store.insert_one(draft(&format!("t{i}"), "c")).await.unwrap();
        }
        assert_eq!(store.find_many(3).await.unwrap().count(), 3);
        assert_eq!(store.find_many(100).await.unwrap().count(), 10);
    }

    #[tokio::test]
    async fn find_many_zero_limit_is_unlimited() {
        let store = InMemoryDocumentStore::new();
        for _ in 0..5 {
            store.insert_one(draft("t", "c")).await.unwrap();
        }
        assert_eq!(store.find_many(0).await.unwrap().count(), 5);
    }

    #[tokio::test]
    async fn find_many_on_empty_store_is_empty_cursor() {
        let store = InMemoryDocumentStore::new();
        let cursor = store.find_many(25).await.unwrap();
        assert_eq!(cursor.remaining(), 0);
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[test]
    fn default_creates_empty_store() {
        assert!(InMemoryDocumentStore::default().is_empty());
    }

    #[test]
    fn debug_format() {
        let store = InMemoryDocumentStore::new();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryDocumentStore"));
        assert!(debug.contains("document_count"));
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_are_all_kept() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryDocumentStore::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.insert_one(draft(&format!("t{i}"), "c")).await.unwrap().inserted_id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await.expect("task should not panic"));
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16);
        assert_eq!(store.len(), 16);
    }
}
