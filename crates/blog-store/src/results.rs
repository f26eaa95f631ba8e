use blog_types::{BlogId, BlogPost};

use crate::error::StoreResult;

/// Outcome of [`DocumentStore::insert_one`](crate::DocumentStore::insert_one).
///
/// Carries the identifier the store generated, already in its native form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertOneResult {
    pub inserted_id: BlogId,
}

/// Outcome of [`DocumentStore::update_one`](crate::DocumentStore::update_one).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UpdateResult {
    /// Documents matching the filter (0 or 1).
    pub matched_count: u64,
    /// Documents whose stored fields actually changed.
    pub modified_count: u64,
}

impl UpdateResult {
    pub fn matched(modified: bool) -> Self {
        Self {
            matched_count: 1,
            modified_count: u64::from(modified),
        }
    }

    pub fn unmatched() -> Self {
        Self::default()
    }
}

/// Outcome of [`DocumentStore::delete_one`](crate::DocumentStore::delete_one).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Results of a started scan.
///
/// Each item is materialized separately, so a scan that started successfully
/// can still fail part-way through. Consumers decide what to do with items
/// that fail.
pub struct DocumentCursor {
    items: std::vec::IntoIter<StoreResult<BlogPost>>,
}

impl DocumentCursor {
    pub fn new(items: Vec<StoreResult<BlogPost>>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }

    /// A cursor over documents that all materialize successfully.
    pub fn from_posts(posts: Vec<BlogPost>) -> Self {
        Self::new(posts.into_iter().map(Ok).collect())
    }

    /// An empty cursor: the scan started and matched nothing.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Remaining items, including ones that will fail.
    pub fn remaining(&self) -> usize {
        self.items.len()
    }
}

impl Iterator for DocumentCursor {
    type Item = StoreResult<BlogPost>;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }
}

impl std::fmt::Debug for DocumentCursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentCursor")
            .field("remaining", &self.remaining())
            .finish()
    }
}
