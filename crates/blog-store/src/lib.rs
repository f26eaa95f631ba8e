//! Document storage for the blog service.
//!
//! The service keeps a single collection of blog post documents shaped
//! `{_id, title, content}`. This crate defines the collection interface and
//! the backends that implement it.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`InMemoryDocumentStore`] -- map-based store for tests and embedding
//! - [`FileDocumentStore`] -- append-only journal replayed on open
//!
//! # Design Rules
//!
//! 1. The store assigns identifiers; callers never do.
//! 2. "Nothing matched" is a successful outcome reported through counts,
//!    `None`, or an empty cursor. `Err` is reserved for operations the store
//!    could not perform.
//! 3. Scans hand back a [`DocumentCursor`] whose items materialize one by
//!    one, so starting a scan and reading its results fail separately.
//! 4. All I/O errors are propagated.

pub mod error;
pub mod file;
pub mod memory;
pub mod results;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::{FileDocumentStore, JournalRecord, SyncMode};
pub use memory::InMemoryDocumentStore;
pub use results::{DeleteResult, DocumentCursor, InsertOneResult, UpdateResult};
pub use traits::DocumentStore;
