//! Foundation types for the blog service.
//!
//! Every other crate in the workspace depends on `blog-types`.
//!
//! # Key Types
//!
//! - [`BlogId`]: store-assigned 12-byte identifier with a 24-character hex wire form
//! - [`BlogPost`]: the persisted post (identifier, title, content)
//! - [`BlogDraft`]: title and content of a post not yet inserted

pub mod error;
pub mod id;
pub mod post;

pub use error::TypeError;
pub use id::{BlogId, BLOG_ID_HEX_LEN, BLOG_ID_LEN};
pub use post::{BlogDraft, BlogPost};
