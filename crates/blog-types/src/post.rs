use serde::{Deserialize, Serialize};

use crate::id::BlogId;

/// A persisted blog post.
///
/// Serializes to the stored document shape `{"_id", "title", "content"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    #[serde(rename = "_id")]
    pub id: BlogId,
    pub title: String,
    pub content: String,
}

impl BlogPost {
    pub fn new(id: BlogId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Replace title and content together. The id never changes.
    pub fn replace(&mut self, title: impl Into<String>, content: impl Into<String>) {
        self.title = title.into();
        self.content = content.into();
    }
}

/// Fields of a post that does not have an identifier yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDraft {
    pub title: String,
    pub content: String,
}

impl BlogDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Attach a store-assigned identifier.
    pub fn into_post(self, id: BlogId) -> BlogPost {
        BlogPost {
            id,
            title: self.title,
            content: self.content,
        }
    }
}
