use serde::{Deserialize, Deserializer, Serialize};

pub const PROTOCOL_VERSION: u32 = 1;

/// Largest request body the service will decode.
pub const MAX_MESSAGE_SIZE: usize = 4 * 1024 * 1024;

/// A blog post as it appears on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub content: String,
}

impl Blog {
    pub fn new(id: impl Into<String>, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
        }
    }
}

pub type CreateBlogResponse = Blog;
pub type GetBlogResponse = Blog;
pub type UpdateBlogResponse = Blog;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetBlogRequest {
    pub id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateBlogRequest {
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteBlogRequest {
    pub id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteBlogResponse {
    pub id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListBlogRequest {
    /// Maximum number of posts to return. Absent, zero or negative means
    /// "use the server default".
    #[serde(
        deserialize_with = "deserialize_int64",
        skip_serializing_if = "Option::is_none"
    )]
    pub limit: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListBlogResponse {
    pub blogs: Vec<Blog>,
}

/// int64 fields may arrive as JSON numbers or as decimal strings.
fn deserialize_int64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Number(i64),
        Text(String),
    }

    match Option::<Int64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Int64::Number(n)) => Ok(Some(n)),
        Some(Int64::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid int64 {s:?}: {e}"))),
    }
}

/// The five RPC methods of the blog service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    CreateBlog,
    GetBlog,
    UpdateBlog,
    DeleteBlog,
    ListBlog,
}

impl RpcMethod {
    pub const ALL: [RpcMethod; 5] = [
        Self::CreateBlog,
        Self::GetBlog,
        Self::UpdateBlog,
        Self::DeleteBlog,
        Self::ListBlog,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateBlog => "CreateBlog",
            Self::GetBlog => "GetBlog",
            Self::UpdateBlog => "UpdateBlog",
            Self::DeleteBlog => "DeleteBlog",
            Self::ListBlog => "ListBlog",
        }
    }

    /// Full route, e.g. `/twirp/blog.BlogService/CreateBlog`.
    pub fn path(&self) -> String {
        format!("{}/{}", crate::endpoint::endpoints::SERVICE_PREFIX, self.name())
    }
}

impl std::fmt::Display for RpcMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
