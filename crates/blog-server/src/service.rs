use std::sync::Arc;

use blog_protocol::{
    Blog, CreateBlogRequest, CreateBlogResponse, DeleteBlogRequest, DeleteBlogResponse,
    GetBlogRequest, GetBlogResponse, ListBlogRequest, ListBlogResponse, UpdateBlogRequest,
    UpdateBlogResponse,
};
use blog_store::DocumentStore;
use blog_types::{BlogDraft, BlogPost};
use tracing::{debug, warn};

use crate::classify::{self, ServiceResult};
use crate::config::ServiceConfig;

/// Request handler for the five blog RPCs.
///
/// Holds no per-request state: every call is one round trip to the injected
/// store, so a single `BlogService` is cloned into every request task.
#[derive(Clone)]
pub struct BlogService {
    store: Arc<dyn DocumentStore>,
    config: ServiceConfig,
}

impl BlogService {
    pub fn new(store: Arc<dyn DocumentStore>, config: ServiceConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn create_blog(&self, req: CreateBlogRequest) -> ServiceResult<CreateBlogResponse> {
        let draft = BlogDraft::new(req.title, req.content);
        let id = classify::inserted(self.store.insert_one(draft.clone()).await)?;
        debug!(%id, "blog created");
        Ok(draft.into_post(id).into_wire())
    }

    pub async fn get_blog(&self, req: GetBlogRequest) -> ServiceResult<GetBlogResponse> {
        let id = classify::decode_id(&req.id)?;
        let post = classify::found(self.store.find_one(&id).await, &req.id)?;
        Ok(Blog::new(req.id, post.title, post.content))
    }

    pub async fn update_blog(&self, req: UpdateBlogRequest) -> ServiceResult<UpdateBlogResponse> {
        let id = classify::decode_id(&req.id)?;
        let fields = BlogDraft::new(req.title, req.content);
        classify::updated(
            self.store.update_one(&id, fields.clone()).await,
            &req.id,
            &fields,
        )?;
        debug!(%id, "blog updated");
        Ok(fields.into_post(id).into_wire())
    }

    pub async fn delete_blog(&self, req: DeleteBlogRequest) -> ServiceResult<DeleteBlogResponse> {
        let id = classify::decode_id(&req.id)?;
        classify::deleted(self.store.delete_one(&id).await, &req.id)?;
        debug!(%id, "blog deleted");
        Ok(DeleteBlogResponse { id: req.id })
    }

    /// Results are in store order, which callers must treat as unordered.
    ///
    /// A document that fails to materialize ends the listing: the failure is
    /// logged and the documents read before it are returned.
    pub async fn list_blog(&self, req: ListBlogRequest) -> ServiceResult<ListBlogResponse> {
        let limit = self.config.resolve_list_limit(req.limit);
        let cursor = classify::scan_started(self.store.find_many(limit).await)?;

        let mut blogs = Vec::with_capacity(cursor.remaining().min(limit));
        for item in cursor {
            match item {
                Ok(post) => blogs.push(post.into_wire()),
                Err(e) => {
                    warn!(error = %e, returned = blogs.len(), "list results truncated");
                    break;
                }
            }
        }
        debug!(limit, count = blogs.len(), "blogs listed");
        Ok(ListBlogResponse { blogs })
    }
}

impl std::fmt::Debug for BlogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlogService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

trait IntoWire {
    fn into_wire(self) -> Blog;
}

impl IntoWire for BlogPost {
    fn into_wire(self) -> Blog {
        Blog::new(self.id.to_hex(), self.title, self.content)
    }
}
