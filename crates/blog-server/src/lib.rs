//! HTTP server for the blog service.
//!
//! Serves the five blog RPCs over HTTP. Each request is decoded by the
//! router, handled by [`BlogService`] against an injected
//! [`DocumentStore`](blog_store::DocumentStore), and every store outcome is
//! classified (see [`classify`]) into a response or one of two error kinds.

pub mod classify;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod service;

pub use classify::{ErrorKind, ServiceError, ServiceResult};
pub use config::{ServerConfig, ServiceConfig, StoreBackend, StoreConfig, DEFAULT_LIST_LIMIT};
pub use error::{ServerError, ServerResult};
pub use server::{open_store, BlogServer};
pub use service::BlogService;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use blog_store::InMemoryDocumentStore;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app() -> Router {
        let store = Arc::new(InMemoryDocumentStore::new());
        router::build_router(BlogService::new(store, ServiceConfig::default()))
    }

    async fn call(app: &Router, method: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/twirp/blog.BlogService/{method}"))
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_endpoint() {
        let response = app()
            .oneshot(Request::builder().uri("/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn info_endpoint() {
        let response = app()
            .oneshot(Request::builder().uri("/v1/info").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let info: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(info["documents"], 0);
        assert_eq!(info["methods"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn create_and_delete() {
        let app = app();
        let (status, created) =
            call(&app, "CreateBlog", json!({"title": "Test title", "content": "Test content"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["title"], "Test title");
        assert_eq!(created["content"], "Test content");
        let id = created["id"].as_str().unwrap().to_string();

        let (status, deleted) = call(&app, "DeleteBlog", json!({"id": id})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted, json!({"id": id}));
    }

    #[tokio::test]
    async fn scenario_over_http() {
        let app = app();
        let (_, created) = call(&app, "CreateBlog", json!({"title": "A", "content": "B"})).await;
        let x = created["id"].as_str().unwrap().to_string();

        let (status, got) = call(&app, "GetBlog", json!({"id": x})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(got, json!({"id": x, "title": "A", "content": "B"}));

        let (status, _) = call(&app, "UpdateBlog", json!({"id": x, "title": "C", "content": "D"})).await;
        assert_eq!(status, StatusCode::OK);
        let (_, got) = call(&app, "GetBlog", json!({"id": x})).await;
        assert_eq!(got, json!({"id": x, "title": "C", "content": "D"}));

        let (status, deleted) = call(&app, "DeleteBlog", json!({"id": x})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["id"], x.as_str());

        let (status, err) = call(&app, "GetBlog", json!({"id": x})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["code"], "not_found");
        assert_eq!(err["msg"], format!("No documents were found for id: {x}"));
    }

    #[tokio::test]
    async fn invalid_id_is_invalid_argument() {
        let app = app();
        for method in ["GetBlog", "UpdateBlog", "DeleteBlog"] {
            let (status, err) = call(&app, method, json!({"id": "nope"})).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
            assert_eq!(err, json!({"code": "invalid_argument", "msg": "Invalid blog ID"}));
        }
    }

    #[tokio::test]
    async fn update_of_missing_post_is_invalid_argument() {
        let app = app();
        let id = blog_types::BlogId::generate().to_hex();
        let (status, err) = call(&app, "UpdateBlog", json!({"id": id, "title": "t", "content": "c"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["code"], "invalid_argument");
    }

    #[tokio::test]
    async fn list_with_limits() {
        let app = app();
        for i in 0..30 {
            call(&app, "CreateBlog", json!({"title": format!("t{i}"), "content": "c"})).await;
        }

        let (status, listed) = call(&app, "ListBlog", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed["blogs"].as_array().unwrap().len(), 25);

        let (_, listed) = call(&app, "ListBlog", json!({"limit": 4})).await;
        assert_eq!(listed["blogs"].as_array().unwrap().len(), 4);

        let (_, listed) = call(&app, "ListBlog", json!({"limit": "28"})).await;
        assert_eq!(listed["blogs"].as_array().unwrap().len(), 28);

        let (_, listed) = call(&app, "ListBlog", json!({"limit": 0})).await;
        assert_eq!(listed["blogs"].as_array().unwrap().len(), 25);
    }

    #[tokio::test]
    async fn list_on_empty_collection() {
        let (status, listed) = call(&app(), "ListBlog", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!({"blogs": []}));
    }

    #[tokio::test]
    async fn malformed_body() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/twirp/blog.BlogService/CreateBlog")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let err: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(err["code"], "malformed");
    }

    #[tokio::test]
    async fn unknown_method_is_bad_route() {
        let (status, err) = call(&app(), "PatchBlog", json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["code"], "bad_route");
    }

    #[tokio::test]
    async fn get_on_rpc_path_is_bad_route() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/twirp/blog.BlogService/ListBlog")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let err: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(err["code"], "bad_route");
        assert_eq!(err["msg"], "no handler for GET /twirp/blog.BlogService/ListBlog");
    }
}
