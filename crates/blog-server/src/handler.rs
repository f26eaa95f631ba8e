use axum::body::Bytes;
use axum::extract::{FromRequest, Request, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use blog_protocol::{
    endpoints, CreateBlogRequest, CreateBlogResponse, DeleteBlogRequest, DeleteBlogResponse,
    GetBlogRequest, GetBlogResponse, HealthResponse, JsonCodec, ListBlogRequest,
    ListBlogResponse, ProtocolError, RpcError, RpcMethod, UpdateBlogRequest, UpdateBlogResponse,
};

use crate::classify::ServiceError;
use crate::service::BlogService;

/// An RPC failure rendered as `{"code", "msg"}` with the code's HTTP status.
#[derive(Debug)]
pub struct ErrorResponse(pub RpcError);

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.0)).into_response()
    }
}

impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        Self(err.into())
    }
}

impl From<ProtocolError> for ErrorResponse {
    fn from(err: ProtocolError) -> Self {
        Self(err.into())
    }
}

/// JSON request body decoded with [`JsonCodec`].
///
/// Unlike `axum::Json` this does not insist on a content type, and every
/// rejection is reported through the error envelope.
pub struct RpcRequest<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for RpcRequest<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ErrorResponse(RpcError::malformed(e.body_text())))?;
        Ok(Self(JsonCodec::decode(&body)?))
    }
}

/// A successful RPC reply, encoded with [`JsonCodec`].
///
/// A reply that fails to encode is answered with an `internal` error.
pub struct RpcResponse<T>(pub T);

impl<T: Serialize> IntoResponse for RpcResponse<T> {
    fn into_response(self) -> Response {
        match JsonCodec::encode(&self.0) {
            Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to encode rpc response");
                ErrorResponse::from(e).into_response()
            }
        }
    }
}

type RpcResult<T> = Result<RpcResponse<T>, ErrorResponse>;

pub async fn create_blog(
    State(service): State<BlogService>,
    RpcRequest(req): RpcRequest<CreateBlogRequest>,
) -> RpcResult<CreateBlogResponse> {
    Ok(RpcResponse(service.create_blog(req).await?))
}

pub async fn get_blog(
    State(service): State<BlogService>,
    RpcRequest(req): RpcRequest<GetBlogRequest>,
) -> RpcResult<GetBlogResponse> {
    Ok(RpcResponse(service.get_blog(req).await?))
}

pub async fn update_blog(
    State(service): State<BlogService>,
    RpcRequest(req): RpcRequest<UpdateBlogRequest>,
) -> RpcResult<UpdateBlogResponse> {
    Ok(RpcResponse(service.update_blog(req).await?))
}

pub async fn delete_blog(
    State(service): State<BlogService>,
    RpcRequest(req): RpcRequest<DeleteBlogRequest>,
) -> RpcResult<DeleteBlogResponse> {
    Ok(RpcResponse(service.delete_blog(req).await?))
}

pub async fn list_blog(
    State(service): State<BlogService>,
    RpcRequest(req): RpcRequest<ListBlogRequest>,
) -> RpcResult<ListBlogResponse> {
    Ok(RpcResponse(service.list_blog(req).await?))
}

/// Unknown paths and non-POST calls to RPC paths.
pub async fn bad_route(method: Method, uri: Uri) -> ErrorResponse {
    ErrorResponse(RpcError::bad_route(method.as_str(), uri.path()))
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler(State(service): State<BlogService>) -> Json<serde_json::Value> {
    let documents = service.store().count().await.ok();
    Json(json!({
        "name": "blog-server",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol_version": blog_protocol::PROTOCOL_VERSION,
        "service": endpoints::SERVICE_NAME,
        "methods": RpcMethod::ALL.iter().map(|m| m.path()).collect::<Vec<_>>(),
        "default_list_limit": service.config().default_list_limit,
        "documents": documents,
    }))
}
