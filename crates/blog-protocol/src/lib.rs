//! Wire protocol for the blog service.
//!
//! Every RPC is a `POST` to `/twirp/blog.BlogService/<Method>` with a JSON
//! body. Successful calls answer `200` with the response message; failures
//! answer with the status of their [`ErrorCode`] and an [`RpcError`]
//! envelope.

pub mod codec;
pub mod endpoint;
pub mod error;
pub mod message;

pub use codec::JsonCodec;
pub use endpoint::{endpoints, HealthResponse};
pub use error::{ErrorCode, ProtocolError, ProtocolResult, RpcError};
pub use message::{
    Blog, CreateBlogRequest, CreateBlogResponse, DeleteBlogRequest, DeleteBlogResponse,
    GetBlogRequest, GetBlogResponse, ListBlogRequest, ListBlogResponse, RpcMethod,
    UpdateBlogRequest, UpdateBlogResponse, MAX_MESSAGE_SIZE, PROTOCOL_VERSION,
};
