use axum::routing::{get, post, MethodRouter};
use axum::Router;
use blog_protocol::{endpoints, RpcMethod};
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::service::BlogService;

/// Build the axum router with every blog service endpoint.
pub fn build_router(service: BlogService) -> Router {
    let mut router = Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::INFO, get(handler::info_handler));

    for method in RpcMethod::ALL {
        router = router.route(&method.path(), rpc_route(method));
    }

    router
        .fallback(handler::bad_route)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

fn rpc_route(method: RpcMethod) -> MethodRouter<BlogService> {
    let route = match method {
        RpcMethod::CreateBlog => post(handler::create_blog),
        RpcMethod::GetBlog => post(handler::get_blog),
        RpcMethod::UpdateBlog => post(handler::update_blog),
        RpcMethod::DeleteBlog => post(handler::delete_blog),
        RpcMethod::ListBlog => post(handler::list_blog),
    };
    route.fallback(handler::bad_route)
}
