mod comments;
mod posts;

use std::sync::Arc;

use axum::Router;

use crate::service::PostService;

/// Shared application state.
pub type AppState = Arc<PostService>;

/// Read-only routes: post list, single post, comment list.
pub fn public_router(svc: Arc<PostService>) -> Router {
    Router::new()
        .merge(posts::public_routes())
        .merge(comments::public_routes())
        .with_state(svc)
}

/// Mutating routes. The caller wraps these in the bearer middleware.
pub fn protected_router(svc: Arc<PostService>) -> Router {
    Router::new()
        .merge(posts::protected_routes())
        .merge(comments::protected_routes())
        .with_state(svc)
}
