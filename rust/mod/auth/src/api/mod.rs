mod members;
pub mod middleware;
mod session;

use std::sync::Arc;

use axum::Router;

use crate::service::AuthService;

/// Shared application state.
pub type AppState = Arc<AuthService>;

/// Routes that need no credential: join and login.
pub fn public_router(svc: Arc<AuthService>) -> Router {
    Router::new().merge(session::routes()).with_state(svc)
}

/// Member routes. The caller wraps these in [`middleware::require_identity`].
pub fn protected_router(svc: Arc<AuthService>) -> Router {
    Router::new().merge(members::routes()).with_state(svc)
}
