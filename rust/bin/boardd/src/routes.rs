//! Route registration: collects all module routes + system endpoints.

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use tracing::info;

use auth::api::middleware::require_identity;
use auth::service::IdentityResolver;
use board_core::Module;

/// Prefix every route is nested under.
pub const API_PREFIX: &str = "/api/v1";

/// Build the complete router.
///
/// Each module's public routes are mounted as-is; its protected routes go
/// behind the bearer middleware. Both land under [`API_PREFIX`], so one
/// path may carry a public GET and protected PUT/DELETE.
pub fn build_router(modules: &[&dyn Module], resolver: Arc<IdentityResolver>) -> Router {
    let mut public = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));
    let mut protected = Router::new();

    for module in modules {
        public = public.merge(module.public_routes());
        protected = protected.merge(module.protected_routes());
        info!("mounted module {}", module.name());
    }

    let protected =
        protected.route_layer(middleware::from_fn_with_state(resolver, require_identity));

    Router::new().nest(API_PREFIX, public.merge(protected))
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "message": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "boardd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
