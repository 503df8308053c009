use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use board_core::ServiceError;

use crate::service::IdentityResolver;

/// Bearer credential middleware for protected routes.
///
/// Resolves the `Authorization` header and stores the resulting
/// [`Identity`](crate::model::Identity) as a request extension for handlers
/// to take via `Extension<Identity>`. Any resolution failure is a 401.
pub async fn require_identity(
    State(resolver): State<Arc<IdentityResolver>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let identity = resolver.resolve(authorization).map_err(|e| {
        debug!(path = %request.uri().path(), error = %e, "rejected credential");
        ServiceError::from(e)
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
