use axum::Router;

/// A service module that contributes HTTP routes.
///
/// Each business module (auth, post) implements this trait. The server
/// binary merges every module's routers under `/api/v1` and wraps the
/// protected half in the bearer-credential middleware, so a module never
/// has to decide per-path whether a request was authenticated.
pub trait Module: Send + Sync {
    /// Module name, used for logging.
    fn name(&self) -> &str;

    /// Routes reachable without a bearer credential.
    fn public_routes(&self) -> Router;

    /// Routes that expect a resolved identity in request extensions.
    fn protected_routes(&self) -> Router;
}
