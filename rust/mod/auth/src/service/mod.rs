pub mod identity;
pub mod member;
pub mod password;
pub mod policy;
pub mod schema;
pub mod token;

use std::sync::Arc;

use thiserror::Error;

use board_core::ServiceError;
use board_sql::{SQLError, SQLStore};

pub use identity::IdentityResolver;
pub use token::{DEFAULT_TOKEN_TTL_SECS, TokenService};

/// Auth error type.
///
/// The first seven variants are the authentication/authorization outcomes;
/// everything but `Forbidden` means "not authenticated".
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredential,

    #[error("missing bearer credential")]
    MissingCredential,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token does not identify a member")]
    InvalidIdentity,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl AuthError {
    /// Whether this error means the caller is not authenticated (HTTP 401).
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredential
                | AuthError::MissingCredential
                | AuthError::Malformed(_)
                | AuthError::InvalidSignature
                | AuthError::Expired
                | AuthError::InvalidIdentity
        )
    }
}

impl From<SQLError> for AuthError {
    fn from(e: SQLError) -> Self {
        AuthError::Storage(e.to_string())
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Forbidden(m) => ServiceError::PermissionDenied(m),
            AuthError::NotFound(m) => ServiceError::NotFound(m),
            AuthError::Conflict(m) => ServiceError::Conflict(m),
            AuthError::Validation(m) => ServiceError::Validation(m),
            AuthError::Storage(m) => ServiceError::Storage(m),
            AuthError::Internal(m) => ServiceError::Internal(m),
            unauthenticated => ServiceError::Unauthorized(unauthenticated.to_string()),
        }
    }
}

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 6h).
    pub token_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "board-dev-secret-change-me".to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }
}

/// The member/auth service. Holds the store and the token signer.
pub struct AuthService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) tokens: TokenService,
}

impl AuthService {
    /// Create a new AuthService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>, config: AuthConfig) -> Result<Arc<Self>, AuthError> {
        if config.jwt_secret.is_empty() {
            return Err(AuthError::Validation("jwt secret must not be empty".into()));
        }
        if config.token_ttl_secs <= 0 {
            return Err(AuthError::Validation("token lifetime must be positive".into()));
        }
        schema::init_schema(sql.as_ref())?;
        let tokens = TokenService::new(&config.jwt_secret, config.token_ttl_secs);
        Ok(Arc::new(Self { sql, tokens }))
    }

    /// The token signer/validator this service issues with.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }
}
