pub mod comment;
pub mod like;
pub mod post;
pub mod schema;

use std::sync::Arc;

use thiserror::Error;

use auth::service::AuthError;
use board_core::ServiceError;
use board_sql::{SQLError, SQLStore};

/// Post service error type.
#[derive(Debug, Error)]
pub enum PostError {
    /// Ownership failures and anything else raised by the auth layer.
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("storage: {0}")]
    Storage(String),
}

impl From<SQLError> for PostError {
    fn from(e: SQLError) -> Self {
        PostError::Storage(e.to_string())
    }
}

impl From<PostError> for ServiceError {
    fn from(e: PostError) -> Self {
        match e {
            PostError::Auth(inner) => ServiceError::from(inner),
            PostError::NotFound(m) => ServiceError::NotFound(m),
            PostError::Validation(m) => ServiceError::Validation(m),
            PostError::Storage(m) => ServiceError::Storage(m),
        }
    }
}

/// Posts, comments and likes over one SQL store.
///
/// Reads join `members` for display names, so the auth schema must be
/// initialized on the same store.
pub struct PostService {
    pub(crate) sql: Arc<dyn SQLStore>,
}

impl PostService {
    /// Create a new PostService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Arc<Self>, PostError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql }))
    }
}
