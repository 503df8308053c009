//! Post module: posts, comments and like toggles.
//!
//! Reads are public. Every mutation runs under a resolved
//! [`Identity`](auth::model::Identity) and edits/deletes are limited to the
//! author.

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use board_core::{Module, ServiceError};
use board_sql::SQLStore;

use crate::service::PostService;

/// Post module implementing the Module trait.
pub struct PostModule {
    service: Arc<PostService>,
}

impl PostModule {
    /// Create a new PostModule. The auth schema must already exist on `sql`.
    pub fn new(sql: Arc<dyn SQLStore>) -> Result<Self, ServiceError> {
        let service = PostService::new(sql)?;
        Ok(Self { service })
    }
}

impl Module for PostModule {
    fn name(&self) -> &str {
        "post"
    }

    fn public_routes(&self) -> Router {
        api::public_router(self.service.clone())
    }

    fn protected_routes(&self) -> Router {
        api::protected_router(self.service.clone())
    }
}
