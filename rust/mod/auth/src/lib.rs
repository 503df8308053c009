//! Auth module: members, credential hashing, bearer tokens and access policy.
//!
//! # Components
//!
//! - **Credential hasher** ([`service::password`]): argon2id hash/verify
//! - **Token service** ([`service::TokenService`]): HS256 issue/validate
//! - **Identity resolver** ([`service::IdentityResolver`]): `Authorization` header to [`model::Identity`]
//! - **Access policy** ([`service::policy`]): self-ownership and role checks
//! - **Member service**: join, login, get, list, update, delete
//!
//! # Usage
//!
//! ```ignore
//! use auth::{AuthModule, service::AuthConfig};
//!
//! let module = AuthModule::new(sql, AuthConfig::default())?;
//! let resolver = module.resolver(); // for the bearer middleware
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use board_core::{Module, ServiceError};
use board_sql::SQLStore;

use crate::service::{AuthConfig, AuthService, IdentityResolver};

/// Auth module implementing the Module trait.
pub struct AuthModule {
    service: Arc<AuthService>,
    resolver: Arc<IdentityResolver>,
}

impl AuthModule {
    /// Create a new AuthModule.
    pub fn new(sql: Arc<dyn SQLStore>, config: AuthConfig) -> Result<Self, ServiceError> {
        let service = AuthService::new(sql, config)?;
        let resolver = Arc::new(IdentityResolver::new(service.tokens().clone()));
        Ok(Self { service, resolver })
    }

    /// Get a reference to the underlying AuthService.
    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }

    /// Resolver sharing this module's signing key.
    pub fn resolver(&self) -> Arc<IdentityResolver> {
        self.resolver.clone()
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn public_routes(&self) -> Router {
        api::public_router(self.service.clone())
    }

    fn protected_routes(&self) -> Router {
        api::protected_router(self.service.clone())
    }
}
