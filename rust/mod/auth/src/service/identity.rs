use chrono::{DateTime, Utc};

use crate::model::Identity;
use crate::service::{AuthError, TokenService};

/// Turns an inbound `Authorization` header value into a verified [`Identity`].
#[derive(Clone)]
pub struct IdentityResolver {
    tokens: TokenService,
}

impl IdentityResolver {
    pub fn new(tokens: TokenService) -> Self {
        Self { tokens }
    }

    /// Resolve against the current clock.
    pub fn resolve(&self, authorization: Option<&str>) -> Result<Identity, AuthError> {
        self.resolve_at(authorization, Utc::now())
    }

    pub fn resolve_at(
        &self,
        authorization: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Identity, AuthError> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(AuthError::MissingCredential)?;
        let claims = self.tokens.validate_at(token, now)?;
        if claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidIdentity);
        }
        Ok(Identity {
            sub: claims.sub,
            role: claims.role,
        })
    }
}

/// Extract the token from a `Bearer <token>` header value.
/// The scheme is case-insensitive.
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}
