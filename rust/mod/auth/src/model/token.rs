use serde::{Deserialize, Serialize};

use crate::model::MemberRole;

/// Signed token payload.
///
/// `exp` is always `iat` plus the configured lifetime; `jti` is a fresh
/// UUIDv4 per issuance so two tokens minted in the same second differ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: member id.
    pub sub: String,
    pub role: MemberRole,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
    pub jti: String,
}

/// The verified caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub sub: String,
    pub role: MemberRole,
}
