//! Token issuance and validation (compact JWS, HS256).

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::model::{Claims, MemberRole};
use crate::service::AuthError;

/// Default access token lifetime: 6 hours.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 6 * 60 * 60;

/// Issues and validates signed, time-bounded identity tokens.
///
/// The key is fixed at construction. Validation is a pure function of the
/// token, the key and the supplied instant.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's instant in `validate_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        }
    }

    /// Token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token valid from now.
    pub fn issue(&self, subject: &str, role: MemberRole) -> Result<String, AuthError> {
        self.issue_at(subject, role, Utc::now())
    }

    /// Issue a token with `iat = now` and `exp = now + ttl`.
    pub fn issue_at(
        &self,
        subject: &str,
        role: MemberRole,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            role,
            iat,
            exp: iat + self.ttl_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("jwt encode: {}", e)))
    }

    /// Validate a token against the current clock.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate signature and structure, then expiry at `now`.
    ///
    /// A token is still valid at exactly `exp` and expired one second later.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(map_jwt_error)?;
        let claims = data.claims;
        if now.timestamp() > claims.exp {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }
}

fn map_jwt_error(e: jsonwebtoken::errors::Error) -> AuthError {
    match e.kind() {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::MissingAlgorithm => AuthError::InvalidSignature,
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::Malformed(e.to_string()),
    }
}
