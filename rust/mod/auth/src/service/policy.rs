//! Ownership and role checks.
//!
//! Failing a check is `Forbidden`: the caller is known but not allowed.

use tracing::warn;

use crate::model::{Identity, MemberRole};
use crate::service::AuthError;

/// True iff the caller is the target subject.
pub fn authorize_self(identity: &Identity, target_subject_id: &str) -> bool {
    identity.sub == target_subject_id
}

/// True iff the caller holds exactly the required role.
pub fn authorize_role(identity: &Identity, required: MemberRole) -> bool {
    identity.role == required
}

/// `authorize_self` as a `Result`; `action` ends up in the error message.
pub fn require_self(
    identity: &Identity,
    target_subject_id: &str,
    action: &str,
) -> Result<(), AuthError> {
    if authorize_self(identity, target_subject_id) {
        return Ok(());
    }
    warn!(sub = %identity.sub, target = %target_subject_id, action, "ownership check failed");
    Err(AuthError::Forbidden(format!("only the owner may {}", action)))
}

pub fn require_role(identity: &Identity, required: MemberRole) -> Result<(), AuthError> {
    if authorize_role(identity, required) {
        return Ok(());
    }
    warn!(sub = %identity.sub, role = %identity.role, required = %required, "role check failed");
    Err(AuthError::Forbidden(format!("{} role required", required)))
}
