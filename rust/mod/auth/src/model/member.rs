use std::fmt;

use serde::{Deserialize, Serialize};

/// Role carried by a member record and by every token issued for it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MemberRole {
    #[default]
    User,
    Admin,
}

impl MemberRole {
    /// Wire and storage form (`USER` / `ADMIN`).
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::User => "USER",
            MemberRole::Admin => "ADMIN",
        }
    }

    /// Parse the storage form. Exact match only.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "USER" => Some(MemberRole::User),
            "ADMIN" => Some(MemberRole::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored member row. Holds the password hash, so it never leaves the
/// service layer; responses go through [`MemberView`].
#[derive(Clone)]
pub struct Member {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    pub address: String,
    pub name: String,
    pub role: MemberRole,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    pub is_deleted: bool,
}

/// Public projection of a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    pub id: String,
    pub email: String,
    pub address: String,
    pub name: String,
    pub role: MemberRole,
    pub created_at: String,
}

impl From<&Member> for MemberView {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id.clone(),
            email: m.email.clone(),
            address: m.address.clone(),
            name: m.name.clone(),
            role: m.role,
            created_at: m.created_at.clone(),
        }
    }
}

/// Input for registering a new member.
///
/// Public joins always create a USER; a `role` field in the body is
/// ignored. Admins come from [`AuthService::ensure_admin`].
///
/// [`AuthService::ensure_admin`]: crate::service::AuthService::ensure_admin
#[derive(Debug, Clone, Deserialize)]
pub struct JoinRequest {
    pub email: String,
    pub password: String,
    pub address: String,
    pub name: String,
}

/// Input for updating a member's profile. Password and role are not
/// editable through this path.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMemberRequest {
    pub email: String,
    pub address: String,
    pub name: String,
}

/// Login form (`application/x-www-form-urlencoded`, OAuth2 password style).
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    /// The member's email.
    pub username: String,
    pub password: String,
}

/// Login response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_form() {
        assert_eq!(serde_json::to_string(&MemberRole::Admin).unwrap(), "\"ADMIN\"");
        let role: MemberRole = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, MemberRole::User);
        assert!(serde_json::from_str::<MemberRole>("\"admin\"").is_err());
    }

    #[test]
    fn role_parse_is_exact() {
        assert_eq!(MemberRole::parse("ADMIN"), Some(MemberRole::Admin));
        assert_eq!(MemberRole::parse("Admin"), None);
        assert_eq!(MemberRole::default(), MemberRole::User);
    }

    #[test]
    fn join_request_drops_supplied_role() {
        let req: JoinRequest = serde_json::from_str(
            r#"{"email":"a@b.io","password":"pw","address":"Seoul","name":"A","role":"ADMIN"}"#,
        )
        .unwrap();
        assert_eq!(req.email, "a@b.io");
    }
}
