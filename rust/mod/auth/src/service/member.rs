use tracing::{info, warn};

use board_core::{IdResponse, ListParams, ListResult, new_id, now_rfc3339};
use board_sql::{Row, SQLError, SQLExec, Value};

use crate::model::{
    Identity, JoinRequest, LoginResponse, Member, MemberRole, MemberView, UpdateMemberRequest,
};
use crate::service::policy::{require_role, require_self};
use crate::service::{AuthError, AuthService, password};

const MEMBER_COLUMNS: &str = "id, email, password_hash, address, name, role, created_at, is_deleted";

fn member_from_row(row: &Row) -> Result<Member, AuthError> {
    let role = row.text("role")?;
    Ok(Member {
        id: row.text("id")?,
        email: row.text("email")?,
        password_hash: row.text("password_hash")?,
        address: row.text("address")?,
        name: row.text("name")?,
        role: MemberRole::parse(&role)
            .ok_or_else(|| AuthError::Internal(format!("unknown role '{}'", role)))?,
        created_at: row.text("created_at")?,
        is_deleted: row.flag("is_deleted")?,
    })
}

/// Trim and lower-case an email, rejecting anything that is not
/// `local@domain.tld` shaped.
pub fn normalize_email(raw: &str) -> Result<String, AuthError> {
    let email = raw.trim().to_ascii_lowercase();
    let invalid = || AuthError::Validation(format!("invalid email address '{}'", raw.trim()));

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || domain.contains("..")
    {
        return Err(invalid());
    }
    Ok(email)
}

fn conflict_on_unique(email: &str) -> impl FnOnce(SQLError) -> AuthError + '_ {
    move |e| {
        if e.is_unique_violation() {
            AuthError::Conflict(format!("email '{}' is already registered", email))
        } else {
            AuthError::from(e)
        }
    }
}

impl AuthService {
    pub(crate) fn find_live_member(&self, id: &str) -> Result<Option<Member>, AuthError> {
        let sql = format!(
            "SELECT {} FROM members WHERE id = ?1 AND is_deleted = 0",
            MEMBER_COLUMNS
        );
        let rows = self.sql.query(&sql, &[Value::from(id)])?;
        rows.first().map(member_from_row).transpose()
    }

    pub(crate) fn find_live_member_by_email(&self, email: &str) -> Result<Option<Member>, AuthError> {
        let sql = format!(
            "SELECT {} FROM members WHERE email = ?1 AND is_deleted = 0",
            MEMBER_COLUMNS
        );
        let rows = self.sql.query(&sql, &[Value::from(email)])?;
        rows.first().map(member_from_row).transpose()
    }

    fn insert_member(&self, member: &Member) -> Result<(), AuthError> {
        self.sql
            .exec(
                "INSERT INTO members (id, email, password_hash, address, name, role, created_at, is_deleted)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0)",
                &[
                    Value::from(member.id.as_str()),
                    Value::from(member.email.as_str()),
                    Value::from(member.password_hash.as_str()),
                    Value::from(member.address.as_str()),
                    Value::from(member.name.as_str()),
                    Value::from(member.role.as_str()),
                    Value::from(member.created_at.as_str()),
                ],
            )
            .map_err(conflict_on_unique(&member.email))?;
        Ok(())
    }

    /// Register a new member.
    pub fn join(&self, input: JoinRequest) -> Result<IdResponse, AuthError> {
        let email = normalize_email(&input.email)?;
        if self.find_live_member_by_email(&email)?.is_some() {
            return Err(AuthError::Conflict(format!(
                "email '{}' is already registered",
                email
            )));
        }

        let member = Member {
            id: new_id(),
            email,
            password_hash: password::hash(&input.password)?,
            address: input.address,
            name: input.name,
            role: MemberRole::User,
            created_at: now_rfc3339(),
            is_deleted: false,
        };
        self.insert_member(&member)?;

        info!(member_id = %member.id, role = %member.role, "member joined");
        Ok(IdResponse::new(member.id))
    }

    /// Verify credentials and mint an access token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let member = match normalize_email(email) {
            Ok(email) => self.find_live_member_by_email(&email)?,
            Err(_) => None,
        };
        let Some(member) = member else {
            password::verify_dummy(password);
            warn!("login failed: unknown email");
            return Err(AuthError::InvalidCredential);
        };
        if !password::verify(password, &member.password_hash) {
            warn!(member_id = %member.id, "login failed: wrong password");
            return Err(AuthError::InvalidCredential);
        }

        let access_token = self.tokens.issue(&member.id, member.role)?;
        info!(member_id = %member.id, "login succeeded");
        Ok(LoginResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.tokens.ttl_secs(),
        })
    }

    /// Get a member's profile. Only the member themself may read it.
    pub fn get_member(&self, identity: &Identity, member_id: &str) -> Result<MemberView, AuthError> {
        require_self(identity, member_id, "view this member")?;
        let member = self
            .find_live_member(member_id)?
            .ok_or_else(|| AuthError::NotFound(format!("member {}", member_id)))?;
        Ok(MemberView::from(&member))
    }

    /// List live members. Admin only.
    pub fn list_members(
        &self,
        identity: &Identity,
        params: &ListParams,
    ) -> Result<ListResult<MemberView>, AuthError> {
        require_role(identity, MemberRole::Admin)?;
        let offset = params
            .sql_offset()
            .ok_or_else(|| AuthError::Validation("offset out of range".into()))?;

        let count = self
            .sql
            .query("SELECT COUNT(*) AS cnt FROM members WHERE is_deleted = 0", &[])?;
        let total = count.first().map(|r| r.int("cnt")).transpose()?.unwrap_or(0) as usize;

        let sql = format!(
            "SELECT {} FROM members WHERE is_deleted = 0
             ORDER BY created_at ASC, id ASC LIMIT ?1 OFFSET ?2",
            MEMBER_COLUMNS
        );
        let rows = self.sql.query(
            &sql,
            &[
                Value::Integer(params.effective_limit() as i64),
                Value::Integer(offset),
            ],
        )?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(MemberView::from(&member_from_row(row)?));
        }
        Ok(ListResult { items, total })
    }

    /// Update email, address and name. Password and role are kept.
    pub fn update_member(
        &self,
        identity: &Identity,
        member_id: &str,
        input: UpdateMemberRequest,
    ) -> Result<IdResponse, AuthError> {
        require_self(identity, member_id, "update this member")?;
        let current = self
            .find_live_member(member_id)?
            .ok_or_else(|| AuthError::NotFound(format!("member {}", member_id)))?;

        let email = normalize_email(&input.email)?;
        if email != current.email {
            if let Some(other) = self.find_live_member_by_email(&email)? {
                if other.id != current.id {
                    return Err(AuthError::Conflict(format!(
                        "email '{}' is already registered",
                        email
                    )));
                }
            }
        }

        self.sql
            .exec(
                "UPDATE members SET email = ?1, address = ?2, name = ?3
                 WHERE id = ?4 AND is_deleted = 0",
                &[
                    Value::from(email.as_str()),
                    Value::from(input.address),
                    Value::from(input.name),
                    Value::from(member_id),
                ],
            )
            .map_err(conflict_on_unique(&email))?;

        info!(member_id = %member_id, "member updated");
        Ok(IdResponse::new(member_id))
    }

    /// Logically delete a member. Their tokens stay valid until expiry.
    pub fn delete_member(&self, identity: &Identity, member_id: &str) -> Result<(), AuthError> {
        require_self(identity, member_id, "delete this member")?;
        let affected = self.sql.exec(
            "UPDATE members SET is_deleted = 1 WHERE id = ?1 AND is_deleted = 0",
            &[Value::from(member_id)],
        )?;
        if affected == 0 {
            return Err(AuthError::NotFound(format!("member {}", member_id)));
        }
        info!(member_id = %member_id, "member deleted");
        Ok(())
    }

    /// Make sure an admin account with this email exists.
    ///
    /// `password_hash` must already be an argon2id PHC string. An existing
    /// live member with the email is promoted to ADMIN; its password is
    /// left alone.
    pub fn ensure_admin(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<String, AuthError> {
        let email = normalize_email(email)?;
        if password_hash::PasswordHash::new(password_hash).is_err() {
            return Err(AuthError::Validation("admin password hash is not a PHC string".into()));
        }

        if let Some(existing) = self.find_live_member_by_email(&email)? {
            if existing.role != MemberRole::Admin {
                self.sql.exec(
                    "UPDATE members SET role = ?1 WHERE id = ?2",
                    &[Value::from(MemberRole::Admin.as_str()), Value::from(existing.id.as_str())],
                )?;
                info!(member_id = %existing.id, "promoted member to ADMIN");
            }
            return Ok(existing.id);
        }

        let member = Member {
            id: new_id(),
            email,
            password_hash: password_hash.to_string(),
            address: String::new(),
            name: name.to_string(),
            role: MemberRole::Admin,
            created_at: now_rfc3339(),
            is_deleted: false,
        };
        self.insert_member(&member)?;
        info!(member_id = %member.id, "created admin member");
        Ok(member.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::tests::test_service;

    fn join(svc: &AuthService, email: &str, password: &str, role: Option<MemberRole>) -> String {
        let id = svc
            .join(JoinRequest {
                email: email.into(),
                password: password.into(),
                address: "Seoul".into(),
                name: "Tester".into(),
            })
            .unwrap()
            .id;
        if role == Some(MemberRole::Admin) {
            let hash = password::hash(password).unwrap();
            svc.ensure_admin(email, "Tester", &hash).unwrap();
        }
        id
    }

    fn identity(svc: &AuthService, email: &str, password: &str) -> Identity {
        let login = svc.login(email, password).unwrap();
        let claims = svc.tokens().validate(&login.access_token).unwrap();
        Identity { sub: claims.sub, role: claims.role }
    }

    #[test]
    fn test_email_normalization() {
        assert_eq!(normalize_email("  A@Example.COM ").unwrap(), "a@example.com");
        for bad in ["", "plain", "@x.io", "a@", "a@io", "a@.io", "a@io.", "a b@x.io", "a@@x.io", "a@x..io"] {
            assert!(normalize_email(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_join_and_login() {
        let svc = test_service();
        let id = join(&svc, "alice@example.com", "password", None);
        assert_eq!(id.len(), 32);

        let login = svc.login("Alice@Example.com", "password").unwrap();
        assert_eq!(login.token_type, "bearer");
        assert_eq!(login.expires_in, 6 * 60 * 60);

        let claims = svc.tokens().validate(&login.access_token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, MemberRole::User);
    }

    #[test]
    fn test_password_is_stored_hashed() {
        let svc = test_service();
        let id = join(&svc, "h@example.com", "password", None);
        let member = svc.find_live_member(&id).unwrap().unwrap();
        assert_ne!(member.password_hash, "password");
        assert!(password::verify("password", &member.password_hash));
    }

    #[test]
    fn test_join_duplicate_email_conflicts() {
        let svc = test_service();
        join(&svc, "dup@example.com", "pw1", None);
        let err = svc
            .join(JoinRequest {
                email: "DUP@example.com".into(),
                password: "pw2".into(),
                address: "".into(),
                name: "".into(),
            })
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[test]
    fn test_join_rejects_bad_input() {
        let svc = test_service();
        let bad_email = svc.join(JoinRequest {
            email: "nope".into(),
            password: "pw".into(),
            address: "".into(),
            name: "".into(),
        });
        assert!(matches!(bad_email, Err(AuthError::Validation(_))));

        let empty_password = svc.join(JoinRequest {
            email: "ok@example.com".into(),
            password: "".into(),
            address: "".into(),
            name: "".into(),
        });
        assert!(matches!(empty_password, Err(AuthError::Validation(_))));
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let svc = test_service();
        join(&svc, "bob@example.com", "right", None);

        let wrong = svc.login("bob@example.com", "wrong").unwrap_err();
        let unknown = svc.login("nobody@example.com", "right").unwrap_err();
        let malformed = svc.login("not-an-email", "right").unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredential));
        assert!(matches!(unknown, AuthError::InvalidCredential));
        assert!(matches!(malformed, AuthError::InvalidCredential));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[test]
    fn test_every_failed_login_runs_one_verify() {
        let svc = test_service();
        join(&svc, "carol@example.com", "right", None);

        for email in ["carol@example.com", "nobody@example.com", "not-an-email"] {
            password::VERIFY_CALLS.with(|calls| calls.set(0));
            assert!(matches!(
                svc.login(email, "wrong"),
                Err(AuthError::InvalidCredential)
            ));
            assert_eq!(password::VERIFY_CALLS.with(|calls| calls.get()), 1, "{email}");
        }
    }

    #[test]
    fn test_join_ignores_requested_role() {
        let svc = test_service();
        let input: JoinRequest = serde_json::from_str(
            r#"{"email":"sneaky@example.com","password":"pw","address":"","name":"S","role":"ADMIN"}"#,
        )
        .unwrap();
        let id = svc.join(input).unwrap().id;

        let ident = identity(&svc, "sneaky@example.com", "pw");
        assert_eq!(ident.role, MemberRole::User);
        assert_eq!(svc.get_member(&ident, &id).unwrap().role, MemberRole::User);
        assert!(matches!(
            svc.list_members(&ident, &ListParams::default()),
            Err(AuthError::Forbidden(_))
        ));
    }

    #[test]
    fn test_list_members_rejects_offset_past_i64() {
        let svc = test_service();
        join(&svc, "admin@example.com", "pw", Some(MemberRole::Admin));
        let admin = identity(&svc, "admin@example.com", "pw");
        let huge = ListParams { offset: usize::MAX, limit: 10 };
        assert!(matches!(
            svc.list_members(&admin, &huge),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn test_get_member_self_only() {
        let svc = test_service();
        let a = join(&svc, "a@example.com", "pw", None);
        let b = join(&svc, "b@example.com", "pw", None);
        let ident_a = identity(&svc, "a@example.com", "pw");

        let view = svc.get_member(&ident_a, &a).unwrap();
        assert_eq!(view.email, "a@example.com");
        assert_eq!(view.role, MemberRole::User);

        assert!(matches!(svc.get_member(&ident_a, &b), Err(AuthError::Forbidden(_))));
    }

    #[test]
    fn test_view_never_carries_hash() {
        let svc = test_service();
        let a = join(&svc, "v@example.com", "pw", None);
        let ident = identity(&svc, "v@example.com", "pw");
        let json = serde_json::to_value(svc.get_member(&ident, &a).unwrap()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_list_members_admin_only() {
        let svc = test_service();
        join(&svc, "admin@example.com", "pw", Some(MemberRole::Admin));
        join(&svc, "u1@example.com", "pw", None);
        join(&svc, "u2@example.com", "pw", None);

        let user = identity(&svc, "u1@example.com", "pw");
        assert!(matches!(
            svc.list_members(&user, &ListParams::default()),
            Err(AuthError::Forbidden(_))
        ));

        let admin = identity(&svc, "admin@example.com", "pw");
        let all = svc.list_members(&admin, &ListParams::default()).unwrap();
        assert_eq!(all.total, 3);
        assert_eq!(all.items.len(), 3);

        let page = svc
            .list_members(&admin, &ListParams { offset: 1, limit: 1 })
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_update_member_preserves_password_and_role() {
        let svc = test_service();
        let id = join(&svc, "old@example.com", "pw", Some(MemberRole::Admin));
        let ident = identity(&svc, "old@example.com", "pw");

        svc.update_member(
            &ident,
            &id,
            UpdateMemberRequest {
                email: "new@example.com".into(),
                address: "Busan".into(),
                name: "Renamed".into(),
            },
        )
        .unwrap();

        let view = svc.get_member(&ident, &id).unwrap();
        assert_eq!(view.email, "new@example.com");
        assert_eq!(view.address, "Busan");
        assert_eq!(view.role, MemberRole::Admin);

        assert!(svc.login("new@example.com", "pw").is_ok());
        assert!(matches!(
            svc.login("old@example.com", "pw"),
            Err(AuthError::InvalidCredential)
        ));
    }

    #[test]
    fn test_update_member_email_collision() {
        let svc = test_service();
        let a = join(&svc, "a@example.com", "pw", None);
        join(&svc, "b@example.com", "pw", None);
        let ident = identity(&svc, "a@example.com", "pw");

        let err = svc
            .update_member(
                &ident,
                &a,
                UpdateMemberRequest {
                    email: "b@example.com".into(),
                    address: "".into(),
                    name: "".into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));

        // Keeping one's own email is not a collision.
        svc.update_member(
            &ident,
            &a,
            UpdateMemberRequest {
                email: "a@example.com".into(),
                address: "x".into(),
                name: "y".into(),
            },
        )
        .unwrap();
    }

    #[test]
    fn test_update_other_member_forbidden() {
        let svc = test_service();
        join(&svc, "a@example.com", "pw", None);
        let b = join(&svc, "b@example.com", "pw", None);
        let ident = identity(&svc, "a@example.com", "pw");
        let err = svc
            .update_member(
                &ident,
                &b,
                UpdateMemberRequest {
                    email: "b@example.com".into(),
                    address: "".into(),
                    name: "hijack".into(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));
    }

    #[test]
    fn test_delete_member_is_logical() {
        let svc = test_service();
        let id = join(&svc, "gone@example.com", "pw", None);
        let ident = identity(&svc, "gone@example.com", "pw");

        svc.delete_member(&ident, &id).unwrap();

        assert!(matches!(svc.get_member(&ident, &id), Err(AuthError::NotFound(_))));
        assert!(matches!(
            svc.login("gone@example.com", "pw"),
            Err(AuthError::InvalidCredential)
        ));
        assert!(matches!(svc.delete_member(&ident, &id), Err(AuthError::NotFound(_))));

        let rows = svc
            .sql
            .query("SELECT is_deleted FROM members WHERE id = ?1", &[Value::from(id.as_str())])
            .unwrap();
        assert_eq!(rows[0].int("is_deleted").unwrap(), 1);

        // The address is free again.
        join(&svc, "gone@example.com", "pw2", None);
    }

    #[test]
    fn test_ensure_admin() {
        let svc = test_service();
        let hash = password::hash("root-pw").unwrap();
        let id = svc.ensure_admin("root@example.com", "Root", &hash).unwrap();
        let again = svc.ensure_admin("root@example.com", "Root", &hash).unwrap();
        assert_eq!(id, again);

        let ident = identity(&svc, "root@example.com", "root-pw");
        assert_eq!(ident.role, MemberRole::Admin);

        let user = join(&svc, "promote@example.com", "pw", None);
        let promoted = svc.ensure_admin("promote@example.com", "P", &hash).unwrap();
        assert_eq!(user, promoted);
        assert_eq!(identity(&svc, "promote@example.com", "pw").role, MemberRole::Admin);

        assert!(matches!(
            svc.ensure_admin("x@example.com", "X", "plaintext"),
            Err(AuthError::Validation(_))
        ));
    }
}
