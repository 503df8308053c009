//! Bootstrap: first-start checks and admin seeding.
//!
//! When boardd starts:
//! 1. Verify the config is usable; refuse to start otherwise.
//! 2. If an `[admin]` section is present, make sure that member exists
//!    with the ADMIN role.

use tracing::info;

use auth::service::AuthService;

use crate::config::ServerConfig;

/// Verify server configuration is ready to serve.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt.secret.is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.jwt.expire_secs <= 0 {
        anyhow::bail!("JWT expire_secs must be positive.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if let Some(admin) = &config.admin {
        if admin.password_hash.is_empty() {
            anyhow::bail!(
                "Admin password hash is empty.\n\
                 Run `boardd --hash-password <password>` and put the output in [admin]."
            );
        }
    }
    Ok(())
}

/// Seed the configured admin account, if any.
pub fn ensure_admin(config: &ServerConfig, auth: &AuthService) -> anyhow::Result<()> {
    let Some(admin) = &config.admin else {
        return Ok(());
    };
    let id = auth
        .ensure_admin(&admin.email, &admin.name, &admin.password_hash)
        .map_err(|e| anyhow::anyhow!("failed to seed admin account: {}", e))?;
    info!(member_id = %id, "admin account ready");
    Ok(())
}
