//! Server configuration, read from a TOML file.
//!
//! ```toml
//! [storage]
//! data_dir = "/var/lib/board"
//!
//! [jwt]
//! secret = "..."
//! expire_secs = 21600
//!
//! [admin]            # optional
//! email = "admin@example.com"
//! name = "Admin"
//! password_hash = "$argon2id$..."
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory searched for bare context names.
const CONFIG_DIR: &str = "/etc/board";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    /// Admin account created or promoted at startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `board.sqlite`.
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing secret.
    pub secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_expire_secs")]
    pub expire_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    #[serde(default = "default_admin_name")]
    pub name: String,
    /// Argon2id PHC string; produce one with `boardd --hash-password`.
    pub password_hash: String,
}

fn default_expire_secs() -> i64 {
    auth::service::DEFAULT_TOKEN_TTL_SECS
}

fn default_admin_name() -> String {
    "Admin".to_string()
}

impl ServerConfig {
    /// Resolve `-c` to a file path: a value containing `/` or `.` is a
    /// path, anything else is a context name under `/etc/board`.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(ServerConfig::resolve_path("prod"), PathBuf::from("/etc/board/prod.toml"));
        assert_eq!(ServerConfig::resolve_path("./board.toml"), PathBuf::from("./board.toml"));
        assert_eq!(ServerConfig::resolve_path("/tmp/x"), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn test_parse_defaults() {
        let config = ServerConfig::parse(
            r#"
            [storage]
            data_dir = "/var/lib/board"

            [jwt]
            secret = "s3cret"
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.data_dir, "/var/lib/board");
        assert_eq!(config.jwt.expire_secs, 21600);
        assert!(config.admin.is_none());
    }

    #[test]
    fn test_parse_admin() {
        let config = ServerConfig::parse(
            r#"
            [storage]
            data_dir = "/d"

            [jwt]
            secret = "s"
            expire_secs = 60

            [admin]
            email = "root@example.com"
            password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"
            "#,
        )
        .unwrap();
        let admin = config.admin.unwrap();
        assert_eq!(admin.email, "root@example.com");
        assert_eq!(admin.name, "Admin");
        assert_eq!(config.jwt.expire_secs, 60);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.toml");
        std::fs::write(&path, "[storage]\ndata_dir = \"/d\"\n[jwt]\nsecret = \"s\"\n").unwrap();
        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.jwt.secret, "s");

        assert!(ServerConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
