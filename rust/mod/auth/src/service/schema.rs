use board_sql::{SQLExec, SQLStore};

use crate::service::AuthError;

/// Initialize the SQLite schema for members.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), AuthError> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS members (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            address TEXT NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'USER',
            created_at TEXT NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0
        )",
        // Email is unique among live members only; a deleted member's
        // address can be registered again.
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_members_email_live
            ON members(email) WHERE is_deleted = 0",
        "CREATE INDEX IF NOT EXISTS idx_members_created ON members(created_at)",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])?;
    }

    Ok(())
}
