use board_sql::{SQLExec, SQLStore};

use crate::service::PostError;

/// Initialize the SQLite schema for posts, comments and likes.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), PostError> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS posts (
            id TEXT PRIMARY KEY,
            member_id TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            like_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0
        )",
        "CREATE INDEX IF NOT EXISTS idx_posts_created ON posts(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_posts_member ON posts(member_id)",

        "CREATE TABLE IF NOT EXISTS comments (
            id TEXT PRIMARY KEY,
            member_id TEXT NOT NULL,
            post_id TEXT NOT NULL,
            content TEXT NOT NULL,
            like_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (post_id) REFERENCES posts(id)
        )",
        "CREATE INDEX IF NOT EXISTS idx_comments_post ON comments(post_id, created_at)",

        // One row per (target, member); the row's presence is the like.
        "CREATE TABLE IF NOT EXISTS post_likes (
            post_id TEXT NOT NULL,
            member_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (post_id, member_id),
            FOREIGN KEY (post_id) REFERENCES posts(id)
        )",
        "CREATE TABLE IF NOT EXISTS comment_likes (
            comment_id TEXT NOT NULL,
            member_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            PRIMARY KEY (comment_id, member_id),
            FOREIGN KEY (comment_id) REFERENCES comments(id)
        )",
    ];

    for stmt in &statements {
        sql.exec(stmt, &[])?;
    }

    Ok(())
}
