use serde::{Deserialize, Serialize};

/// Maximum title length, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// A stored post row.
#[derive(Debug, Clone)]
pub struct Post {
    /// ULID, time-sortable.
    pub id: String,
    /// Author (member id).
    pub member_id: String,
    pub title: String,
    pub content: String,
    pub like_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Body for creating or replacing a post.
#[derive(Debug, Clone, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub content: String,
}

/// Full post, as returned by `GET /post/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub publisher_name: String,
    pub title: String,
    pub content: String,
    pub like_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// List entry, as returned by `GET /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub publisher_name: String,
    pub title: String,
    pub like_count: i64,
    pub created_at: String,
}
