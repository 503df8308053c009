use serde::{Deserialize, Serialize};

/// A stored comment row.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub member_id: String,
    pub post_id: String,
    pub content: String,
    pub like_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentInput {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub publisher_name: String,
    pub content: String,
    pub like_count: i64,
    pub created_at: String,
    pub updated_at: String,
}
