use serde::{Deserialize, Serialize};

/// Result of a like toggle: whether the caller now likes the target and
/// the target's count afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: i64,
}

/// What a like points at. Each target has its own like table and counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Post,
    Comment,
}

impl LikeTarget {
    /// Table holding the counted rows.
    pub(crate) fn table(&self) -> &'static str {
        match self {
            LikeTarget::Post => "posts",
            LikeTarget::Comment => "comments",
        }
    }

    /// Table holding one row per (target, member) like.
    pub(crate) fn like_table(&self) -> &'static str {
        match self {
            LikeTarget::Post => "post_likes",
            LikeTarget::Comment => "comment_likes",
        }
    }

    /// Foreign key column in the like table.
    pub(crate) fn key_column(&self) -> &'static str {
        match self {
            LikeTarget::Post => "post_id",
            LikeTarget::Comment => "comment_id",
        }
    }
}
