use tracing::info;

use auth::model::Identity;
use auth::service::policy::require_self;
use board_core::{IdResponse, ListParams, new_sortable_id, now_rfc3339};
use board_sql::{Row, SQLExec, Value};

use crate::model::{Comment, CommentInput, CommentView, LikeState, LikeTarget};
use crate::service::{PostError, PostService};

const COMMENT_COLUMNS: &str = "id, member_id, post_id, content, like_count, created_at, updated_at";

fn comment_from_row(row: &Row) -> Result<Comment, PostError> {
    Ok(Comment {
        id: row.text("id")?,
        member_id: row.text("member_id")?,
        post_id: row.text("post_id")?,
        content: row.text("content")?,
        like_count: row.int("like_count")?,
        created_at: row.text("created_at")?,
        updated_at: row.text("updated_at")?,
    })
}

fn validate(input: &CommentInput) -> Result<(), PostError> {
    if input.content.trim().is_empty() {
        return Err(PostError::Validation("content must not be empty".into()));
    }
    Ok(())
}

/// A comment addressed through the wrong post is a bad request, not a miss.
fn ensure_on_post(comment: &Comment, post_id: &str) -> Result<(), PostError> {
    if comment.post_id != post_id {
        return Err(PostError::Validation(format!(
            "comment {} does not belong to post {}",
            comment.id, post_id
        )));
    }
    Ok(())
}

impl PostService {
    pub(crate) fn find_live_comment(&self, id: &str) -> Result<Option<Comment>, PostError> {
        let sql = format!(
            "SELECT {} FROM comments WHERE id = ?1 AND is_deleted = 0",
            COMMENT_COLUMNS
        );
        let rows = self.sql.query(&sql, &[Value::from(id)])?;
        rows.first().map(comment_from_row).transpose()
    }

    fn require_comment(&self, id: &str) -> Result<Comment, PostError> {
        self.find_live_comment(id)?
            .ok_or_else(|| PostError::NotFound(format!("comment {}", id)))
    }

    /// Load a comment for mutation: exists, caller owns it, and it sits
    /// under `post_id`, checked in that order.
    fn owned_comment(
        &self,
        identity: &Identity,
        post_id: &str,
        comment_id: &str,
        action: &str,
    ) -> Result<Comment, PostError> {
        let comment = self.require_comment(comment_id)?;
        require_self(identity, &comment.member_id, action)?;
        ensure_on_post(&comment, post_id)?;
        Ok(comment)
    }

    /// Comment on a live post.
    pub fn create_comment(
        &self,
        identity: &Identity,
        post_id: &str,
        input: CommentInput,
    ) -> Result<IdResponse, PostError> {
        self.require_post(post_id)?;
        validate(&input)?;

        let id = new_sortable_id();
        let now = now_rfc3339();
        self.sql.exec(
            "INSERT INTO comments (id, member_id, post_id, content, like_count, created_at, updated_at, is_deleted)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5, 0)",
            &[
                Value::from(id.as_str()),
                Value::from(identity.sub.as_str()),
                Value::from(post_id),
                Value::from(input.content),
                Value::from(now),
            ],
        )?;
        info!(comment_id = %id, post_id = %post_id, member_id = %identity.sub, "comment created");
        Ok(IdResponse::new(id))
    }

    /// Comments on a post, oldest first.
    pub fn list_comments(
        &self,
        post_id: &str,
        params: &ListParams,
    ) -> Result<Vec<CommentView>, PostError> {
        self.require_post(post_id)?;
        let offset = params
            .sql_offset()
            .ok_or_else(|| PostError::Validation("offset out of range".into()))?;

        let rows = self.sql.query(
            "SELECT c.id, c.content, c.like_count, c.created_at, c.updated_at,
                    COALESCE(m.name, '') AS publisher_name
             FROM comments c LEFT JOIN members m ON m.id = c.member_id
             WHERE c.post_id = ?1 AND c.is_deleted = 0
             ORDER BY c.created_at ASC, c.id ASC LIMIT ?2 OFFSET ?3",
            &[
                Value::from(post_id),
                Value::Integer(params.effective_limit() as i64),
                Value::Integer(offset),
            ],
        )?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(CommentView {
                id: row.text("id")?,
                publisher_name: row.text("publisher_name")?,
                content: row.text("content")?,
                like_count: row.int("like_count")?,
                created_at: row.text("created_at")?,
                updated_at: row.text("updated_at")?,
            });
        }
        Ok(items)
    }

    pub fn update_comment(
        &self,
        identity: &Identity,
        post_id: &str,
        comment_id: &str,
        input: CommentInput,
    ) -> Result<IdResponse, PostError> {
        self.owned_comment(identity, post_id, comment_id, "edit this comment")?;
        validate(&input)?;

        self.sql.exec(
            "UPDATE comments SET content = ?1, updated_at = ?2 WHERE id = ?3",
            &[
                Value::from(input.content),
                Value::from(now_rfc3339()),
                Value::from(comment_id),
            ],
        )?;
        info!(comment_id = %comment_id, "comment updated");
        Ok(IdResponse::new(comment_id))
    }

    pub fn delete_comment(
        &self,
        identity: &Identity,
        post_id: &str,
        comment_id: &str,
    ) -> Result<(), PostError> {
        self.owned_comment(identity, post_id, comment_id, "delete this comment")?;

        self.sql.exec(
            "UPDATE comments SET is_deleted = 1, updated_at = ?1 WHERE id = ?2",
            &[Value::from(now_rfc3339()), Value::from(comment_id)],
        )?;
        info!(comment_id = %comment_id, "comment deleted");
        Ok(())
    }

    /// Like toggle on a comment. Any authenticated member may like.
    pub fn toggle_comment_like(
        &self,
        identity: &Identity,
        post_id: &str,
        comment_id: &str,
    ) -> Result<LikeState, PostError> {
        let comment = self.require_comment(comment_id)?;
        ensure_on_post(&comment, post_id)?;
        self.require_post(post_id)?;
        self.toggle_like(LikeTarget::Comment, comment_id, &identity.sub)
    }
}
