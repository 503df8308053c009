use tracing::info;

use auth::model::Identity;
use auth::service::policy::require_self;
use board_core::{IdResponse, ListParams, new_sortable_id, now_rfc3339};
use board_sql::{Row, SQLExec, Value};

use crate::model::{LikeState, LikeTarget, MAX_TITLE_LEN, Post, PostInput, PostSummary, PostView};
use crate::service::{PostError, PostService};

const POST_COLUMNS: &str = "id, member_id, title, content, like_count, created_at, updated_at";

/// Posts joined with the author's display name. Posts by members that no
/// longer exist still show, with an empty name.
const POST_VIEW_SELECT: &str = "SELECT p.id, p.title, p.content, p.like_count, p.created_at,
        p.updated_at, COALESCE(m.name, '') AS publisher_name
    FROM posts p LEFT JOIN members m ON m.id = p.member_id";

fn post_from_row(row: &Row) -> Result<Post, PostError> {
    Ok(Post {
        id: row.text("id")?,
        member_id: row.text("member_id")?,
        title: row.text("title")?,
        content: row.text("content")?,
        like_count: row.int("like_count")?,
        created_at: row.text("created_at")?,
        updated_at: row.text("updated_at")?,
    })
}

fn validate(input: &PostInput) -> Result<(), PostError> {
    let title_len = input.title.trim().chars().count();
    if title_len == 0 {
        return Err(PostError::Validation("title must not be empty".into()));
    }
    if input.title.chars().count() > MAX_TITLE_LEN {
        return Err(PostError::Validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    if input.content.trim().is_empty() {
        return Err(PostError::Validation("content must not be empty".into()));
    }
    Ok(())
}

impl PostService {
    pub(crate) fn find_live_post(&self, id: &str) -> Result<Option<Post>, PostError> {
        let sql = format!(
            "SELECT {} FROM posts WHERE id = ?1 AND is_deleted = 0",
            POST_COLUMNS
        );
        let rows = self.sql.query(&sql, &[Value::from(id)])?;
        rows.first().map(post_from_row).transpose()
    }

    pub(crate) fn require_post(&self, id: &str) -> Result<Post, PostError> {
        self.find_live_post(id)?
            .ok_or_else(|| PostError::NotFound(format!("post {}", id)))
    }

    /// Create a post authored by the caller.
    pub fn create_post(&self, identity: &Identity, input: PostInput) -> Result<IdResponse, PostError> {
        validate(&input)?;
        let id = new_sortable_id();
        let now = now_rfc3339();
        self.sql.exec(
            "INSERT INTO posts (id, member_id, title, content, like_count, created_at, updated_at, is_deleted)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5, 0)",
            &[
                Value::from(id.as_str()),
                Value::from(identity.sub.as_str()),
                Value::from(input.title),
                Value::from(input.content),
                Value::from(now),
            ],
        )?;
        info!(post_id = %id, member_id = %identity.sub, "post created");
        Ok(IdResponse::new(id))
    }

    /// Get a single post.
    pub fn get_post(&self, id: &str) -> Result<PostView, PostError> {
        let sql = format!("{} WHERE p.id = ?1 AND p.is_deleted = 0", POST_VIEW_SELECT);
        let rows = self.sql.query(&sql, &[Value::from(id)])?;
        let row = rows
            .first()
            .ok_or_else(|| PostError::NotFound(format!("post {}", id)))?;
        Ok(PostView {
            id: row.text("id")?,
            publisher_name: row.text("publisher_name")?,
            title: row.text("title")?,
            content: row.text("content")?,
            like_count: row.int("like_count")?,
            created_at: row.text("created_at")?,
            updated_at: row.text("updated_at")?,
        })
    }

    /// List posts, newest first.
    pub fn list_posts(&self, params: &ListParams) -> Result<Vec<PostSummary>, PostError> {
        let offset = params
            .sql_offset()
            .ok_or_else(|| PostError::Validation("offset out of range".into()))?;
        let sql = format!(
            "{} WHERE p.is_deleted = 0 ORDER BY p.created_at DESC, p.id DESC LIMIT ?1 OFFSET ?2",
            POST_VIEW_SELECT
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
            items.push(PostSummary {
                id: row.text("id")?,
                publisher_name: row.text("publisher_name")?,
                title: row.text("title")?,
                like_count: row.int("like_count")?,
                created_at: row.text("created_at")?,
            });
        }
        Ok(items)
    }

    /// Replace title and content. Author only.
    pub fn update_post(
        &self,
        identity: &Identity,
        id: &str,
        input: PostInput,
    ) -> Result<IdResponse, PostError> {
        let post = self.require_post(id)?;
        require_self(identity, &post.member_id, "edit this post")?;
        validate(&input)?;

        self.sql.exec(
            "UPDATE posts SET title = ?1, content = ?2, updated_at = ?3 WHERE id = ?4",
            &[
                Value::from(input.title),
                Value::from(input.content),
                Value::from(now_rfc3339()),
                Value::from(id),
            ],
        )?;
        info!(post_id = %id, "post updated");
        Ok(IdResponse::new(id))
    }

    /// Logically delete a post. Author only.
    pub fn delete_post(&self, identity: &Identity, id: &str) -> Result<(), PostError> {
        let post = self.require_post(id)?;
        require_self(identity, &post.member_id, "delete this post")?;

        self.sql.exec(
            "UPDATE posts SET is_deleted = 1, updated_at = ?1 WHERE id = ?2",
            &[Value::from(now_rfc3339()), Value::from(id)],
        )?;
        info!(post_id = %id, "post deleted");
        Ok(())
    }

    /// Like the post if the caller has not yet, otherwise take the like back.
    pub fn toggle_post_like(&self, identity: &Identity, id: &str) -> Result<LikeState, PostError> {
        self.require_post(id)?;
        self.toggle_like(LikeTarget::Post, id, &identity.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::tests::Fixture;
    use auth::service::AuthError;

    fn input(title: &str, content: &str) -> PostInput {
        PostInput { title: title.into(), content: content.into() }
    }

    #[test]
    fn test_create_and_get() {
        let fx = Fixture::new();
        let alice = fx.member("Alice");

        let id = fx.posts.create_post(&alice, input("Hello", "first post")).unwrap().id;
        assert_eq!(id.len(), 26);

        let view = fx.posts.get_post(&id).unwrap();
        assert_eq!(view.publisher_name, "Alice");
        assert_eq!(view.title, "Hello");
        assert_eq!(view.content, "first post");
        assert_eq!(view.like_count, 0);
        assert_eq!(view.created_at, view.updated_at);

        let stored = fx.posts.require_post(&id).unwrap();
        assert_eq!(stored.member_id, alice.sub);
    }

    #[test]
    fn test_get_missing_post() {
        let fx = Fixture::new();
        assert!(matches!(fx.posts.get_post("nope"), Err(PostError::NotFound(_))));
    }

    #[test]
    fn test_title_and_content_rules() {
        let fx = Fixture::new();
        let alice = fx.member("Alice");

        assert!(matches!(
            fx.posts.create_post(&alice, input("", "body")),
            Err(PostError::Validation(_))
        ));
        assert!(matches!(
            fx.posts.create_post(&alice, input("title", "  ")),
            Err(PostError::Validation(_))
        ));
        let long = "가".repeat(MAX_TITLE_LEN + 1);
        assert!(matches!(
            fx.posts.create_post(&alice, input(&long, "body")),
            Err(PostError::Validation(_))
        ));
        let max = "가".repeat(MAX_TITLE_LEN);
        assert!(fx.posts.create_post(&alice, input(&max, "body")).is_ok());
    }

    #[test]
    fn test_list_newest_first_with_paging() {
        let fx = Fixture::new();
        let alice = fx.member("Alice");
        let mut ids = Vec::new();
        for i in 0..3 {
            ids.push(fx.posts.create_post(&alice, input(&format!("p{}", i), "x")).unwrap().id);
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let all = fx.posts.list_posts(&ListParams::default()).unwrap();
        let listed: Vec<&str> = all.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(listed, vec![ids[2].as_str(), ids[1].as_str(), ids[0].as_str()]);
        assert!(all.iter().all(|p| p.publisher_name == "Alice"));

        let page = fx.posts.list_posts(&ListParams { offset: 1, limit: 1 }).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, ids[1]);
    }

    #[test]
    fn test_list_rejects_offset_past_i64() {
        let fx = Fixture::new();
        let alice = fx.member("Alice");
        let id = fx.posts.create_post(&alice, input("t", "x")).unwrap().id;

        let huge = ListParams { offset: usize::MAX, limit: 10 };
        assert!(matches!(fx.posts.list_posts(&huge), Err(PostError::Validation(_))));
        assert!(matches!(fx.posts.list_comments(&id, &huge), Err(PostError::Validation(_))));
    }

    #[test]
    fn test_update_owner_only() {
        let fx = Fixture::new();
        let alice = fx.member("Alice");
        let bob = fx.member("Bob");
        let id = fx.posts.create_post(&alice, input("t", "c")).unwrap().id;

        let err = fx.posts.update_post(&bob, &id, input("hacked", "c")).unwrap_err();
        assert!(matches!(err, PostError::Auth(AuthError::Forbidden(_))));

        fx.posts.update_post(&alice, &id, input("t2", "c2")).unwrap();
        let view = fx.posts.get_post(&id).unwrap();
        assert_eq!(view.title, "t2");
        assert_eq!(view.content, "c2");
    }

    #[test]
    fn test_missing_post_is_not_found_before_forbidden() {
        let fx = Fixture::new();
        let bob = fx.member("Bob");
        assert!(matches!(
            fx.posts.update_post(&bob, "missing", input("t", "c")),
            Err(PostError::NotFound(_))
        ));
        assert!(matches!(
            fx.posts.delete_post(&bob, "missing"),
            Err(PostError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_is_logical() {
        let fx = Fixture::new();
        let alice = fx.member("Alice");
        let bob = fx.member("Bob");
        let id = fx.posts.create_post(&alice, input("t", "c")).unwrap().id;

        assert!(matches!(
            fx.posts.delete_post(&bob, &id),
            Err(PostError::Auth(AuthError::Forbidden(_)))
        ));
        fx.posts.delete_post(&alice, &id).unwrap();

        assert!(matches!(fx.posts.get_post(&id), Err(PostError::NotFound(_))));
        assert!(fx.posts.list_posts(&ListParams::default()).unwrap().is_empty());

        let rows = fx
            .posts
            .sql
            .query("SELECT is_deleted FROM posts WHERE id = ?1", &[Value::from(id.as_str())])
            .unwrap();
        assert_eq!(rows[0].int("is_deleted").unwrap(), 1);
    }

    #[test]
    fn test_toggle_post_like_restores_count() {
        let fx = Fixture::new();
        let alice = fx.member("Alice");
        let bob = fx.member("Bob");
        let id = fx.posts.create_post(&alice, input("t", "c")).unwrap().id;

        let state = fx.posts.toggle_post_like(&bob, &id).unwrap();
        assert_eq!(state, LikeState { liked: true, like_count: 1 });

        let state = fx.posts.toggle_post_like(&alice, &id).unwrap();
        assert_eq!(state, LikeState { liked: true, like_count: 2 });

        let state = fx.posts.toggle_post_like(&bob, &id).unwrap();
        assert_eq!(state, LikeState { liked: false, like_count: 1 });
        assert_eq!(fx.posts.get_post(&id).unwrap().like_count, 1);

        assert!(matches!(
            fx.posts.toggle_post_like(&bob, "missing"),
            Err(PostError::NotFound(_))
        ));
    }
}
