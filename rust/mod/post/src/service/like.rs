use tracing::debug;

use board_core::now_rfc3339;
use board_sql::Value;

use crate::model::{LikeState, LikeTarget};
use crate::service::{PostError, PostService};

impl PostService {
    /// Flip `member_id`'s like on a post or comment.
    ///
    /// Runs as one transaction: the like row is removed if present and
    /// inserted otherwise, then the target's `like_count` is recomputed
    /// from the like table, so the counter always equals the row count.
    pub(crate) fn toggle_like(
        &self,
        target: LikeTarget,
        target_id: &str,
        member_id: &str,
    ) -> Result<LikeState, PostError> {
        let like_table = target.like_table();
        let key = target.key_column();
        let table = target.table();

        let delete_sql = format!("DELETE FROM {} WHERE {} = ?1 AND member_id = ?2", like_table, key);
        let insert_sql = format!(
            "INSERT INTO {} ({}, member_id, created_at) VALUES (?1, ?2, ?3)",
            like_table, key
        );
        let recount_sql = format!(
            "UPDATE {} SET like_count = (SELECT COUNT(*) FROM {} WHERE {} = ?1) WHERE id = ?1",
            table, like_table, key
        );
        let read_sql = format!("SELECT like_count FROM {} WHERE id = ?1", table);

        let now = now_rfc3339();
        let mut state = LikeState { liked: false, like_count: 0 };
        self.sql.atomic(&mut |tx| {
            let removed = tx.exec(&delete_sql, &[Value::from(target_id), Value::from(member_id)])?;
            let liked = removed == 0;
            if liked {
                tx.exec(
                    &insert_sql,
                    &[Value::from(target_id), Value::from(member_id), Value::from(now.as_str())],
                )?;
            }
            tx.exec(&recount_sql, &[Value::from(target_id)])?;

            let rows = tx.query(&read_sql, &[Value::from(target_id)])?;
            let like_count = rows.first().map(|r| r.int("like_count")).transpose()?.unwrap_or(0);
            state = LikeState { liked, like_count };
            Ok(())
        })?;

        debug!(target = ?target, target_id, member_id, liked = state.liked, "like toggled");
        Ok(state)
    }
}
