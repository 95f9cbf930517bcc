use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domains::{Comment, CommentRepo, StoreResult};

use super::db_err;

const COMMENT_COLUMNS: &str = "id, post_id, author_id, body, like_count, liked_by, created_at";

pub struct PgCommentRepo {
    pool: PgPool,
}

impl PgCommentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_comment(row: &PgRow) -> StoreResult<Comment> {
    Ok(Comment {
        id: row.try_get("id").map_err(db_err)?,
        post_id: row.try_get("post_id").map_err(db_err)?,
        author_id: row.try_get("author_id").map_err(db_err)?,
        text: row.try_get("body").map_err(db_err)?,
        like_count: row.try_get("like_count").map_err(db_err)?,
        liked_by: row.try_get("liked_by").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl CommentRepo for PgCommentRepo {
    async fn create(&self, comment: Comment) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO comments (id, post_id, author_id, body, like_count, liked_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(comment.author_id)
        .bind(comment.text)
        .bind(comment.like_count)
        .bind(comment.liked_by)
        .bind(comment.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let row = sqlx::query(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(map_comment).transpose()
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_post(
        &self,
        post_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Comment>> {
        let rows = sqlx::query(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE post_id = $1 \
             ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3"
        ))
        .bind(post_id)
        .bind(skip as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(map_comment).collect()
    }

    async fn like(&self, comment_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE comments SET like_count = like_count + 1, \
             liked_by = array_append(liked_by, $2) \
             WHERE id = $1 AND array_position(liked_by, $2) IS NULL",
        )
        .bind(comment_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn unlike(&self, comment_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE comments SET like_count = like_count - 1, \
             liked_by = array_remove(liked_by, $2) \
             WHERE id = $1 AND array_position(liked_by, $2) IS NOT NULL",
        )
        .bind(comment_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
