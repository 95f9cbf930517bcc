use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domains::{MediaKind, Post, PostPatch, PostRepo, StoreResult, Visibility};

use super::{corrupt_row, db_err};

const POST_COLUMNS: &str = "id, author_id, media, media_kind, caption, tags, visibility, \
     like_count, liked_by, comment_count, commented_by, is_deleted, \
     is_challenge_submission, created_at";

pub struct PgPostRepo {
    pool: PgPool,
}

impl PgPostRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps SQL TEXT and array fields back to the domain model.
fn map_post(row: &PgRow) -> StoreResult<Post> {
    let media_kind: String = row.try_get("media_kind").map_err(db_err)?;
    let visibility: String = row.try_get("visibility").map_err(db_err)?;
    Ok(Post {
        id: row.try_get("id").map_err(db_err)?,
        author_id: row.try_get("author_id").map_err(db_err)?,
        media: row.try_get("media").map_err(db_err)?,
        media_kind: media_kind
            .parse::<MediaKind>()
            .map_err(|_| corrupt_row("media_kind", &media_kind))?,
        caption: row.try_get("caption").map_err(db_err)?,
        tags: row.try_get("tags").map_err(db_err)?,
        visibility: visibility
            .parse::<Visibility>()
            .map_err(|_| corrupt_row("visibility", &visibility))?,
        like_count: row.try_get("like_count").map_err(db_err)?,
        liked_by: row.try_get("liked_by").map_err(db_err)?,
        comment_count: row.try_get("comment_count").map_err(db_err)?,
        commented_by: row.try_get("commented_by").map_err(db_err)?,
        is_deleted: row.try_get("is_deleted").map_err(db_err)?,
        is_challenge_submission: row.try_get("is_challenge_submission").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl PostRepo for PgPostRepo {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Post>> {
        let row = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1 AND NOT is_deleted"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(map_post).transpose()
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = ANY($1) AND NOT is_deleted"
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(map_post).collect()
    }

    async fn create(&self, post: Post) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO posts (id, author_id, media, media_kind, caption, tags, visibility, \
             like_count, liked_by, comment_count, commented_by, is_deleted, \
             is_challenge_submission, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(post.media)
        .bind(post.media_kind.as_str())
        .bind(post.caption)
        .bind(post.tags)
        .bind(post.visibility.as_str())
        .bind(post.like_count)
        .bind(post.liked_by)
        .bind(post.comment_count)
        .bind(post.commented_by)
        .bind(post.is_deleted)
        .bind(post.is_challenge_submission)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> StoreResult<Option<Post>> {
        let row = sqlx::query(&format!(
            "UPDATE posts SET \
             caption = COALESCE($2, caption), \
             tags = COALESCE($3, tags), \
             visibility = COALESCE($4, visibility) \
             WHERE id = $1 AND NOT is_deleted \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.caption)
        .bind(patch.tags)
        .bind(patch.visibility.map(Visibility::as_str))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(map_post).transpose()
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn public_feed(&self, skip: u64, limit: u64) -> StoreResult<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE NOT is_deleted AND visibility = 'public' \
             ORDER BY created_at DESC, id DESC OFFSET $1 LIMIT $2"
        ))
        .bind(skip as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(map_post).collect()
    }

    async fn by_author(&self, author_id: Uuid, skip: u64, limit: u64) -> StoreResult<Vec<Post>> {
        let rows = sqlx::query(&format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE author_id = $1 AND NOT is_deleted \
             ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3"
        ))
        .bind(author_id)
        .bind(skip as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(map_post).collect()
    }

    async fn like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        // Conditional single statement: the set and the counter move
        // together, and a duplicate like affects zero rows.
        let result = sqlx::query(
            "UPDATE posts SET like_count = like_count + 1, \
             liked_by = array_append(liked_by, $2) \
             WHERE id = $1 AND NOT is_deleted AND array_position(liked_by, $2) IS NULL",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn unlike(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE posts SET like_count = like_count - 1, \
             liked_by = array_remove(liked_by, $2) \
             WHERE id = $1 AND NOT is_deleted AND array_position(liked_by, $2) IS NOT NULL",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_commenter(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        sqlx::query(
            "UPDATE posts SET comment_count = comment_count + 1, \
             commented_by = CASE WHEN array_position(commented_by, $2) IS NULL \
                                 THEN array_append(commented_by, $2) \
                                 ELSE commented_by END \
             WHERE id = $1",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn remove_commenter(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        sqlx::query(
            "UPDATE posts SET comment_count = comment_count - 1, \
             commented_by = array_remove(commented_by, $2) \
             WHERE id = $1",
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn mark_challenge_submission(&self, post_id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE posts SET is_challenge_submission = TRUE WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
