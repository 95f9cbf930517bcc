use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domains::{Follow, FollowRepo, StoreResult};

use super::db_err;

const FOLLOW_COLUMNS: &str = "id, follower_id, following_id, active, created_at";

pub struct PgFollowRepo {
    pool: PgPool,
}

impl PgFollowRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_follow(row: &PgRow) -> StoreResult<Follow> {
    Ok(Follow {
        id: row.try_get("id").map_err(db_err)?,
        follower_id: row.try_get("follower_id").map_err(db_err)?,
        following_id: row.try_get("following_id").map_err(db_err)?,
        active: row.try_get("active").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl FollowRepo for PgFollowRepo {
    /// The UNIQUE (follower_id, following_id) constraint surfaces as a
    /// `StoreError::Conflict` through `db_err`.
    async fn create(&self, follow: Follow) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO follows (id, follower_id, following_id, active, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(follow.id)
        .bind(follow.follower_id)
        .bind(follow.following_id)
        .bind(follow.active)
        .bind(follow.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn delete_pair(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
                .bind(follower_id)
                .bind(following_id)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool> {
        let row = sqlx::query(
            "SELECT 1 AS one FROM follows WHERE follower_id = $1 AND following_id = $2",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(row.is_some())
    }

    async fn followers_of(
        &self,
        user_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Follow>> {
        let rows = sqlx::query(&format!(
            "SELECT {FOLLOW_COLUMNS} FROM follows WHERE following_id = $1 AND active \
             ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3"
        ))
        .bind(user_id)
        .bind(skip as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(map_follow).collect()
    }

    async fn following_of(
        &self,
        user_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Follow>> {
        let rows = sqlx::query(&format!(
            "SELECT {FOLLOW_COLUMNS} FROM follows WHERE follower_id = $1 AND active \
             ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3"
        ))
        .bind(user_id)
        .bind(skip as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(map_follow).collect()
    }
}
