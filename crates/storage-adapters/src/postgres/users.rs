use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domains::{StoreResult, UserPreview, UserProfile, UserRepo};

use super::db_err;

pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_profile(row: &PgRow) -> StoreResult<UserProfile> {
    Ok(UserProfile {
        id: row.try_get("id").map_err(db_err)?,
        username: row.try_get("username").map_err(db_err)?,
        avatar: row.try_get("avatar").map_err(db_err)?,
        post_count: row.try_get("post_count").map_err(db_err)?,
        follower_count: row.try_get("follower_count").map_err(db_err)?,
        following_count: row.try_get("following_count").map_err(db_err)?,
    })
}

impl PgUserRepo {
    async fn bump(&self, column: &str, id: Uuid, delta: i64) -> StoreResult<()> {
        // column names come from the three fixed callers below, never from input
        let sql = format!("UPDATE users SET {column} = {column} + $2 WHERE id = $1");
        sqlx::query(&sql)
            .bind(id)
            .bind(delta)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<UserProfile>> {
        let row = sqlx::query(
            "SELECT id, username, avatar, post_count, follower_count, following_count \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(map_profile).transpose()
    }

    async fn get_previews(&self, ids: &[Uuid]) -> StoreResult<Vec<UserPreview>> {
        let rows = sqlx::query("SELECT id, username, avatar FROM users WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter()
            .map(|row| {
                Ok(UserPreview {
                    id: row.try_get("id").map_err(db_err)?,
                    username: row.try_get("username").map_err(db_err)?,
                    avatar: row.try_get("avatar").map_err(db_err)?,
                })
            })
            .collect()
    }

    async fn create(&self, user: UserProfile) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (id, username, avatar, post_count, follower_count, following_count) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(user.username)
        .bind(user.avatar)
        .bind(user.post_count)
        .bind(user.follower_count)
        .bind(user.following_count)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn bump_post_count(&self, id: Uuid, delta: i64) -> StoreResult<()> {
        self.bump("post_count", id, delta).await
    }

    async fn bump_follower_count(&self, id: Uuid, delta: i64) -> StoreResult<()> {
        self.bump("follower_count", id, delta).await
    }

    async fn bump_following_count(&self, id: Uuid, delta: i64) -> StoreResult<()> {
        self.bump("following_count", id, delta).await
    }
}
