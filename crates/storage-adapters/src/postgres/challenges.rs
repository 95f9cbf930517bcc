use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domains::{Challenge, ChallengePatch, ChallengeRepo, ChallengeStatus, StoreResult};

use super::{corrupt_row, db_err};

const CHALLENGE_COLUMNS: &str =
    "id, challenger_id, title, description, media, submission_count, status, ends_at, created_at";

pub struct PgChallengeRepo {
    pool: PgPool,
}

impl PgChallengeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_challenge(row: &PgRow) -> StoreResult<Challenge> {
    let status: String = row.try_get("status").map_err(db_err)?;
    let status = match status.as_str() {
        "open" => ChallengeStatus::Open,
        "closed" => ChallengeStatus::Closed,
        other => return Err(corrupt_row("status", other)),
    };
    Ok(Challenge {
        id: row.try_get("id").map_err(db_err)?,
        challenger_id: row.try_get("challenger_id").map_err(db_err)?,
        title: row.try_get("title").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        media: row.try_get("media").map_err(db_err)?,
        submission_count: row.try_get("submission_count").map_err(db_err)?,
        status,
        ends_at: row.try_get("ends_at").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl ChallengeRepo for PgChallengeRepo {
    async fn create(&self, challenge: Challenge) -> StoreResult<()> {
        let status = match challenge.status {
            ChallengeStatus::Open => "open",
            ChallengeStatus::Closed => "closed",
        };
        sqlx::query(
            "INSERT INTO challenges (id, challenger_id, title, description, media, \
             submission_count, status, ends_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(challenge.id)
        .bind(challenge.challenger_id)
        .bind(challenge.title)
        .bind(challenge.description)
        .bind(challenge.media)
        .bind(challenge.submission_count)
        .bind(status)
        .bind(challenge.ends_at)
        .bind(challenge.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Challenge>> {
        let row = sqlx::query(&format!(
            "SELECT {CHALLENGE_COLUMNS} FROM challenges WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(map_challenge).transpose()
    }

    async fn update(&self, id: Uuid, patch: ChallengePatch) -> StoreResult<Option<Challenge>> {
        let row = sqlx::query(&format!(
            "UPDATE challenges SET \
             title = COALESCE($2, title), \
             description = COALESCE($3, description), \
             ends_at = COALESCE($4, ends_at) \
             WHERE id = $1 \
             RETURNING {CHALLENGE_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.ends_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(map_challenge).transpose()
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM challenges WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_by_owner(&self, owner_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM challenges WHERE challenger_id = $1")
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected())
    }

    async fn list(&self, skip: u64, limit: u64) -> StoreResult<Vec<Challenge>> {
        let rows = sqlx::query(&format!(
            "SELECT {CHALLENGE_COLUMNS} FROM challenges \
             ORDER BY created_at DESC, id DESC OFFSET $1 LIMIT $2"
        ))
        .bind(skip as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(map_challenge).collect()
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Challenge>> {
        let rows = sqlx::query(&format!(
            "SELECT {CHALLENGE_COLUMNS} FROM challenges WHERE challenger_id = $1 \
             ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3"
        ))
        .bind(owner_id)
        .bind(skip as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(map_challenge).collect()
    }

    async fn close(&self, id: Uuid) -> StoreResult<()> {
        sqlx::query("UPDATE challenges SET status = 'closed' WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn bump_submission_count(&self, id: Uuid, delta: i64) -> StoreResult<()> {
        sqlx::query("UPDATE challenges SET submission_count = submission_count + $2 WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
