use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use domains::{StoreResult, Submission, SubmissionRepo};

use super::db_err;

const SUBMISSION_COLUMNS: &str = "id, challenge_id, submitter_id, post_id, created_at";

pub struct PgSubmissionRepo {
    pool: PgPool,
}

impl PgSubmissionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_submission(row: &PgRow) -> StoreResult<Submission> {
    Ok(Submission {
        id: row.try_get("id").map_err(db_err)?,
        challenge_id: row.try_get("challenge_id").map_err(db_err)?,
        submitter_id: row.try_get("submitter_id").map_err(db_err)?,
        post_id: row.try_get("post_id").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl SubmissionRepo for PgSubmissionRepo {
    /// The UNIQUE (challenge_id, submitter_id) constraint surfaces as a
    /// `StoreError::Conflict` through `db_err`.
    async fn create(&self, submission: Submission) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO submissions (id, challenge_id, submitter_id, post_id, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(submission.id)
        .bind(submission.challenge_id)
        .bind(submission.submitter_id)
        .bind(submission.post_id)
        .bind(submission.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Submission>> {
        let row = sqlx::query(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(map_submission).transpose()
    }

    async fn get_by_challenge_and_submitter(
        &self,
        challenge_id: Uuid,
        submitter_id: Uuid,
    ) -> StoreResult<Option<Submission>> {
        let row = sqlx::query(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions \
             WHERE challenge_id = $1 AND submitter_id = $2"
        ))
        .bind(challenge_id)
        .bind(submitter_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;
        row.as_ref().map(map_submission).transpose()
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_challenge(
        &self,
        challenge_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Submission>> {
        let rows = sqlx::query(&format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE challenge_id = $1 \
             ORDER BY created_at DESC, id DESC OFFSET $2 LIMIT $3"
        ))
        .bind(challenge_id)
        .bind(skip as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(map_submission).collect()
    }
}
