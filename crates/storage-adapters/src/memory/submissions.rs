use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use domains::{StoreError, StoreResult, Submission, SubmissionRepo};

/// In-memory submissions with a (challenge_id, submitter_id) pair index.
///
/// The pair index is the uniqueness guard: inserting through its entry
/// API makes a second submission for the same pair fail atomically, the
/// same way the Postgres UNIQUE constraint does.
#[derive(Default)]
pub struct MemorySubmissionRepo {
    rows: DashMap<Uuid, Submission>,
    pairs: DashMap<(Uuid, Uuid), Uuid>,
}

impl MemorySubmissionRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionRepo for MemorySubmissionRepo {
    async fn create(&self, submission: Submission) -> StoreResult<()> {
        let pair = (submission.challenge_id, submission.submitter_id);
        match self.pairs.entry(pair) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "submission already exists for challenge {} by user {}",
                pair.0, pair.1
            ))),
            Entry::Vacant(vacant) => {
                vacant.insert(submission.id);
                self.rows.insert(submission.id, submission);
                Ok(())
            }
        }
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Submission>> {
        Ok(self.rows.get(&id).map(|s| s.clone()))
    }

    async fn get_by_challenge_and_submitter(
        &self,
        challenge_id: Uuid,
        submitter_id: Uuid,
    ) -> StoreResult<Option<Submission>> {
        let id = match self.pairs.get(&(challenge_id, submitter_id)) {
            Some(id) => *id,
            None => return Ok(None),
        };
        Ok(self.rows.get(&id).map(|s| s.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        match self.rows.remove(&id) {
            Some((_, submission)) => {
                self.pairs
                    .remove(&(submission.challenge_id, submission.submitter_id));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_for_challenge(
        &self,
        challenge_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Submission>> {
        let mut rows: Vec<Submission> = self
            .rows
            .iter()
            .filter(|s| s.challenge_id == challenge_id)
            .map(|s| s.clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }
}
