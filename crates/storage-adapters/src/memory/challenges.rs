use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use domains::{Challenge, ChallengePatch, ChallengeRepo, ChallengeStatus, StoreResult};

/// In-memory challenges keyed by id.
#[derive(Default)]
pub struct MemoryChallengeRepo {
    challenges: DashMap<Uuid, Challenge>,
}

impl MemoryChallengeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut rows: Vec<Challenge>) -> Vec<Challenge> {
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }
}

#[async_trait]
impl ChallengeRepo for MemoryChallengeRepo {
    async fn create(&self, challenge: Challenge) -> StoreResult<()> {
        self.challenges.insert(challenge.id, challenge);
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Challenge>> {
        Ok(self.challenges.get(&id).map(|c| c.clone()))
    }

    async fn update(&self, id: Uuid, patch: ChallengePatch) -> StoreResult<Option<Challenge>> {
        match self.challenges.get_mut(&id) {
            Some(mut challenge) => {
                if let Some(title) = patch.title {
                    challenge.title = title;
                }
                if let Some(description) = patch.description {
                    challenge.description = description;
                }
                if let Some(ends_at) = patch.ends_at {
                    challenge.ends_at = ends_at;
                }
                Ok(Some(challenge.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.challenges.remove(&id).is_some())
    }

    async fn delete_all_by_owner(&self, owner_id: Uuid) -> StoreResult<u64> {
        let ids: Vec<Uuid> = self
            .challenges
            .iter()
            .filter(|c| c.challenger_id == owner_id)
            .map(|c| c.id)
            .collect();
        let mut deleted = 0;
        for id in ids {
            if self.challenges.remove(&id).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn list(&self, skip: u64, limit: u64) -> StoreResult<Vec<Challenge>> {
        let rows: Vec<Challenge> = self.challenges.iter().map(|c| c.clone()).collect();
        Ok(Self::newest_first(rows)
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Challenge>> {
        let rows: Vec<Challenge> = self
            .challenges
            .iter()
            .filter(|c| c.challenger_id == owner_id)
            .map(|c| c.clone())
            .collect();
        Ok(Self::newest_first(rows)
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn close(&self, id: Uuid) -> StoreResult<()> {
        if let Some(mut challenge) = self.challenges.get_mut(&id) {
            challenge.status = ChallengeStatus::Closed;
        }
        Ok(())
    }

    async fn bump_submission_count(&self, id: Uuid, delta: i64) -> StoreResult<()> {
        if let Some(mut challenge) = self.challenges.get_mut(&id) {
            challenge.submission_count += delta;
        }
        Ok(())
    }
}
