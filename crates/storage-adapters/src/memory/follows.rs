use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use domains::{Follow, FollowRepo, StoreError, StoreResult};

/// In-memory follow edges keyed directly by the (follower, following)
/// pair, which makes the uniqueness rule structural.
#[derive(Default)]
pub struct MemoryFollowRepo {
    edges: DashMap<(Uuid, Uuid), Follow>,
}

impl MemoryFollowRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(mut rows: Vec<Follow>) -> Vec<Follow> {
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }
}

#[async_trait]
impl FollowRepo for MemoryFollowRepo {
    async fn create(&self, follow: Follow) -> StoreResult<()> {
        let pair = (follow.follower_id, follow.following_id);
        match self.edges.entry(pair) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "user {} already follows user {}",
                pair.0, pair.1
            ))),
            Entry::Vacant(vacant) => {
                vacant.insert(follow);
                Ok(())
            }
        }
    }

    async fn delete_pair(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool> {
        Ok(self.edges.remove(&(follower_id, following_id)).is_some())
    }

    async fn exists(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool> {
        Ok(self.edges.contains_key(&(follower_id, following_id)))
    }

    async fn followers_of(
        &self,
        user_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Follow>> {
        let rows: Vec<Follow> = self
            .edges
            .iter()
            .filter(|f| f.following_id == user_id && f.active)
            .map(|f| f.clone())
            .collect();
        Ok(Self::newest_first(rows)
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn following_of(
        &self,
        user_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Follow>> {
        let rows: Vec<Follow> = self
            .edges
            .iter()
            .filter(|f| f.follower_id == user_id && f.active)
            .map(|f| f.clone())
            .collect();
        Ok(Self::newest_first(rows)
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }
}
