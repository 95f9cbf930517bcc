use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use domains::{StoreResult, UserPreview, UserProfile, UserRepo};

/// In-memory user profiles keyed by id.
#[derive(Default)]
pub struct MemoryUserRepo {
    users: DashMap<Uuid, UserProfile>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<UserProfile>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn get_previews(&self, ids: &[Uuid]) -> StoreResult<Vec<UserPreview>> {
        let mut seen = HashSet::new();
        Ok(ids
            .iter()
            .filter(|id| seen.insert(**id))
            .filter_map(|id| self.users.get(id).map(|u| UserPreview::from(&*u)))
            .collect())
    }

    async fn create(&self, user: UserProfile) -> StoreResult<()> {
        self.users.insert(user.id, user);
        Ok(())
    }

    async fn bump_post_count(&self, id: Uuid, delta: i64) -> StoreResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.post_count += delta;
        }
        Ok(())
    }

    async fn bump_follower_count(&self, id: Uuid, delta: i64) -> StoreResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.follower_count += delta;
        }
        Ok(())
    }

    async fn bump_following_count(&self, id: Uuid, delta: i64) -> StoreResult<()> {
        if let Some(mut user) = self.users.get_mut(&id) {
            user.following_count += delta;
        }
        Ok(())
    }
}
