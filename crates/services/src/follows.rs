//! # FollowService
//!
//! Follow/unfollow bookkeeping. Both sides' denormalized counters move
//! together with the edge, and the storage layer guarantees a single edge
//! per (follower, following) pair.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use domains::{Follow, FollowRepo, FollowView, Page, StoreError, UserRepo};

use crate::error::{ServiceError, ServiceResult};

pub struct FollowService {
    follows: Arc<dyn FollowRepo>,
    users: Arc<dyn UserRepo>,
}

impl FollowService {
    pub fn new(follows: Arc<dyn FollowRepo>, users: Arc<dyn UserRepo>) -> Self {
        Self { follows, users }
    }

    pub async fn follow(&self, follower_id: Uuid, following_id: Uuid) -> ServiceResult<Follow> {
        if follower_id == following_id {
            return Err(ServiceError::InvalidArgument(
                "you cannot follow or unfollow yourself".into(),
            ));
        }
        self.users
            .get_by_id(following_id)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;
        if self.follows.exists(follower_id, following_id).await? {
            return Err(ServiceError::Conflict(
                "you are already following this user".into(),
            ));
        }

        let follow = Follow::new(follower_id, following_id);
        self.follows
            .create(follow.clone())
            .await
            .map_err(|err| match err {
                StoreError::Conflict(_) => {
                    ServiceError::Conflict("you are already following this user".into())
                }
                other => other.into(),
            })?;
        self.users.bump_follower_count(following_id, 1).await?;
        self.users.bump_following_count(follower_id, 1).await?;
        debug!(%follower_id, %following_id, "follow created");
        Ok(follow)
    }

    pub async fn unfollow(&self, follower_id: Uuid, following_id: Uuid) -> ServiceResult<()> {
        if follower_id == following_id {
            return Err(ServiceError::InvalidArgument(
                "you cannot follow or unfollow yourself".into(),
            ));
        }
        if !self.follows.delete_pair(follower_id, following_id).await? {
            return Err(ServiceError::Conflict(
                "you do not follow this user".into(),
            ));
        }
        self.users.bump_follower_count(following_id, -1).await?;
        self.users.bump_following_count(follower_id, -1).await?;
        Ok(())
    }

    /// Users who follow `user_id`, newest first.
    pub async fn followers(&self, user_id: Uuid, page: Page) -> ServiceResult<Vec<FollowView>> {
        let rows = self
            .follows
            .followers_of(user_id, page.skip(), u64::from(page.limit))
            .await?;
        self.enrich(rows, |f| f.follower_id).await
    }

    /// Users `user_id` follows, newest first.
    pub async fn following(&self, user_id: Uuid, page: Page) -> ServiceResult<Vec<FollowView>> {
        let rows = self
            .follows
            .following_of(user_id, page.skip(), u64::from(page.limit))
            .await?;
        self.enrich(rows, |f| f.following_id).await
    }

    async fn enrich(
        &self,
        rows: Vec<Follow>,
        side: impl Fn(&Follow) -> Uuid,
    ) -> ServiceResult<Vec<FollowView>> {
        let ids: Vec<Uuid> = rows.iter().map(&side).collect();
        let previews: HashMap<Uuid, _> = self
            .users
            .get_previews(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        Ok(rows
            .into_iter()
            .map(|follow| FollowView {
                id: follow.id,
                user: previews.get(&side(&follow)).cloned(),
                since: follow.created_at,
            })
            .collect())
    }
}
