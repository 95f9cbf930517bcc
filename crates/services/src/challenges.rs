//! # ChallengeService
//!
//! CRUD over challenges plus the lazy expiry transition. Ownership is
//! enforced here, not in the storage layer.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use domains::{
    evaluate_expiry, Challenge, ChallengeDraft, ChallengePatch, ChallengeRepo, ChallengeStatus,
    ChallengeView, ExpiryOutcome, Page, UserRepo,
};

use crate::error::{ServiceError, ServiceResult};

pub struct ChallengeService {
    challenges: Arc<dyn ChallengeRepo>,
    users: Arc<dyn UserRepo>,
}

impl ChallengeService {
    pub fn new(challenges: Arc<dyn ChallengeRepo>, users: Arc<dyn UserRepo>) -> Self {
        Self { challenges, users }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        draft: ChallengeDraft,
    ) -> ServiceResult<Challenge> {
        if draft.title.trim().is_empty() {
            return Err(ServiceError::InvalidArgument("title is required".into()));
        }
        if draft.description.trim().is_empty() {
            return Err(ServiceError::InvalidArgument(
                "description is required".into(),
            ));
        }
        if draft.ends_at <= Utc::now() {
            return Err(ServiceError::InvalidArgument(
                "endsAt must be in the future".into(),
            ));
        }

        let challenge = Challenge::new(owner_id, draft);
        self.challenges.create(challenge.clone()).await?;
        debug!(challenge_id = %challenge.id, "challenge created");
        Ok(challenge)
    }

    pub async fn edit(
        &self,
        caller_id: Uuid,
        challenge_id: Uuid,
        patch: ChallengePatch,
    ) -> ServiceResult<Challenge> {
        let challenge = self.require(challenge_id).await?;
        if challenge.challenger_id != caller_id {
            return Err(ServiceError::Forbidden(
                "you are not allowed to edit this challenge".into(),
            ));
        }

        // Edits are frozen once ends_at has passed, regardless of status.
        if let ExpiryOutcome::Expired { needs_close } = evaluate_expiry(&challenge, Utc::now()) {
            if needs_close {
                self.challenges.close(challenge_id).await?;
            }
            return Err(ServiceError::InvalidArgument(
                "challenge can no longer be edited".into(),
            ));
        }

        if let Some(new_ends_at) = patch.ends_at {
            if new_ends_at <= Utc::now() {
                return Err(ServiceError::InvalidArgument(
                    "endsAt must be in the future".into(),
                ));
            }
        }

        self.challenges
            .update(challenge_id, patch)
            .await?
            .ok_or(ServiceError::NotFound("challenge"))
    }

    pub async fn delete(&self, caller_id: Uuid, challenge_id: Uuid) -> ServiceResult<()> {
        let challenge = self.require(challenge_id).await?;
        if challenge.challenger_id != caller_id {
            return Err(ServiceError::Forbidden(
                "you are not allowed to delete this challenge".into(),
            ));
        }
        // No expiry restriction on delete.
        self.challenges.delete(challenge_id).await?;
        Ok(())
    }

    pub async fn delete_all_mine(&self, caller_id: Uuid) -> ServiceResult<u64> {
        Ok(self.challenges.delete_all_by_owner(caller_id).await?)
    }

    /// Single challenge lookup. Observing a passed deadline here closes
    /// the challenge as a side effect before returning it.
    pub async fn get(&self, challenge_id: Uuid) -> ServiceResult<ChallengeView> {
        let mut challenge = self.require(challenge_id).await?;
        if let ExpiryOutcome::Expired { needs_close: true } =
            evaluate_expiry(&challenge, Utc::now())
        {
            self.challenges.close(challenge_id).await?;
            challenge.status = ChallengeStatus::Closed;
        }
        let challenger = self
            .users
            .get_previews(&[challenge.challenger_id])
            .await?
            .into_iter()
            .next();
        Ok(ChallengeView {
            challenge,
            challenger,
        })
    }

    pub async fn list(&self, page: Page) -> ServiceResult<Vec<ChallengeView>> {
        let rows = self
            .challenges
            .list(page.skip(), u64::from(page.limit))
            .await?;
        self.enrich(rows).await
    }

    pub async fn list_mine(&self, owner_id: Uuid, page: Page) -> ServiceResult<Vec<ChallengeView>> {
        let rows = self
            .challenges
            .list_by_owner(owner_id, page.skip(), u64::from(page.limit))
            .await?;
        self.enrich(rows).await
    }

    async fn require(&self, challenge_id: Uuid) -> ServiceResult<Challenge> {
        self.challenges
            .get_by_id(challenge_id)
            .await?
            .ok_or(ServiceError::NotFound("challenge"))
    }

    async fn enrich(&self, rows: Vec<Challenge>) -> ServiceResult<Vec<ChallengeView>> {
        let ids: Vec<Uuid> = rows.iter().map(|c| c.challenger_id).collect();
        let previews = self.users.get_previews(&ids).await?;
        Ok(rows
            .into_iter()
            .map(|challenge| {
                let challenger = previews
                    .iter()
                    .find(|p| p.id == challenge.challenger_id)
                    .cloned();
                ChallengeView {
                    challenge,
                    challenger,
                }
            })
            .collect())
    }
}
