//! # SubmissionService
//!
//! The coordinating component of the challenge workflow: links a
//! submitter, a challenge and a post, enforcing one submission per user
//! per challenge and the challenge's acceptance window. Creates posts
//! on-the-fly when a submission is not based on an existing one.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use domains::{
    evaluate_expiry, Challenge, ChallengeRepo, ExpiryOutcome, Page, Post, PostDraft,
    PostPreview, PostRepo, StoreError, Submission, SubmissionRepo, SubmissionView, UserRepo,
};

use crate::error::{ServiceError, ServiceResult};

const ONE_PER_CHALLENGE: &str = "you can only submit one post per challenge";

pub struct SubmissionService {
    submissions: Arc<dyn SubmissionRepo>,
    challenges: Arc<dyn ChallengeRepo>,
    posts: Arc<dyn PostRepo>,
    users: Arc<dyn UserRepo>,
}

impl SubmissionService {
    pub fn new(
        submissions: Arc<dyn SubmissionRepo>,
        challenges: Arc<dyn ChallengeRepo>,
        posts: Arc<dyn PostRepo>,
        users: Arc<dyn UserRepo>,
    ) -> Self {
        Self {
            submissions,
            challenges,
            posts,
            users,
        }
    }

    /// Enters an existing post into a challenge.
    ///
    /// Preconditions, each a distinct failure, checked in order: the post
    /// exists and is not deleted, the caller authored it, the challenge
    /// exists, its window is still open, and the caller has not already
    /// submitted to it.
    pub async fn submit_existing_post(
        &self,
        challenge_id: Uuid,
        submitter_id: Uuid,
        post_id: Uuid,
    ) -> ServiceResult<SubmissionView> {
        let post = self
            .posts
            .get_by_id(post_id)
            .await?
            .ok_or(ServiceError::NotFound("post"))?;
        self.ensure_own_post(&post, submitter_id)?;

        let challenge = self.require_challenge(challenge_id).await?;
        self.ensure_open(&challenge).await?;
        self.ensure_first_submission(challenge_id, submitter_id).await?;

        self.record_submission(challenge_id, submitter_id, &post).await
    }

    /// Creates a post from `draft` and enters it into the challenge in one
    /// operation. Challenge checks run before anything is persisted so a
    /// failed precondition never leaves an orphan post behind.
    pub async fn create_post_and_submit(
        &self,
        challenge_id: Uuid,
        submitter_id: Uuid,
        draft: PostDraft,
    ) -> ServiceResult<SubmissionView> {
        let challenge = self.require_challenge(challenge_id).await?;
        self.ensure_open(&challenge).await?;
        self.ensure_first_submission(challenge_id, submitter_id).await?;

        if draft.media.trim().is_empty() {
            return Err(ServiceError::InvalidArgument("media required".into()));
        }

        let post = Post::new(submitter_id, draft);
        let post_id = post.id;
        self.posts.create(post).await?;
        self.users.bump_post_count(submitter_id, 1).await?;
        self.posts.mark_challenge_submission(post_id).await?;

        // Re-read and enforce ownership uniformly with the existing-post
        // path, even though it holds by construction.
        let post = self
            .posts
            .get_by_id(post_id)
            .await?
            .ok_or(ServiceError::NotFound("post"))?;
        self.ensure_own_post(&post, submitter_id)?;

        self.record_submission(challenge_id, submitter_id, &post).await
    }

    /// Deletes a submission. The underlying post is deleted too only when
    /// it was created specifically for this submission; a pre-existing
    /// post that was merely entered survives.
    pub async fn delete(&self, submission_id: Uuid, caller_id: Uuid) -> ServiceResult<()> {
        let submission = self
            .submissions
            .get_by_id(submission_id)
            .await?
            .ok_or(ServiceError::NotFound("submission"))?;
        if submission.submitter_id != caller_id {
            return Err(ServiceError::Forbidden(
                "you are not allowed to delete this submission".into(),
            ));
        }
        let post = self
            .posts
            .get_by_id(submission.post_id)
            .await?
            .ok_or(ServiceError::NotFound("post"))?;

        self.submissions.delete(submission_id).await?;
        if post.is_challenge_submission {
            self.posts.delete(post.id).await?;
            self.users.bump_post_count(caller_id, -1).await?;
        }
        self.challenges
            .bump_submission_count(submission.challenge_id, -1)
            .await?;
        debug!(%submission_id, cascade = post.is_challenge_submission, "submission deleted");
        Ok(())
    }

    /// Submissions for a challenge, newest first, enriched with the
    /// submitted post and the submitter's public profile. Pure read.
    pub async fn for_challenge(
        &self,
        challenge_id: Uuid,
        page: Page,
    ) -> ServiceResult<Vec<SubmissionView>> {
        let rows = self
            .submissions
            .list_for_challenge(challenge_id, page.skip(), u64::from(page.limit))
            .await?;

        let post_ids: Vec<Uuid> = rows.iter().map(|s| s.post_id).collect();
        let submitter_ids: Vec<Uuid> = rows.iter().map(|s| s.submitter_id).collect();
        let posts: HashMap<Uuid, Post> = self
            .posts
            .get_by_ids(&post_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        let previews: HashMap<Uuid, _> = self
            .users
            .get_previews(&submitter_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|submission| {
                // A submission whose post has vanished is not displayable.
                let post = match posts.get(&submission.post_id) {
                    Some(post) => PostPreview::from(post),
                    None => {
                        warn!(submission_id = %submission.id, "submission references missing post");
                        return None;
                    }
                };
                let submitter = previews.get(&submission.submitter_id).cloned();
                Some(SubmissionView {
                    submission,
                    post,
                    submitter,
                })
            })
            .collect())
    }

    async fn require_challenge(&self, challenge_id: Uuid) -> ServiceResult<Challenge> {
        self.challenges
            .get_by_id(challenge_id)
            .await?
            .ok_or(ServiceError::NotFound("challenge"))
    }

    /// Rejects writes to a challenge whose window has closed. Observing a
    /// passed deadline transitions the challenge to closed before the
    /// error is returned; the caller only sees the error.
    async fn ensure_open(&self, challenge: &Challenge) -> ServiceResult<()> {
        match evaluate_expiry(challenge, Utc::now()) {
            ExpiryOutcome::Active => Ok(()),
            ExpiryOutcome::Expired { needs_close } => {
                if needs_close {
                    self.challenges.close(challenge.id).await?;
                }
                Err(ServiceError::Expired)
            }
        }
    }

    async fn ensure_first_submission(
        &self,
        challenge_id: Uuid,
        submitter_id: Uuid,
    ) -> ServiceResult<()> {
        let existing = self
            .submissions
            .get_by_challenge_and_submitter(challenge_id, submitter_id)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(ONE_PER_CHALLENGE.into()));
        }
        Ok(())
    }

    fn ensure_own_post(&self, post: &Post, submitter_id: Uuid) -> ServiceResult<()> {
        if post.author_id != submitter_id {
            return Err(ServiceError::Forbidden(
                "you can only submit your own posts".into(),
            ));
        }
        Ok(())
    }

    async fn record_submission(
        &self,
        challenge_id: Uuid,
        submitter_id: Uuid,
        post: &Post,
    ) -> ServiceResult<SubmissionView> {
        let submission = Submission::new(challenge_id, submitter_id, post.id);
        // The storage layer enforces (challenge_id, submitter_id)
        // uniqueness, closing the race left open by the pre-check.
        self.submissions
            .create(submission.clone())
            .await
            .map_err(|err| match err {
                StoreError::Conflict(_) => ServiceError::Conflict(ONE_PER_CHALLENGE.into()),
                other => other.into(),
            })?;
        self.challenges
            .bump_submission_count(challenge_id, 1)
            .await?;

        let submitter = self
            .users
            .get_previews(&[submitter_id])
            .await?
            .into_iter()
            .next();
        debug!(submission_id = %submission.id, %challenge_id, "submission recorded");
        Ok(SubmissionView {
            post: PostPreview::from(post),
            submission,
            submitter,
        })
    }
}
