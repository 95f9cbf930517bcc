//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.
//! Repositories report infrastructure failures only; business rules live
//! in the service layer.

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::error::{IdentityError, StoreResult};
use crate::models::{
    Challenge, ChallengePatch, Comment, Follow, Identity, Post, PostPatch, Submission,
    UserPreview, UserProfile,
};

/// Profile reads and denormalized counter maintenance for users.
///
/// Counter columns are never mutated anywhere else: each counter has
/// exactly one mutation path, taking a signed delta.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<UserProfile>>;
    async fn get_previews(&self, ids: &[Uuid]) -> StoreResult<Vec<UserPreview>>;
    /// Persists a profile pushed from the identity system (also used by
    /// seeds and tests).
    async fn create(&self, user: UserProfile) -> StoreResult<()>;

    async fn bump_post_count(&self, id: Uuid, delta: i64) -> StoreResult<()>;
    async fn bump_follower_count(&self, id: Uuid, delta: i64) -> StoreResult<()>;
    async fn bump_following_count(&self, id: Uuid, delta: i64) -> StoreResult<()>;
}

/// Data persistence contract for posts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepo: Send + Sync {
    /// Soft-deleted posts are invisible to every read here.
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Post>>;
    async fn get_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Post>>;
    async fn create(&self, post: Post) -> StoreResult<()>;
    /// Returns the updated post, or `None` when it does not exist.
    async fn update(&self, id: Uuid, patch: PostPatch) -> StoreResult<Option<Post>>;
    /// Hard delete. Returns false when no row existed.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;

    /// Public posts, newest first.
    async fn public_feed(&self, skip: u64, limit: u64) -> StoreResult<Vec<Post>>;
    /// A user's own posts, newest first.
    async fn by_author(&self, author_id: Uuid, skip: u64, limit: u64) -> StoreResult<Vec<Post>>;

    /// Atomically adds `user_id` to the like set and bumps the counter.
    /// Returns false when the user had already liked the post.
    async fn like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool>;
    /// Atomically removes `user_id` from the like set and drops the
    /// counter. Returns false when the user had not liked the post.
    async fn unlike(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool>;

    async fn add_commenter(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<()>;
    async fn remove_commenter(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<()>;

    /// Flags a post as created specifically for a challenge submission.
    async fn mark_challenge_submission(&self, post_id: Uuid) -> StoreResult<()>;
}

/// Data persistence contract for challenges.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ChallengeRepo: Send + Sync {
    async fn create(&self, challenge: Challenge) -> StoreResult<()>;
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Challenge>>;
    async fn update(&self, id: Uuid, patch: ChallengePatch) -> StoreResult<Option<Challenge>>;
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
    async fn delete_all_by_owner(&self, owner_id: Uuid) -> StoreResult<u64>;

    /// All challenges, newest first.
    async fn list(&self, skip: u64, limit: u64) -> StoreResult<Vec<Challenge>>;
    async fn list_by_owner(&self, owner_id: Uuid, skip: u64, limit: u64)
        -> StoreResult<Vec<Challenge>>;

    /// Idempotent open → closed transition.
    async fn close(&self, id: Uuid) -> StoreResult<()>;
    async fn bump_submission_count(&self, id: Uuid, delta: i64) -> StoreResult<()>;
}

/// Data persistence contract for submissions.
///
/// `create` enforces uniqueness of (challenge_id, submitter_id) and fails
/// with `StoreError::Conflict` on a duplicate, closing the window left
/// open by the service-level pre-check under concurrent requests.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SubmissionRepo: Send + Sync {
    async fn create(&self, submission: Submission) -> StoreResult<()>;
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Submission>>;
    async fn get_by_challenge_and_submitter(
        &self,
        challenge_id: Uuid,
        submitter_id: Uuid,
    ) -> StoreResult<Option<Submission>>;
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
    /// Submissions for a challenge, newest first.
    async fn list_for_challenge(
        &self,
        challenge_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Submission>>;
}

/// Data persistence contract for comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn create(&self, comment: Comment) -> StoreResult<()>;
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Comment>>;
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
    /// Comments on a post, newest first.
    async fn list_for_post(&self, post_id: Uuid, skip: u64, limit: u64)
        -> StoreResult<Vec<Comment>>;

    /// Same set+counter contract as `PostRepo::like`/`unlike`.
    async fn like(&self, comment_id: Uuid, user_id: Uuid) -> StoreResult<bool>;
    async fn unlike(&self, comment_id: Uuid, user_id: Uuid) -> StoreResult<bool>;
}

/// Data persistence contract for follow edges.
///
/// `create` enforces uniqueness of (follower_id, following_id) with
/// `StoreError::Conflict` on a duplicate.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait FollowRepo: Send + Sync {
    async fn create(&self, follow: Follow) -> StoreResult<()>;
    /// Removes the edge. Returns false when it did not exist.
    async fn delete_pair(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool>;
    async fn exists(&self, follower_id: Uuid, following_id: Uuid) -> StoreResult<bool>;

    /// Active edges pointing at `user_id` (their followers), newest first.
    async fn followers_of(&self, user_id: Uuid, skip: u64, limit: u64)
        -> StoreResult<Vec<Follow>>;
    /// Active edges starting at `user_id` (who they follow), newest first.
    async fn following_of(&self, user_id: Uuid, skip: u64, limit: u64)
        -> StoreResult<Vec<Follow>>;
}

/// Media storage contract for handling uploads.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Saves raw bytes and returns a media id for the Post/Challenge models.
    async fn save(&self, data: Bytes, content_type: &str) -> StoreResult<String>;
    /// Returns the URL or path to the original media.
    async fn url(&self, media_id: &str) -> String;
    /// Returns the URL or path to the thumbnail.
    async fn thumbnail_url(&self, media_id: &str) -> String;
}

/// Identity boundary: resolves an opaque bearer credential to a principal
/// or rejects it. Credential issuance happens elsewhere.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, bearer_token: &str) -> Result<Identity, IdentityError>;
}
