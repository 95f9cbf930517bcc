//! # Domain Models
//!
//! These structs represent the core entities of snapdare.
//! We use UUID v7 for time-ordered, globally unique identification,
//! which also gives listings a stable insertion order.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// A user profile as this core sees it. Accounts are issued elsewhere;
/// we only read profiles and maintain the denormalized counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub avatar: Option<String>,
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
}

/// The public fields of a user embedded in enriched read models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreview {
    pub id: Uuid,
    pub username: String,
    pub avatar: Option<String>,
}

impl From<&UserProfile> for UserPreview {
    fn from(user: &UserProfile) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Role carried by a resolved credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
}

/// The principal resolved from a bearer credential by the identity boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl FromStr for MediaKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            other => Err(DomainError::InvalidMediaKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Followers,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Followers => "followers",
            Self::Private => "private",
        }
    }
}

impl FromStr for Visibility {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Self::Public),
            "followers" => Ok(Self::Followers),
            "private" => Ok(Self::Private),
            other => Err(DomainError::InvalidVisibility(other.to_string())),
        }
    }
}

/// A media post. `liked_by` is a set: a user id appears at most once and
/// `like_count` always equals its length.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    /// Media id handled by the MediaStore port.
    pub media: String,
    pub media_kind: MediaKind,
    pub caption: Option<String>,
    pub tags: Vec<String>,
    pub visibility: Visibility,
    pub like_count: i64,
    pub liked_by: Vec<Uuid>,
    pub comment_count: i64,
    pub commented_by: Vec<Uuid>,
    pub is_deleted: bool,
    /// True only when the post was created specifically to satisfy a
    /// challenge submission, as opposed to an existing post being reused.
    pub is_challenge_submission: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// A fresh post with zeroed counters, owned by `author_id`.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Self {
        Self {
            id: Uuid::now_v7(),
            author_id,
            media: draft.media,
            media_kind: draft.media_kind,
            caption: draft.caption,
            tags: draft.tags,
            visibility: draft.visibility,
            like_count: 0,
            liked_by: Vec::new(),
            comment_count: 0,
            commented_by: Vec::new(),
            is_deleted: false,
            is_challenge_submission: false,
            created_at: Utc::now(),
        }
    }
}

/// Client-supplied fields for a new post. The author always comes from the
/// resolved credential, never from the request body.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub media: String,
    pub media_kind: MediaKind,
    pub caption: Option<String>,
    pub tags: Vec<String>,
    pub visibility: Visibility,
}

/// Partial update for a post; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub caption: Option<String>,
    pub tags: Option<Vec<String>>,
    pub visibility: Option<Visibility>,
}

/// The reduced post fields embedded in a submission view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPreview {
    pub id: Uuid,
    pub media: String,
    pub media_kind: MediaKind,
    pub caption: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
}

impl From<&Post> for PostPreview {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            media: post.media.clone(),
            media_kind: post.media_kind,
            caption: post.caption.clone(),
            like_count: post.like_count,
            comment_count: post.comment_count,
        }
    }
}

/// A post enriched with its author's public profile, as served by feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub author: Option<UserPreview>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Open,
    Closed,
}

/// A time-boxed call for submissions. `status` transitions open → closed,
/// one-way; the transition happens explicitly or lazily the first time an
/// operation observes `ends_at` in the past.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub id: Uuid,
    pub challenger_id: Uuid,
    pub title: String,
    pub description: String,
    pub media: Option<String>,
    pub submission_count: i64,
    pub status: ChallengeStatus,
    pub ends_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Challenge {
    pub fn new(challenger_id: Uuid, draft: ChallengeDraft) -> Self {
        Self {
            id: Uuid::now_v7(),
            challenger_id,
            title: draft.title,
            description: draft.description,
            media: draft.media,
            submission_count: 0,
            status: ChallengeStatus::Open,
            ends_at: draft.ends_at,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChallengeDraft {
    pub title: String,
    pub description: String,
    pub media: Option<String>,
    pub ends_at: DateTime<Utc>,
}

/// Partial update for a challenge; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ChallengePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// A challenge enriched with its creator's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeView {
    #[serde(flatten)]
    pub challenge: Challenge,
    pub challenger: Option<UserPreview>,
}

/// The fact "this user entered this post into this challenge".
/// At most one submission exists per (challenge_id, submitter_id) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: Uuid,
    pub challenge_id: Uuid,
    pub submitter_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(challenge_id: Uuid, submitter_id: Uuid, post_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            challenge_id,
            submitter_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}

/// A submission enriched for display with the submitted post and the
/// submitter's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionView {
    #[serde(flatten)]
    pub submission: Submission,
    pub post: PostPreview,
    pub submitter: Option<UserPreview>,
}

/// A comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub like_count: i64,
    pub liked_by: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            post_id,
            author_id,
            text,
            like_count: 0,
            liked_by: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A comment enriched with its author's public profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Option<UserPreview>,
}

/// A follow edge between two users. The (follower_id, following_id) pair
/// is unique at the storage layer. `active` is the viewer-facing
/// visibility flag; rows are created active.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub following_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Follow {
    pub fn new(follower_id: Uuid, following_id: Uuid) -> Self {
        Self {
            id: Uuid::now_v7(),
            follower_id,
            following_id,
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// One side of a follow edge, enriched for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowView {
    pub id: Uuid,
    pub user: Option<UserPreview>,
    pub since: DateTime<Utc>,
}

/// 1-based pagination with skip/limit semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 50;

    /// Clamps the raw values into a usable range: page >= 1 and
    /// 1 <= limit <= MAX_LIMIT.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn skip(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
