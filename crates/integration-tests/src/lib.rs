//! Shared fixtures for the integration test suites: a fully wired world
//! of services over the in-memory backend, with direct access to the
//! repositories for state inspection.

use std::sync::Arc;

use uuid::Uuid;

use auth_adapters::StaticTokenProvider;
use domains::{Identity, Role, UserProfile, UserRepo};
use services::{ChallengeService, CommentService, FollowService, PostService, SubmissionService};
use storage_adapters::memory::{
    MemoryChallengeRepo, MemoryCommentRepo, MemoryFollowRepo, MemoryPostRepo,
    MemorySubmissionRepo, MemoryUserRepo,
};

pub struct World {
    pub users: Arc<MemoryUserRepo>,
    pub posts: Arc<MemoryPostRepo>,
    pub challenges: Arc<MemoryChallengeRepo>,
    pub submissions: Arc<MemorySubmissionRepo>,
    pub comments: Arc<MemoryCommentRepo>,
    pub follows: Arc<MemoryFollowRepo>,

    pub challenge_svc: ChallengeService,
    pub submission_svc: SubmissionService,
    pub post_svc: PostService,
    pub comment_svc: CommentService,
    pub follow_svc: FollowService,

    pub identity: Arc<StaticTokenProvider>,
}

impl World {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserRepo::new());
        let posts = Arc::new(MemoryPostRepo::new());
        let challenges = Arc::new(MemoryChallengeRepo::new());
        let submissions = Arc::new(MemorySubmissionRepo::new());
        let comments = Arc::new(MemoryCommentRepo::new());
        let follows = Arc::new(MemoryFollowRepo::new());

        Self {
            challenge_svc: ChallengeService::new(challenges.clone(), users.clone()),
            submission_svc: SubmissionService::new(
                submissions.clone(),
                challenges.clone(),
                posts.clone(),
                users.clone(),
            ),
            post_svc: PostService::new(posts.clone(), users.clone()),
            comment_svc: CommentService::new(comments.clone(), posts.clone(), users.clone()),
            follow_svc: FollowService::new(follows.clone(), users.clone()),
            identity: Arc::new(StaticTokenProvider::new()),
            users,
            posts,
            challenges,
            submissions,
            comments,
            follows,
        }
    }

    /// Seeds a user profile and registers a `token-<username>` credential
    /// for it, returning the new id.
    pub async fn seed_user(&self, username: &str) -> Uuid {
        let id = Uuid::now_v7();
        self.users
            .create(UserProfile {
                id,
                username: username.to_string(),
                avatar: None,
                post_count: 0,
                follower_count: 0,
                following_count: 0,
            })
            .await
            .expect("seed user");
        self.identity.insert(
            format!("token-{username}"),
            Identity {
                user_id: id,
                role: Role::User,
            },
        );
        id
    }

    pub async fn post_count_of(&self, user_id: Uuid) -> i64 {
        self.users
            .get_by_id(user_id)
            .await
            .expect("user lookup")
            .expect("user exists")
            .post_count
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "web-axum")]
pub fn test_app(world: &World) -> axum::Router {
    use api_adapters::AppState;
    use storage_adapters::memory::MemoryMediaStore;

    api_adapters::router(AppState {
        challenges: Arc::new(ChallengeService::new(
            world.challenges.clone(),
            world.users.clone(),
        )),
        submissions: Arc::new(SubmissionService::new(
            world.submissions.clone(),
            world.challenges.clone(),
            world.posts.clone(),
            world.users.clone(),
        )),
        posts: Arc::new(PostService::new(world.posts.clone(), world.users.clone())),
        comments: Arc::new(CommentService::new(
            world.comments.clone(),
            world.posts.clone(),
            world.users.clone(),
        )),
        follows: Arc::new(FollowService::new(
            world.follows.clone(),
            world.users.clone(),
        )),
        media: Arc::new(MemoryMediaStore::new()),
        identity: world.identity.clone(),
    })
}
