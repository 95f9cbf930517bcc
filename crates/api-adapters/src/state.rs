//! State shared across all handlers, assembled once by the binary.

use std::sync::Arc;

use domains::{IdentityProvider, MediaStore};
use services::{ChallengeService, CommentService, FollowService, PostService, SubmissionService};

#[derive(Clone)]
pub struct AppState {
    pub challenges: Arc<ChallengeService>,
    pub submissions: Arc<SubmissionService>,
    pub posts: Arc<PostService>,
    pub comments: Arc<CommentService>,
    pub follows: Arc<FollowService>,
    pub media: Arc<dyn MediaStore>,
    pub identity: Arc<dyn IdentityProvider>,
}
