//! # services
//!
//! Business logic for snapdare. Each service owns the validation and
//! counter-synchronization rules for one entity and talks to storage
//! only through the port traits in `domains`.
//!
//! Services are constructed once at process start and injected into the
//! API layer; there is no global state.

pub mod challenges;
pub mod comments;
pub mod error;
pub mod follows;
pub mod posts;
pub mod submissions;

pub use challenges::ChallengeService;
pub use comments::CommentService;
pub use error::{ServiceError, ServiceResult};
pub use follows::FollowService;
pub use posts::PostService;
pub use submissions::SubmissionService;
