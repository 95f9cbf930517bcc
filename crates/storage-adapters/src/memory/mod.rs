//! # In-Memory Backend
//!
//! `DashMap`-backed implementations of the persistence ports. Uniqueness
//! rules are enforced through the map entry API, so the backend gives the
//! same conflict behavior as the Postgres constraints.
//!
//! Used by the test suites and by the dev profile when no database is
//! configured.

mod challenges;
mod comments;
mod follows;
mod media;
mod posts;
mod submissions;
mod users;

pub use challenges::MemoryChallengeRepo;
pub use comments::MemoryCommentRepo;
pub use follows::MemoryFollowRepo;
pub use media::MemoryMediaStore;
pub use posts::MemoryPostRepo;
pub use submissions::MemorySubmissionRepo;
pub use users::MemoryUserRepo;
