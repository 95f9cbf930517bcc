//! # Postgres Backend
//!
//! sqlx-based implementations of the persistence ports. Queries are
//! written as runtime statements with manual row mapping; counter and
//! like-set updates are single conditional statements so they stay atomic
//! under concurrent writers.

mod challenges;
mod comments;
mod follows;
mod posts;
mod submissions;
mod users;

pub use challenges::PgChallengeRepo;
pub use comments::PgCommentRepo;
pub use follows::PgFollowRepo;
pub use posts::PgPostRepo;
pub use submissions::PgSubmissionRepo;
pub use users::PgUserRepo;

use domains::StoreError;

/// Maps a sqlx failure onto the narrow store error surface. Unique-index
/// violations become conflicts; everything else is a backend failure.
pub(crate) fn db_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = err {
        if db.is_unique_violation() {
            return StoreError::Conflict(db.message().to_string());
        }
    }
    StoreError::Backend(err.to_string())
}

/// Maps a corrupt stored enum value (media kind, visibility, status) onto
/// a backend error; these can only appear through out-of-band writes.
pub(crate) fn corrupt_row(what: &str, value: &str) -> StoreError {
    StoreError::Backend(format!("corrupt {what} value '{value}' in row"))
}
