//! # Domain Errors
//!
//! Failures raised below the service layer. `StoreError` is deliberately
//! narrow: repositories report infrastructure problems only, and the
//! service layer owns the user-facing error taxonomy.

use thiserror::Error;

/// Infrastructure-level failure raised by a storage adapter.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A storage-level uniqueness rule was violated (e.g. a second
    /// submission for the same (challenge, submitter) pair).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Backend failure (connection lost, query failed, corrupt row).
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A specialized Result type for storage operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Validation failure while constructing a domain value.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid media kind '{0}', expected 'image' or 'video'")]
    InvalidMediaKind(String),

    #[error("invalid visibility '{0}', expected 'public', 'followers' or 'private'")]
    InvalidVisibility(String),
}

/// Credential resolution failure from the identity boundary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdentityError {
    #[error("invalid or expired credential")]
    InvalidCredential,
}
