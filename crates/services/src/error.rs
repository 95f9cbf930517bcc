//! # ServiceError
//!
//! The stable, transport-independent error taxonomy of the service layer.
//! Handlers map these kinds to status codes; nothing below this layer
//! leaks backend error text to a client.

use domains::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Malformed input or a business-rule input violation
    /// (e.g. `ends_at` in the past, missing media).
    #[error("{0}")]
    InvalidArgument(String),

    /// The referenced resource does not exist or was deleted.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The caller is not the resource's owner.
    #[error("{0}")]
    Forbidden(String),

    /// A state rule was violated: duplicate submission, double like,
    /// unfollow without a follow, and the like.
    #[error("{0}")]
    Conflict(String),

    /// The challenge's acceptance window has closed.
    #[error("the challenge has expired")]
    Expired,

    /// Infrastructure failure wrapped uniformly; details are logged,
    /// never surfaced.
    #[error("internal service error")]
    Storage(#[source] StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err)
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
