//! # Challenge Expiry
//!
//! The open/closed lifecycle of a challenge as an explicit transition
//! function. Every challenge-touching operation evaluates this at the
//! top instead of scattering inline date comparisons.

use chrono::{DateTime, Utc};

use crate::models::{Challenge, ChallengeStatus};

/// Outcome of checking a challenge against the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryOutcome {
    /// `ends_at` is strictly in the future; the challenge accepts writes.
    Active,
    /// `ends_at` has passed. `needs_close` is true when the stored status
    /// is still `open` and the caller must persist the closed transition.
    Expired { needs_close: bool },
}

/// Evaluates a challenge's acceptance window at `now`.
///
/// The stored `status` alone is not authoritative: the transition is lazy,
/// so an expired challenge may still read `open` until some operation
/// observes it here.
pub fn evaluate_expiry(challenge: &Challenge, now: DateTime<Utc>) -> ExpiryOutcome {
    if challenge.ends_at > now {
        ExpiryOutcome::Active
    } else {
        ExpiryOutcome::Expired {
            needs_close: challenge.status == ChallengeStatus::Open,
        }
    }
}
