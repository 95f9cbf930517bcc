//! # storage-adapters
//!
//! Concrete implementations of the persistence ports in `domains`.
//!
//! Two backends are provided: an always-compiled in-memory backend used
//! by tests and the default dev profile, and a Postgres backend behind
//! the `db-postgres` feature. Media lands on the local filesystem.

pub mod media_local;
pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use media_local::LocalMediaStore;
