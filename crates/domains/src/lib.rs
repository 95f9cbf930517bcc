//! # domains
//!
//! The central domain models, port definitions and validation rules for
//! the snapdare backend. Adapters and services depend on this crate;
//! nothing here performs I/O.

pub mod error;
pub mod expiry;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use expiry::*;
pub use models::*;
pub use ports::*;
