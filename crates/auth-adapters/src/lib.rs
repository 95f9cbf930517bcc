//! # auth-adapters
//!
//! Implementations of the `IdentityProvider` port. Credential issuance
//! (registration, login, password handling) lives outside this system;
//! these adapters only resolve a presented bearer credential to a
//! principal or reject it.

pub mod static_tokens;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use static_tokens::StaticTokenProvider;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtIdentityProvider;
