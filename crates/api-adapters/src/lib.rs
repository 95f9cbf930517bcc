//! # api-adapters
//!
//! The web routing and orchestration layer for snapdare. Handlers parse
//! and validate the wire format, resolve the caller through the identity
//! port, delegate to the services, and translate `ServiceError` kinds to
//! status codes. No business rules live here.

#[cfg(feature = "web-axum")]
pub mod auth;
#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod response;
#[cfg(feature = "web-axum")]
pub mod routes;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use routes::router;
#[cfg(feature = "web-axum")]
pub use state::AppState;
