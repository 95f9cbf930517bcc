//! Translation from the service error taxonomy to HTTP responses.
//!
//! Every failure returns a stable `{success: false, message}` body; store
//! errors are logged here and surfaced as an opaque 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use services::ServiceError;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthenticated(String),
    Forbidden(String),
    NotFound(String),
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            Self::BadRequest(msg)
            | Self::Unauthenticated(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg) => msg.clone(),
            Self::Internal => "internal server error".to_string(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidArgument(msg) => Self::BadRequest(msg),
            // State conflicts and expired windows come back as plain bad
            // requests, not 409s.
            ServiceError::Conflict(msg) => Self::BadRequest(msg),
            ServiceError::Expired => Self::BadRequest("the challenge has expired".into()),
            ServiceError::NotFound(resource) => Self::NotFound(format!("{resource} not found")),
            ServiceError::Forbidden(msg) => Self::Forbidden(msg),
            ServiceError::Storage(source) => {
                error!(error = %source, "storage failure");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "message": self.message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

/// Parses a path/body identifier, failing as a 400 with the offending
/// field named. Malformed ids never reach the services.
pub fn parse_id(field: &str, raw: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid {field}")))
}
