//! Bearer-credential resolution as an extractor: any handler that takes
//! `CurrentUser` is an authenticated route.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use domains::Identity;

use crate::error::ApiError;
use crate::state::AppState;

pub struct CurrentUser(pub Identity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthenticated("missing bearer token".into()))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthenticated("missing bearer token".into()))?;

        let identity = state
            .identity
            .resolve(token)
            .await
            .map_err(|err| ApiError::Unauthenticated(err.to_string()))?;
        Ok(Self(identity))
    }
}
