use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::{parse_id, ApiError};
use crate::handlers::PageParams;
use crate::response::{created, ok, ok_empty};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub following_id: Option<String>,
}

fn target_id(body: FollowRequest) -> Result<uuid::Uuid, ApiError> {
    let raw = body
        .following_id
        .ok_or_else(|| ApiError::BadRequest("followingId missing".into()))?;
    parse_id("followingId", &raw)
}

/// POST /follow
pub async fn follow(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    axum::Json(body): axum::Json<FollowRequest>,
) -> Result<Response, ApiError> {
    let following_id = target_id(body)?;
    let follow = state.follows.follow(identity.user_id, following_id).await?;
    Ok(created("Followed successfully", follow))
}

/// POST /unfollow
pub async fn unfollow(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    axum::Json(body): axum::Json<FollowRequest>,
) -> Result<Response, ApiError> {
    let following_id = target_id(body)?;
    state.follows.unfollow(identity.user_id, following_id).await?;
    Ok(ok_empty("Unfollowed successfully"))
}

/// GET /follow/followers/{userId}
pub async fn followers(
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
    Path(user_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let user_id = parse_id("userId", &user_id)?;
    let followers = state.follows.followers(user_id, params.into()).await?;
    Ok(ok("Followers fetched successfully", followers))
}

/// GET /follow/following/{userId}
pub async fn following(
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
    Path(user_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let user_id = parse_id("userId", &user_id)?;
    let following = state.follows.following(user_id, params.into()).await?;
    Ok(ok("Following fetched successfully", following))
}
