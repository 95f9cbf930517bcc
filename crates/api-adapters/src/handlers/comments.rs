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
pub struct CreateCommentRequest {
    pub comment_text: Option<String>,
}

/// POST /comment/create/{postId}
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(post_id): Path<String>,
    axum::Json(body): axum::Json<CreateCommentRequest>,
) -> Result<Response, ApiError> {
    let post_id = parse_id("postId", &post_id)?;
    let text = body
        .comment_text
        .ok_or_else(|| ApiError::BadRequest("commentText missing".into()))?;
    let comment = state.comments.create(post_id, identity.user_id, text).await?;
    Ok(created("Comment created", comment))
}

/// DELETE /comment/delete/{commentId}
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(comment_id): Path<String>,
) -> Result<Response, ApiError> {
    let comment_id = parse_id("commentId", &comment_id)?;
    state.comments.delete(identity.user_id, comment_id).await?;
    Ok(ok_empty("Comment deleted successfully"))
}

/// POST /comment/like/{commentId}
pub async fn like(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(comment_id): Path<String>,
) -> Result<Response, ApiError> {
    let comment_id = parse_id("commentId", &comment_id)?;
    state.comments.like(comment_id, identity.user_id).await?;
    Ok(ok_empty("Comment liked"))
}

/// POST /comment/unlike/{commentId}
pub async fn unlike(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(comment_id): Path<String>,
) -> Result<Response, ApiError> {
    let comment_id = parse_id("commentId", &comment_id)?;
    state.comments.unlike(comment_id, identity.user_id).await?;
    Ok(ok_empty("Comment unliked"))
}

/// GET /comment/post/{postId}?page=&limit=. No auth required.
pub async fn for_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let post_id = parse_id("postId", &post_id)?;
    let comments = state.comments.for_post(post_id, params.into()).await?;
    Ok(ok("Comments fetched successfully", comments))
}
