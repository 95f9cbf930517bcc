use axum::extract::{Multipart, Path, Query, State};
use axum::response::Response;
use serde::Deserialize;

use domains::{MediaKind, PostDraft, PostPatch, Visibility};

use crate::auth::CurrentUser;
use crate::error::{parse_id, ApiError};
use crate::handlers::submissions::split_tags;
use crate::handlers::{read_multipart, PageParams};
use crate::response::{created, ok, ok_empty};
use crate::state::AppState;

const MEDIA_FIELD: &str = "post-images";

/// POST /post/create, multipart: caption, tags, mediaType, visibility, media.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_multipart(multipart, MEDIA_FIELD).await?;

    let media_kind = match form.text("mediaType") {
        Some(raw) => raw
            .parse::<MediaKind>()
            .map_err(|err| ApiError::BadRequest(err.to_string()))?,
        None => MediaKind::Image,
    };
    let visibility = match form.text("visibility") {
        Some(raw) => raw
            .parse::<Visibility>()
            .map_err(|err| ApiError::BadRequest(err.to_string()))?,
        None => Visibility::Public,
    };
    let caption = form.text("caption").map(str::to_string);
    let tags = split_tags(form.text("tags"));

    let media = match form.file {
        Some((data, content_type)) => {
            state.media.save(data, &content_type).await.map_err(|err| {
                tracing::error!(error = %err, "media upload failed");
                ApiError::Internal
            })?
        }
        None => String::new(),
    };

    let post = state
        .posts
        .create(
            identity.user_id,
            PostDraft {
                media,
                media_kind,
                caption,
                tags,
                visibility,
            },
        )
        .await?;
    Ok(created("Post created", post))
}

#[derive(Debug, Deserialize)]
pub struct EditPostRequest {
    pub caption: Option<String>,
    pub tags: Option<Vec<String>>,
    pub visibility: Option<Visibility>,
}

/// PATCH /post/edit/{postId}
pub async fn edit(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(post_id): Path<String>,
    axum::Json(body): axum::Json<EditPostRequest>,
) -> Result<Response, ApiError> {
    let post_id = parse_id("postId", &post_id)?;
    let post = state
        .posts
        .edit(
            identity.user_id,
            post_id,
            PostPatch {
                caption: body.caption,
                tags: body.tags,
                visibility: body.visibility,
            },
        )
        .await?;
    Ok(ok("Post updated", post))
}

/// DELETE /post/delete/{postId}
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Response, ApiError> {
    let post_id = parse_id("postId", &post_id)?;
    state.posts.delete(identity.user_id, post_id).await?;
    Ok(ok_empty("Post deleted successfully"))
}

/// GET /post/feed. Public, newest first.
pub async fn feed(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let posts = state.posts.feed(params.into()).await?;
    Ok(ok("Feed fetched successfully", posts))
}

/// GET /post/my-posts
pub async fn my_posts(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let posts = state.posts.by_user(identity.user_id, params.into()).await?;
    Ok(ok("Posts fetched successfully", posts))
}

/// GET /post/user/{userId}
pub async fn by_user(
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
    Path(user_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let user_id = parse_id("userId", &user_id)?;
    let posts = state.posts.by_user(user_id, params.into()).await?;
    Ok(ok("Posts fetched successfully", posts))
}

/// POST /post/like/{postId}
pub async fn like(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Response, ApiError> {
    let post_id = parse_id("postId", &post_id)?;
    state.posts.like(post_id, identity.user_id).await?;
    Ok(ok_empty("Post liked"))
}

/// POST /post/unlike/{postId}
pub async fn unlike(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(post_id): Path<String>,
) -> Result<Response, ApiError> {
    let post_id = parse_id("postId", &post_id)?;
    state.posts.unlike(post_id, identity.user_id).await?;
    Ok(ok_empty("Post unliked"))
}
