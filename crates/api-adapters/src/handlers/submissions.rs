use axum::extract::{Multipart, Path, Query, State};
use axum::response::Response;
use serde::Deserialize;

use domains::{MediaKind, PostDraft, Visibility};

use crate::auth::CurrentUser;
use crate::error::{parse_id, ApiError};
use crate::handlers::{read_multipart, PageParams};
use crate::response::{created, ok, ok_empty};
use crate::state::AppState;

const MEDIA_FIELD: &str = "challenge-submissions";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitExistingRequest {
    pub post_id: Option<String>,
}

/// POST /submit/existing/{challengeId}: enter an existing post.
pub async fn submit_existing(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(challenge_id): Path<String>,
    axum::Json(body): axum::Json<SubmitExistingRequest>,
) -> Result<Response, ApiError> {
    let challenge_id = parse_id("challengeId", &challenge_id)?;
    let post_id = body
        .post_id
        .ok_or_else(|| ApiError::BadRequest("postId missing".into()))?;
    let post_id = parse_id("postId", &post_id)?;

    let submission = state
        .submissions
        .submit_existing_post(challenge_id, identity.user_id, post_id)
        .await?;
    Ok(created("Submitted to challenge", submission))
}

/// POST /submit/new/{challengeId}, multipart: caption, tags, mediaType,
/// visibility, media. Creates the post and the submission in one call.
pub async fn submit_new(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(challenge_id): Path<String>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let challenge_id = parse_id("challengeId", &challenge_id)?;
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

    // The media id stays empty when no file was sent; the submission
    // engine rejects that after its challenge checks, so a bad request
    // cannot leave an orphan post behind.
    let media = match form.file {
        Some((data, content_type)) => {
            state.media.save(data, &content_type).await.map_err(|err| {
                tracing::error!(error = %err, "media upload failed");
                ApiError::Internal
            })?
        }
        None => String::new(),
    };

    let submission = state
        .submissions
        .create_post_and_submit(
            challenge_id,
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
    Ok(created("Post submitted successfully", submission))
}

/// GET /submit/get/{challengeId}?page=&limit=
pub async fn get_for_challenge(
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
    Path(challenge_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let challenge_id = parse_id("challengeId", &challenge_id)?;
    let submissions = state
        .submissions
        .for_challenge(challenge_id, params.into())
        .await?;
    Ok(ok("Submissions fetched successfully", submissions))
}

/// DELETE /submit/delete/{submissionId}
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(submission_id): Path<String>,
) -> Result<Response, ApiError> {
    let submission_id = parse_id("submissionId", &submission_id)?;
    state
        .submissions
        .delete(submission_id, identity.user_id)
        .await?;
    Ok(ok_empty("Submission deleted successfully"))
}

pub(crate) fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
