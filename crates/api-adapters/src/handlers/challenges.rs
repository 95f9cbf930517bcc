use axum::extract::{Multipart, Path, Query, State};
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use domains::{ChallengeDraft, ChallengePatch};

use crate::auth::CurrentUser;
use crate::error::{parse_id, ApiError};
use crate::handlers::{read_multipart, PageParams};
use crate::response::{created, ok, ok_empty};
use crate::state::AppState;

const MEDIA_FIELD: &str = "challenge-images";

/// POST /challenge/create, multipart: title, description, endsAt, media.
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_multipart(multipart, MEDIA_FIELD).await?;

    let title = form.text("challengeTitle").unwrap_or_default().to_string();
    let description = form
        .text("challengeDescription")
        .unwrap_or_default()
        .to_string();
    let ends_at = parse_ends_at(form.text("endsAt"))?
        .ok_or_else(|| ApiError::BadRequest("endsAt is required".into()))?;

    let media = match form.file {
        Some((data, content_type)) => Some(state.media.save(data, &content_type).await.map_err(
            |err| {
                tracing::error!(error = %err, "media upload failed");
                ApiError::Internal
            },
        )?),
        None => None,
    };

    let challenge = state
        .challenges
        .create(
            identity.user_id,
            ChallengeDraft {
                title,
                description,
                media,
                ends_at,
            },
        )
        .await?;
    Ok(created("Challenge created", challenge))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditChallengeRequest {
    pub challenge_title: Option<String>,
    pub challenge_description: Option<String>,
    pub ends_at: Option<DateTime<Utc>>,
}

/// PATCH /challenge/edit/{challengeId}
pub async fn edit(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(challenge_id): Path<String>,
    axum::Json(body): axum::Json<EditChallengeRequest>,
) -> Result<Response, ApiError> {
    let challenge_id = parse_id("challengeId", &challenge_id)?;
    let challenge = state
        .challenges
        .edit(
            identity.user_id,
            challenge_id,
            ChallengePatch {
                title: body.challenge_title,
                description: body.challenge_description,
                ends_at: body.ends_at,
            },
        )
        .await?;
    Ok(ok("Challenge updated", challenge))
}

/// DELETE /challenge/delete/{challengeId}
pub async fn delete(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(challenge_id): Path<String>,
) -> Result<Response, ApiError> {
    let challenge_id = parse_id("challengeId", &challenge_id)?;
    state.challenges.delete(identity.user_id, challenge_id).await?;
    Ok(ok_empty("Challenge deleted successfully"))
}

/// DELETE /challenge/delete-all-mine
pub async fn delete_all_mine(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
) -> Result<Response, ApiError> {
    let deleted = state.challenges.delete_all_mine(identity.user_id).await?;
    Ok(ok("All challenges by user deleted", deleted))
}

/// GET /challenge/getall. No auth required.
pub async fn get_all(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let challenges = state.challenges.list(params.into()).await?;
    Ok(ok("Challenges fetched successfully", challenges))
}

/// GET /challenge/getmy
pub async fn get_mine(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Response, ApiError> {
    let challenges = state
        .challenges
        .list_mine(identity.user_id, params.into())
        .await?;
    Ok(ok("Challenges fetched successfully", challenges))
}

/// GET /challenge/{challengeId}
pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentUser(_identity): CurrentUser,
    Path(challenge_id): Path<String>,
) -> Result<Response, ApiError> {
    let challenge_id = parse_id("challengeId", &challenge_id)?;
    let challenge = state.challenges.get(challenge_id).await?;
    Ok(ok("Challenge fetched successfully", challenge))
}

fn parse_ends_at(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ApiError> {
    raw.map(|value| {
        value
            .parse::<DateTime<Utc>>()
            .map_err(|_| ApiError::BadRequest("endsAt must be an RFC 3339 timestamp".into()))
    })
    .transpose()
}
