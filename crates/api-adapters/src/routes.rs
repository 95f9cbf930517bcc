//! Route table.
//!
//! Grouped per entity so the binary can mount everything with one call.
//! Literal segments ("getall", "delete-all-mine") are registered alongside
//! the `{id}` captures; axum prefers the literal match.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::{challenges, comments, follows, posts, submissions};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/challenge", challenge_routes())
        .nest("/submit", submission_routes())
        .nest("/post", post_routes())
        .nest("/comment", comment_routes())
        .merge(follow_routes())
        .with_state(state)
}

fn challenge_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(challenges::create))
        .route("/edit/{challengeId}", patch(challenges::edit))
        .route("/delete/{challengeId}", delete(challenges::delete))
        .route("/delete-all-mine", delete(challenges::delete_all_mine))
        .route("/getall", get(challenges::get_all))
        .route("/getmy", get(challenges::get_mine))
        .route("/{challengeId}", get(challenges::get_by_id))
}

fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/existing/{challengeId}", post(submissions::submit_existing))
        .route("/new/{challengeId}", post(submissions::submit_new))
        .route("/get/{challengeId}", get(submissions::get_for_challenge))
        .route("/delete/{submissionId}", delete(submissions::delete))
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(posts::create))
        .route("/edit/{postId}", patch(posts::edit))
        .route("/delete/{postId}", delete(posts::delete))
        .route("/feed", get(posts::feed))
        .route("/my-posts", get(posts::my_posts))
        .route("/user/{userId}", get(posts::by_user))
        .route("/like/{postId}", post(posts::like))
        .route("/unlike/{postId}", post(posts::unlike))
}

fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/create/{postId}", post(comments::create))
        .route("/delete/{commentId}", delete(comments::delete))
        .route("/like/{commentId}", post(comments::like))
        .route("/unlike/{commentId}", post(comments::unlike))
        .route("/post/{postId}", get(comments::for_post))
}

fn follow_routes() -> Router<AppState> {
    Router::new()
        .route("/follow", post(follows::follow))
        .route("/unfollow", post(follows::unfollow))
        .route("/follow/followers/{userId}", get(follows::followers))
        .route("/follow/following/{userId}", get(follows::following))
}
