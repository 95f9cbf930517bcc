//! Full HTTP round trips for the submission surface, driven through
//! tower's `oneshot` against the in-memory backend.

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use tower::ServiceExt;

use domains::{ChallengeDraft, MediaKind, PostDraft, Visibility};
use integration_tests::{test_app, World};

const BOUNDARY: &str = "it-boundary";

fn post_draft() -> PostDraft {
    PostDraft {
        media: "abc123".into(),
        media_kind: MediaKind::Image,
        caption: None,
        tags: Vec::new(),
        visibility: Visibility::Public,
    }
}

async fn seeded_world() -> (World, uuid::Uuid, uuid::Uuid, uuid::Uuid) {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;
    let challenge = world
        .challenge_svc
        .create(
            bob,
            ChallengeDraft {
                title: "street shots".into(),
                description: "one week of street photography".into(),
                media: None,
                ends_at: Utc::now() + Duration::days(1),
            },
        )
        .await
        .unwrap();
    (world, alice, bob, challenge.id)
}

fn json_request(method: &str, uri: String, token: &str, body: String) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn submit_new_form(with_media: bool) -> (String, String) {
    let mut body = String::new();
    body.push_str(&format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\nmy entry\r\n"
    ));
    if with_media {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; \
             name=\"challenge-submissions\"; filename=\"entry.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\nfake-jpeg-bytes\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    (
        body,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    )
}

#[tokio::test]
async fn submit_existing_post_round_trip() {
    let (world, alice, _bob, challenge_id) = seeded_world().await;
    let post = world.post_svc.create(alice, post_draft()).await.unwrap();
    let app = test_app(&world);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            format!("/submit/existing/{challenge_id}"),
            "token-alice",
            format!(r#"{{"postId":"{}"}}"#, post.id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["challengeId"], challenge_id.to_string());
    assert_eq!(json["data"]["post"]["id"], post.id.to_string());
    assert_eq!(json["data"]["submitter"]["username"], "alice");

    // One submission per challenge: the second attempt is a 400.
    let second = world.post_svc.create(alice, post_draft()).await.unwrap();
    let response = app
        .oneshot(json_request(
            "POST",
            format!("/submit/existing/{challenge_id}"),
            "token-alice",
            format!(r#"{{"postId":"{}"}}"#, second.id),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("one post"));
}

#[tokio::test]
async fn submit_existing_without_post_id_is_400() {
    let (world, _alice, _bob, challenge_id) = seeded_world().await;
    let app = test_app(&world);

    let response = app
        .oneshot(json_request(
            "POST",
            format!("/submit/existing/{challenge_id}"),
            "token-alice",
            "{}".to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("postId"));
}

#[tokio::test]
async fn submit_new_creates_flagged_post_and_submission() {
    let (world, alice, _bob, challenge_id) = seeded_world().await;
    let app = test_app(&world);
    let (body, content_type) = submit_new_form(true);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/submit/new/{challenge_id}"))
                .header(AUTHORIZATION, "Bearer token-alice")
                .header(CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["submitter"]["username"], "alice");
    assert_eq!(json["data"]["post"]["caption"], "my entry");

    assert_eq!(world.post_count_of(alice).await, 1);
}

#[tokio::test]
async fn submit_new_without_media_is_400_and_creates_nothing() {
    let (world, alice, _bob, challenge_id) = seeded_world().await;
    let app = test_app(&world);
    let (body, content_type) = submit_new_form(false);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/submit/new/{challenge_id}"))
                .header(AUTHORIZATION, "Bearer token-alice")
                .header(CONTENT_TYPE, content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("media"));
    assert_eq!(world.post_count_of(alice).await, 0);
}

#[tokio::test]
async fn listing_and_owner_only_delete() {
    let (world, alice, _bob, challenge_id) = seeded_world().await;
    let post = world.post_svc.create(alice, post_draft()).await.unwrap();
    let view = world
        .submission_svc
        .submit_existing_post(challenge_id, alice, post.id)
        .await
        .unwrap();
    let app = test_app(&world);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/submit/get/{challenge_id}?page=1&limit=10"))
                .header(AUTHORIZATION, "Bearer token-bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    // bob did not create the submission, so he cannot delete it
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/submit/delete/{}", view.submission.id))
                .header(AUTHORIZATION, "Bearer token-bob")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/submit/delete/{}", view.submission.id))
                .header(AUTHORIZATION, "Bearer token-alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn submitting_without_a_token_is_401() {
    let (world, alice, _bob, challenge_id) = seeded_world().await;
    let post = world.post_svc.create(alice, post_draft()).await.unwrap();
    let app = test_app(&world);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/submit/existing/{challenge_id}"))
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(format!(r#"{{"postId":"{}"}}"#, post.id)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
