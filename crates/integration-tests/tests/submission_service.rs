//! End-to-end submission workflow over the in-memory backend: the full
//! submit / duplicate / expiry / cascade-delete lifecycle with counter
//! verification.

use chrono::{Duration, Utc};
use uuid::Uuid;

use domains::{
    ChallengeDraft, ChallengeRepo, ChallengeStatus, MediaKind, Page, PostDraft, PostRepo,
    Visibility,
};
use integration_tests::World;
use services::ServiceError;

fn draft(media: &str) -> PostDraft {
    PostDraft {
        media: media.to_string(),
        media_kind: MediaKind::Image,
        caption: Some("entry".into()),
        tags: Vec::new(),
        visibility: Visibility::Public,
    }
}

fn challenge_draft(hours_from_now: i64) -> ChallengeDraft {
    ChallengeDraft {
        title: "golden hour".into(),
        description: "best sunset shot wins".into(),
        media: None,
        ends_at: Utc::now() + Duration::hours(hours_from_now),
    }
}

async fn submission_count(world: &World, challenge_id: Uuid) -> i64 {
    world
        .challenges
        .get_by_id(challenge_id)
        .await
        .unwrap()
        .unwrap()
        .submission_count
}

#[tokio::test]
async fn submit_then_duplicate_is_rejected() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;

    let challenge = world
        .challenge_svc
        .create(bob, challenge_draft(24))
        .await
        .unwrap();
    let first = world.post_svc.create(alice, draft("one")).await.unwrap();
    let second = world.post_svc.create(alice, draft("two")).await.unwrap();

    let view = world
        .submission_svc
        .submit_existing_post(challenge.id, alice, first.id)
        .await
        .unwrap();
    assert_eq!(view.post.id, first.id);
    assert_eq!(submission_count(&world, challenge.id).await, 1);

    let err = world
        .submission_svc
        .submit_existing_post(challenge.id, alice, second.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(submission_count(&world, challenge.id).await, 1);
}

#[tokio::test]
async fn submitting_a_foreign_post_is_forbidden() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;

    let challenge = world
        .challenge_svc
        .create(bob, challenge_draft(24))
        .await
        .unwrap();
    let bobs_post = world.post_svc.create(bob, draft("bobs")).await.unwrap();

    let err = world
        .submission_svc
        .submit_existing_post(challenge.id, alice, bobs_post.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn failed_create_and_submit_leaves_no_orphan_post() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;

    let challenge = world
        .challenge_svc
        .create(bob, challenge_draft(24))
        .await
        .unwrap();

    let err = world
        .submission_svc
        .create_post_and_submit(challenge.id, alice, draft(""))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(msg) if msg.contains("media")));

    assert!(world.posts.by_author(alice, 0, 10).await.unwrap().is_empty());
    assert_eq!(world.post_count_of(alice).await, 0);
    assert_eq!(submission_count(&world, challenge.id).await, 0);
}

#[tokio::test]
async fn create_and_submit_builds_a_flagged_post() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;

    let challenge = world
        .challenge_svc
        .create(bob, challenge_draft(24))
        .await
        .unwrap();
    let view = world
        .submission_svc
        .create_post_and_submit(challenge.id, alice, draft("fresh"))
        .await
        .unwrap();

    let post = world
        .posts
        .get_by_id(view.post.id)
        .await
        .unwrap()
        .unwrap();
    assert!(post.is_challenge_submission);
    assert_eq!(post.author_id, alice);
    assert_eq!(world.post_count_of(alice).await, 1);
    assert_eq!(submission_count(&world, challenge.id).await, 1);
}

#[tokio::test]
async fn deleting_a_created_submission_cascades_to_the_post() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;

    let challenge = world
        .challenge_svc
        .create(bob, challenge_draft(24))
        .await
        .unwrap();
    let view = world
        .submission_svc
        .create_post_and_submit(challenge.id, alice, draft("fresh"))
        .await
        .unwrap();
    assert_eq!(world.post_count_of(alice).await, 1);

    world
        .submission_svc
        .delete(view.submission.id, alice)
        .await
        .unwrap();

    assert!(world.posts.get_by_id(view.post.id).await.unwrap().is_none());
    assert_eq!(world.post_count_of(alice).await, 0);
    assert_eq!(submission_count(&world, challenge.id).await, 0);
}

#[tokio::test]
async fn deleting_a_reused_post_submission_keeps_the_post() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;

    let challenge = world
        .challenge_svc
        .create(bob, challenge_draft(24))
        .await
        .unwrap();
    let post = world.post_svc.create(alice, draft("old")).await.unwrap();
    assert_eq!(world.post_count_of(alice).await, 1);

    let view = world
        .submission_svc
        .submit_existing_post(challenge.id, alice, post.id)
        .await
        .unwrap();
    world
        .submission_svc
        .delete(view.submission.id, alice)
        .await
        .unwrap();

    // The post predates the submission and survives it.
    assert!(world.posts.get_by_id(post.id).await.unwrap().is_some());
    assert_eq!(world.post_count_of(alice).await, 1);
    assert_eq!(submission_count(&world, challenge.id).await, 0);
}

#[tokio::test]
async fn expired_challenge_rejects_and_transitions_to_closed() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;

    // Created open, then the deadline is moved into the past directly in
    // the store, simulating time passing.
    let challenge = world
        .challenge_svc
        .create(bob, challenge_draft(24))
        .await
        .unwrap();
    world
        .challenges
        .update(
            challenge.id,
            domains::ChallengePatch {
                ends_at: Some(Utc::now() - Duration::minutes(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let post = world.post_svc.create(alice, draft("late")).await.unwrap();
    let err = world
        .submission_svc
        .submit_existing_post(challenge.id, alice, post.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Expired));

    let stored = world
        .challenges
        .get_by_id(challenge.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ChallengeStatus::Closed);
}

#[tokio::test]
async fn listing_returns_newest_first_with_previews() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;
    let carol = world.seed_user("carol").await;

    let challenge = world
        .challenge_svc
        .create(carol, challenge_draft(24))
        .await
        .unwrap();

    let first = world
        .submission_svc
        .create_post_and_submit(challenge.id, alice, draft("a"))
        .await
        .unwrap();
    let second = world
        .submission_svc
        .create_post_and_submit(challenge.id, bob, draft("b"))
        .await
        .unwrap();

    let views = world
        .submission_svc
        .for_challenge(challenge.id, Page::default())
        .await
        .unwrap();
    assert_eq!(views.len(), 2);
    assert_eq!(views[0].submission.id, second.submission.id);
    assert_eq!(views[1].submission.id, first.submission.id);
    assert_eq!(views[0].submitter.as_ref().unwrap().username, "bob");
    assert_eq!(views[1].submitter.as_ref().unwrap().username, "alice");
}
