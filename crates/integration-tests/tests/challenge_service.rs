//! Challenge lifecycle over the in-memory backend.

use chrono::{Duration, Utc};

use domains::{ChallengeDraft, ChallengePatch, ChallengeRepo, ChallengeStatus, Page};
use integration_tests::World;
use services::ServiceError;

fn draft(title: &str, hours_from_now: i64) -> ChallengeDraft {
    ChallengeDraft {
        title: title.to_string(),
        description: "a week-long theme".into(),
        media: None,
        ends_at: Utc::now() + Duration::hours(hours_from_now),
    }
}

#[tokio::test]
async fn create_with_past_deadline_is_rejected() {
    let world = World::new();
    let alice = world.seed_user("alice").await;

    let err = world
        .challenge_svc
        .create(alice, draft("too late", -24))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(msg) if msg.contains("future")));
}

#[tokio::test]
async fn owner_can_edit_and_delete() {
    let world = World::new();
    let alice = world.seed_user("alice").await;

    let challenge = world
        .challenge_svc
        .create(alice, draft("golden hour", 24))
        .await
        .unwrap();

    let updated = world
        .challenge_svc
        .edit(
            alice,
            challenge.id,
            ChallengePatch {
                title: Some("blue hour".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "blue hour");

    world.challenge_svc.delete(alice, challenge.id).await.unwrap();
    assert!(world
        .challenges
        .get_by_id(challenge.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn non_owner_cannot_edit_or_delete() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;

    let challenge = world
        .challenge_svc
        .create(alice, draft("golden hour", 24))
        .await
        .unwrap();

    let err = world
        .challenge_svc
        .edit(bob, challenge.id, ChallengePatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let err = world
        .challenge_svc
        .delete(bob, challenge.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
}

#[tokio::test]
async fn owner_can_delete_an_expired_challenge() {
    let world = World::new();
    let alice = world.seed_user("alice").await;

    let challenge = world
        .challenge_svc
        .create(alice, draft("over", 24))
        .await
        .unwrap();
    world
        .challenges
        .update(
            challenge.id,
            ChallengePatch {
                ends_at: Some(Utc::now() - Duration::hours(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // No expiry restriction on delete, unlike edit.
    world.challenge_svc.delete(alice, challenge.id).await.unwrap();
}

#[tokio::test]
async fn get_closes_an_expired_challenge() {
    let world = World::new();
    let alice = world.seed_user("alice").await;

    let challenge = world
        .challenge_svc
        .create(alice, draft("over", 24))
        .await
        .unwrap();
    world
        .challenges
        .update(
            challenge.id,
            ChallengePatch {
                ends_at: Some(Utc::now() - Duration::hours(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let view = world.challenge_svc.get(challenge.id).await.unwrap();
    assert_eq!(view.challenge.status, ChallengeStatus::Closed);

    let stored = world
        .challenges
        .get_by_id(challenge.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, ChallengeStatus::Closed);
}

#[tokio::test]
async fn list_is_newest_first_and_paginated() {
    let world = World::new();
    let alice = world.seed_user("alice").await;

    let _oldest = world
        .challenge_svc
        .create(alice, draft("first", 24))
        .await
        .unwrap();
    let middle = world
        .challenge_svc
        .create(alice, draft("second", 24))
        .await
        .unwrap();
    let newest = world
        .challenge_svc
        .create(alice, draft("third", 24))
        .await
        .unwrap();

    let page = world.challenge_svc.list(Page::new(1, 2)).await.unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].challenge.id, newest.id);
    assert_eq!(page[1].challenge.id, middle.id);
    assert_eq!(page[0].challenger.as_ref().unwrap().username, "alice");

    let rest = world.challenge_svc.list(Page::new(2, 2)).await.unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].challenge.title, "first");
}

#[tokio::test]
async fn delete_all_mine_only_touches_the_callers_challenges() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;

    world
        .challenge_svc
        .create(alice, draft("a1", 24))
        .await
        .unwrap();
    world
        .challenge_svc
        .create(alice, draft("a2", 24))
        .await
        .unwrap();
    world
        .challenge_svc
        .create(bob, draft("b1", 24))
        .await
        .unwrap();

    let deleted = world.challenge_svc.delete_all_mine(alice).await.unwrap();
    assert_eq!(deleted, 2);

    let remaining = world.challenge_svc.list(Page::default()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].challenge.title, "b1");
}
