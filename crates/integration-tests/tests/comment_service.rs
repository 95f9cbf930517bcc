//! Comment counter synchronization over the in-memory backend.

use domains::{MediaKind, Page, PostDraft, PostRepo, Visibility};
use integration_tests::World;
use services::ServiceError;

fn draft() -> PostDraft {
    PostDraft {
        media: "pic".into(),
        media_kind: MediaKind::Image,
        caption: None,
        tags: Vec::new(),
        visibility: Visibility::Public,
    }
}

#[tokio::test]
async fn comment_create_and_delete_keep_the_post_counter_in_sync() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;

    let post = world.post_svc.create(alice, draft()).await.unwrap();

    let comment = world
        .comment_svc
        .create(post.id, bob, "great light".into())
        .await
        .unwrap();
    let stored = world.posts.get_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.comment_count, 1);
    assert_eq!(stored.commented_by, vec![bob]);

    // Only the comment's author may remove it.
    let err = world
        .comment_svc
        .delete(alice, comment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    world.comment_svc.delete(bob, comment.id).await.unwrap();
    let stored = world.posts.get_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.comment_count, 0);
    assert!(stored.commented_by.is_empty());
}

#[tokio::test]
async fn comments_list_newest_first_with_author_previews() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;

    let post = world.post_svc.create(alice, draft()).await.unwrap();
    world
        .comment_svc
        .create(post.id, alice, "first".into())
        .await
        .unwrap();
    world
        .comment_svc
        .create(post.id, bob, "second".into())
        .await
        .unwrap();

    let comments = world
        .comment_svc
        .for_post(post.id, Page::default())
        .await
        .unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].comment.text, "second");
    assert_eq!(comments[0].author.as_ref().unwrap().username, "bob");
    assert_eq!(comments[1].comment.text, "first");
}

#[tokio::test]
async fn comment_likes_follow_the_same_strict_rules_as_post_likes() {
    let world = World::new();
    let alice = world.seed_user("alice").await;
    let bob = world.seed_user("bob").await;

    let post = world.post_svc.create(alice, draft()).await.unwrap();
    let comment = world
        .comment_svc
        .create(post.id, alice, "hot take".into())
        .await
        .unwrap();

    world.comment_svc.like(comment.id, bob).await.unwrap();
    let err = world.comment_svc.like(comment.id, bob).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    world.comment_svc.unlike(comment.id, bob).await.unwrap();
    let err = world.comment_svc.unlike(comment.id, bob).await.unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}
