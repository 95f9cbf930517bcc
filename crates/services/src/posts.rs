//! # PostService
//!
//! Post CRUD, the public feed and the like/unlike rules. The author's
//! denormalized `post_count` is kept in sync here: every mutation goes
//! through `UserRepo::bump_post_count`, nowhere else.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use domains::{Page, Post, PostDraft, PostPatch, PostRepo, PostView, UserRepo};

use crate::error::{ServiceError, ServiceResult};

pub struct PostService {
    posts: Arc<dyn PostRepo>,
    users: Arc<dyn UserRepo>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepo>, users: Arc<dyn UserRepo>) -> Self {
        Self { posts, users }
    }

    pub async fn create(&self, author_id: Uuid, draft: PostDraft) -> ServiceResult<Post> {
        if draft.media.trim().is_empty() {
            return Err(ServiceError::InvalidArgument(
                "post must contain media".into(),
            ));
        }

        let post = Post::new(author_id, draft);
        self.posts.create(post.clone()).await?;
        self.users.bump_post_count(author_id, 1).await?;
        debug!(post_id = %post.id, "post created");
        Ok(post)
    }

    pub async fn edit(
        &self,
        caller_id: Uuid,
        post_id: Uuid,
        patch: PostPatch,
    ) -> ServiceResult<Post> {
        let post = self.require(post_id).await?;
        if post.author_id != caller_id {
            return Err(ServiceError::Forbidden(
                "you are not allowed to edit this post".into(),
            ));
        }
        self.posts
            .update(post_id, patch)
            .await?
            .ok_or(ServiceError::NotFound("post"))
    }

    pub async fn delete(&self, caller_id: Uuid, post_id: Uuid) -> ServiceResult<()> {
        let post = self.require(post_id).await?;
        if post.author_id != caller_id {
            return Err(ServiceError::Forbidden(
                "you are not allowed to delete this post".into(),
            ));
        }
        self.posts.delete(post_id).await?;
        self.users.bump_post_count(caller_id, -1).await?;
        Ok(())
    }

    /// Public posts, newest first, with author previews.
    pub async fn feed(&self, page: Page) -> ServiceResult<Vec<PostView>> {
        let rows = self
            .posts
            .public_feed(page.skip(), u64::from(page.limit))
            .await?;
        self.enrich(rows).await
    }

    pub async fn by_user(&self, user_id: Uuid, page: Page) -> ServiceResult<Vec<Post>> {
        Ok(self
            .posts
            .by_author(user_id, page.skip(), u64::from(page.limit))
            .await?)
    }

    /// Liking twice is rejected, not silently ignored.
    pub async fn like(&self, post_id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        let post = self.require(post_id).await?;
        if post.liked_by.contains(&user_id) {
            return Err(ServiceError::Conflict(
                "you have already liked this post".into(),
            ));
        }
        // The storage update is conditional on the same rule, so two racing
        // likes cannot both land.
        if !self.posts.like(post_id, user_id).await? {
            return Err(ServiceError::Conflict(
                "you have already liked this post".into(),
            ));
        }
        Ok(())
    }

    /// Unliking without a prior like is rejected, not a silent no-op.
    pub async fn unlike(&self, post_id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        let post = self.require(post_id).await?;
        if !post.liked_by.contains(&user_id) {
            return Err(ServiceError::Conflict(
                "you have not liked this post".into(),
            ));
        }
        if !self.posts.unlike(post_id, user_id).await? {
            return Err(ServiceError::Conflict(
                "you have not liked this post".into(),
            ));
        }
        Ok(())
    }

    async fn require(&self, post_id: Uuid) -> ServiceResult<Post> {
        self.posts
            .get_by_id(post_id)
            .await?
            .ok_or(ServiceError::NotFound("post"))
    }

    async fn enrich(&self, rows: Vec<Post>) -> ServiceResult<Vec<PostView>> {
        let ids: Vec<Uuid> = rows.iter().map(|p| p.author_id).collect();
        let previews = self.users.get_previews(&ids).await?;
        Ok(rows
            .into_iter()
            .map(|post| {
                let author = previews.iter().find(|u| u.id == post.author_id).cloned();
                PostView { post, author }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MediaKind, MockPostRepo, MockUserRepo, Visibility};

    fn service(posts: MockPostRepo, users: MockUserRepo) -> PostService {
        PostService::new(Arc::new(posts), Arc::new(users))
    }

    fn draft() -> PostDraft {
        PostDraft {
            media: "a1b2c3".into(),
            media_kind: MediaKind::Image,
            caption: Some("first light".into()),
            tags: vec!["sunrise".into()],
            visibility: Visibility::Public,
        }
    }

    fn stored_post(author: Uuid) -> Post {
        Post::new(author, draft())
    }

    #[tokio::test]
    async fn create_requires_media() {
        let svc = service(MockPostRepo::new(), MockUserRepo::new());
        let mut empty = draft();
        empty.media = String::new();
        let err = svc.create(Uuid::now_v7(), empty).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(msg) if msg.contains("media")));
    }

    #[tokio::test]
    async fn create_bumps_author_post_count() {
        let author = Uuid::now_v7();
        let mut posts = MockPostRepo::new();
        posts.expect_create().once().returning(|_| Ok(()));
        let mut users = MockUserRepo::new();
        users
            .expect_bump_post_count()
            .withf(move |id, delta| *id == author && *delta == 1)
            .once()
            .returning(|_, _| Ok(()));

        let svc = service(posts, users);
        let post = svc.create(author, draft()).await.unwrap();
        assert_eq!(post.author_id, author);
    }

    #[tokio::test]
    async fn delete_by_non_author_is_forbidden() {
        let author = Uuid::now_v7();
        let stored = stored_post(author);
        let id = stored.id;

        let mut posts = MockPostRepo::new();
        posts
            .expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let svc = service(posts, MockUserRepo::new());

        let err = svc.delete(Uuid::now_v7(), id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn delete_decrements_author_post_count() {
        let author = Uuid::now_v7();
        let stored = stored_post(author);
        let id = stored.id;

        let mut posts = MockPostRepo::new();
        posts
            .expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        posts.expect_delete().once().returning(|_| Ok(true));
        let mut users = MockUserRepo::new();
        users
            .expect_bump_post_count()
            .withf(move |id, delta| *id == author && *delta == -1)
            .once()
            .returning(|_, _| Ok(()));

        let svc = service(posts, users);
        svc.delete(author, id).await.unwrap();
    }

    #[tokio::test]
    async fn double_like_is_rejected() {
        let author = Uuid::now_v7();
        let liker = Uuid::now_v7();
        let mut stored = stored_post(author);
        stored.liked_by.push(liker);
        stored.like_count = 1;
        let id = stored.id;

        let mut posts = MockPostRepo::new();
        posts
            .expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let svc = service(posts, MockUserRepo::new());

        let err = svc.like(id, liker).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn unlike_without_like_is_rejected() {
        let author = Uuid::now_v7();
        let stored = stored_post(author);
        let id = stored.id;

        let mut posts = MockPostRepo::new();
        posts
            .expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        let svc = service(posts, MockUserRepo::new());

        let err = svc.unlike(id, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn like_race_lost_at_storage_is_still_a_conflict() {
        let author = Uuid::now_v7();
        let stored = stored_post(author);
        let id = stored.id;

        let mut posts = MockPostRepo::new();
        posts
            .expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        // Another request won the race between the read and the update.
        posts.expect_like().returning(|_, _| Ok(false));
        let svc = service(posts, MockUserRepo::new());

        let err = svc.like(id, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
