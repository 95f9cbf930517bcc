//! # CommentService
//!
//! Comments on posts. The post's denormalized `comment_count` and
//! `commented_by` set move in lockstep with comment rows here.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use domains::{Comment, CommentRepo, CommentView, Page, PostRepo, UserRepo};

use crate::error::{ServiceError, ServiceResult};

pub struct CommentService {
    comments: Arc<dyn CommentRepo>,
    posts: Arc<dyn PostRepo>,
    users: Arc<dyn UserRepo>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepo>,
        posts: Arc<dyn PostRepo>,
        users: Arc<dyn UserRepo>,
    ) -> Self {
        Self {
            comments,
            posts,
            users,
        }
    }

    pub async fn create(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> ServiceResult<Comment> {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "comment text is required".into(),
            ));
        }
        self.posts
            .get_by_id(post_id)
            .await?
            .ok_or(ServiceError::NotFound("post"))?;

        let comment = Comment::new(post_id, author_id, text);
        self.comments.create(comment.clone()).await?;
        self.posts.add_commenter(post_id, author_id).await?;
        Ok(comment)
    }

    pub async fn delete(&self, caller_id: Uuid, comment_id: Uuid) -> ServiceResult<()> {
        let comment = self.require(comment_id).await?;
        if comment.author_id != caller_id {
            return Err(ServiceError::Forbidden(
                "you can only delete your own comments".into(),
            ));
        }
        self.comments.delete(comment_id).await?;
        self.posts
            .remove_commenter(comment.post_id, caller_id)
            .await?;
        Ok(())
    }

    pub async fn like(&self, comment_id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        let comment = self.require(comment_id).await?;
        if comment.liked_by.contains(&user_id) {
            return Err(ServiceError::Conflict(
                "you have already liked this comment".into(),
            ));
        }
        if !self.comments.like(comment_id, user_id).await? {
            return Err(ServiceError::Conflict(
                "you have already liked this comment".into(),
            ));
        }
        Ok(())
    }

    pub async fn unlike(&self, comment_id: Uuid, user_id: Uuid) -> ServiceResult<()> {
        let comment = self.require(comment_id).await?;
        if !comment.liked_by.contains(&user_id) {
            return Err(ServiceError::Conflict(
                "you have not liked this comment".into(),
            ));
        }
        if !self.comments.unlike(comment_id, user_id).await? {
            return Err(ServiceError::Conflict(
                "you have not liked this comment".into(),
            ));
        }
        Ok(())
    }

    /// Comments on a post, newest first, with author previews.
    pub async fn for_post(&self, post_id: Uuid, page: Page) -> ServiceResult<Vec<CommentView>> {
        let rows = self
            .comments
            .list_for_post(post_id, page.skip(), u64::from(page.limit))
            .await?;
        let author_ids: Vec<Uuid> = rows.iter().map(|c| c.author_id).collect();
        let previews: HashMap<Uuid, _> = self
            .users
            .get_previews(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();
        Ok(rows
            .into_iter()
            .map(|comment| {
                let author = previews.get(&comment.author_id).cloned();
                CommentView { comment, author }
            })
            .collect())
    }

    async fn require(&self, comment_id: Uuid) -> ServiceResult<Comment> {
        self.comments
            .get_by_id(comment_id)
            .await?
            .ok_or(ServiceError::NotFound("comment"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{
        MediaKind, MockCommentRepo, MockPostRepo, MockUserRepo, Post, PostDraft, Visibility,
    };

    fn service(
        comments: MockCommentRepo,
        posts: MockPostRepo,
        users: MockUserRepo,
    ) -> CommentService {
        CommentService::new(Arc::new(comments), Arc::new(posts), Arc::new(users))
    }

    fn stored_post(author: Uuid) -> Post {
        Post::new(
            author,
            PostDraft {
                media: "cafe".into(),
                media_kind: MediaKind::Image,
                caption: None,
                tags: Vec::new(),
                visibility: Visibility::Public,
            },
        )
    }

    #[tokio::test]
    async fn create_rejects_blank_text() {
        let svc = service(MockCommentRepo::new(), MockPostRepo::new(), MockUserRepo::new());
        let err = svc
            .create(Uuid::now_v7(), Uuid::now_v7(), "   ".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn create_marks_commenter_on_post() {
        let author = Uuid::now_v7();
        let post = stored_post(Uuid::now_v7());
        let post_id = post.id;

        let mut posts = MockPostRepo::new();
        posts
            .expect_get_by_id()
            .returning(move |_| Ok(Some(post.clone())));
        posts
            .expect_add_commenter()
            .withf(move |p, u| *p == post_id && *u == author)
            .once()
            .returning(|_, _| Ok(()));
        let mut comments = MockCommentRepo::new();
        comments.expect_create().once().returning(|_| Ok(()));

        let svc = service(comments, posts, MockUserRepo::new());
        let comment = svc.create(post_id, author, "nice framing".into()).await.unwrap();
        assert_eq!(comment.text, "nice framing");
    }

    #[tokio::test]
    async fn delete_by_non_author_is_forbidden() {
        let comment = Comment::new(Uuid::now_v7(), Uuid::now_v7(), "mine".into());
        let id = comment.id;

        let mut comments = MockCommentRepo::new();
        comments
            .expect_get_by_id()
            .returning(move |_| Ok(Some(comment.clone())));
        let svc = service(comments, MockPostRepo::new(), MockUserRepo::new());

        let err = svc.delete(Uuid::now_v7(), id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn double_like_is_rejected() {
        let liker = Uuid::now_v7();
        let mut comment = Comment::new(Uuid::now_v7(), Uuid::now_v7(), "hot take".into());
        comment.liked_by.push(liker);
        comment.like_count = 1;
        let id = comment.id;

        let mut comments = MockCommentRepo::new();
        comments
            .expect_get_by_id()
            .returning(move |_| Ok(Some(comment.clone())));
        let svc = service(comments, MockPostRepo::new(), MockUserRepo::new());

        let err = svc.like(id, liker).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
