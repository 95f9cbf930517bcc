use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use domains::{Comment, CommentRepo, StoreResult};

/// In-memory comments keyed by id.
#[derive(Default)]
pub struct MemoryCommentRepo {
    comments: DashMap<Uuid, Comment>,
}

impl MemoryCommentRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentRepo for MemoryCommentRepo {
    async fn create(&self, comment: Comment) -> StoreResult<()> {
        self.comments.insert(comment.id, comment);
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(self.comments.get(&id).map(|c| c.clone()))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.comments.remove(&id).is_some())
    }

    async fn list_for_post(
        &self,
        post_id: Uuid,
        skip: u64,
        limit: u64,
    ) -> StoreResult<Vec<Comment>> {
        let mut rows: Vec<Comment> = self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .map(|c| c.clone())
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn like(&self, comment_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        match self.comments.get_mut(&comment_id) {
            Some(mut comment) => {
                if comment.liked_by.contains(&user_id) {
                    return Ok(false);
                }
                comment.liked_by.push(user_id);
                comment.like_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn unlike(&self, comment_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        match self.comments.get_mut(&comment_id) {
            Some(mut comment) => {
                let before = comment.liked_by.len();
                comment.liked_by.retain(|id| *id != user_id);
                if comment.liked_by.len() == before {
                    return Ok(false);
                }
                comment.like_count -= 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
