use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use domains::{Post, PostPatch, PostRepo, StoreResult, Visibility};

/// In-memory posts keyed by id. Like/unlike mutate under the shard lock
/// held by `get_mut`, so the set+counter pair moves atomically.
#[derive(Default)]
pub struct MemoryPostRepo {
    posts: DashMap<Uuid, Post>,
}

impl MemoryPostRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn visible(post: &Post) -> bool {
        !post.is_deleted
    }

    fn newest_first(mut rows: Vec<Post>) -> Vec<Post> {
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows
    }
}

#[async_trait]
impl PostRepo for MemoryPostRepo {
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Option<Post>> {
        Ok(self
            .posts
            .get(&id)
            .filter(|p| Self::visible(p))
            .map(|p| p.clone()))
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Post>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.posts.get(id))
            .filter(|p| Self::visible(p))
            .map(|p| p.clone())
            .collect())
    }

    async fn create(&self, post: Post) -> StoreResult<()> {
        self.posts.insert(post.id, post);
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: PostPatch) -> StoreResult<Option<Post>> {
        match self.posts.get_mut(&id) {
            Some(mut post) if Self::visible(&post) => {
                if let Some(caption) = patch.caption {
                    post.caption = Some(caption);
                }
                if let Some(tags) = patch.tags {
                    post.tags = tags;
                }
                if let Some(visibility) = patch.visibility {
                    post.visibility = visibility;
                }
                Ok(Some(post.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.posts.remove(&id).is_some())
    }

    async fn public_feed(&self, skip: u64, limit: u64) -> StoreResult<Vec<Post>> {
        let rows: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| Self::visible(p) && p.visibility == Visibility::Public)
            .map(|p| p.clone())
            .collect();
        Ok(Self::newest_first(rows)
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn by_author(&self, author_id: Uuid, skip: u64, limit: u64) -> StoreResult<Vec<Post>> {
        let rows: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| Self::visible(p) && p.author_id == author_id)
            .map(|p| p.clone())
            .collect();
        Ok(Self::newest_first(rows)
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect())
    }

    async fn like(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        match self.posts.get_mut(&post_id) {
            Some(mut post) if Self::visible(&post) => {
                if post.liked_by.contains(&user_id) {
                    return Ok(false);
                }
                post.liked_by.push(user_id);
                post.like_count += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn unlike(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        match self.posts.get_mut(&post_id) {
            Some(mut post) if Self::visible(&post) => {
                let before = post.liked_by.len();
                post.liked_by.retain(|id| *id != user_id);
                if post.liked_by.len() == before {
                    return Ok(false);
                }
                post.like_count -= 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn add_commenter(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        if let Some(mut post) = self.posts.get_mut(&post_id) {
            post.comment_count += 1;
            if !post.commented_by.contains(&user_id) {
                post.commented_by.push(user_id);
            }
        }
        Ok(())
    }

    async fn remove_commenter(&self, post_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        if let Some(mut post) = self.posts.get_mut(&post_id) {
            post.comment_count -= 1;
            post.commented_by.retain(|id| *id != user_id);
        }
        Ok(())
    }

    async fn mark_challenge_submission(&self, post_id: Uuid) -> StoreResult<()> {
        if let Some(mut post) = self.posts.get_mut(&post_id) {
            post.is_challenge_submission = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{MediaKind, PostDraft};

    fn draft() -> PostDraft {
        PostDraft {
            media: "deadbeef".into(),
            media_kind: MediaKind::Image,
            caption: None,
            tags: Vec::new(),
            visibility: Visibility::Public,
        }
    }

    #[tokio::test]
    async fn like_set_never_holds_duplicates() {
        let repo = MemoryPostRepo::new();
        let post = Post::new(Uuid::now_v7(), draft());
        let post_id = post.id;
        let liker = Uuid::now_v7();
        repo.create(post).await.unwrap();

        assert!(repo.like(post_id, liker).await.unwrap());
        assert!(!repo.like(post_id, liker).await.unwrap());

        let stored = repo.get_by_id(post_id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, 1);
        assert_eq!(stored.liked_by, vec![liker]);
    }

    #[tokio::test]
    async fn unlike_without_like_changes_nothing() {
        let repo = MemoryPostRepo::new();
        let post = Post::new(Uuid::now_v7(), draft());
        let post_id = post.id;
        repo.create(post).await.unwrap();

        assert!(!repo.unlike(post_id, Uuid::now_v7()).await.unwrap());
        let stored = repo.get_by_id(post_id).await.unwrap().unwrap();
        assert_eq!(stored.like_count, 0);
    }

    #[tokio::test]
    async fn feed_is_public_only_and_newest_first() {
        let repo = MemoryPostRepo::new();
        let author = Uuid::now_v7();
        let older = Post::new(author, draft());
        let mut private = Post::new(author, draft());
        private.visibility = Visibility::Private;
        let newer = Post::new(author, draft());
        repo.create(older.clone()).await.unwrap();
        repo.create(private).await.unwrap();
        repo.create(newer.clone()).await.unwrap();

        let feed = repo.public_feed(0, 10).await.unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].id, newer.id);
        assert_eq!(feed[1].id, older.id);
    }
}
