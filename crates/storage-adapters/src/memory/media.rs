use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use sha2::{Digest, Sha256};

use domains::{MediaStore, StoreResult};

/// Content-addressable in-memory media store for tests and the dev
/// profile. Same hashing scheme as `LocalMediaStore`, no filesystem.
#[derive(Default)]
pub struct MemoryMediaStore {
    blobs: DashMap<String, Vec<u8>>,
}

impl MemoryMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, media_id: &str) -> bool {
        self.blobs.contains_key(media_id)
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn save(&self, data: Bytes, _content_type: &str) -> StoreResult<String> {
        let mut hasher = Sha256::new();
        hasher.update(&data);
        let hash = hex::encode(hasher.finalize());
        self.blobs.insert(hash.clone(), data.to_vec());
        Ok(hash)
    }

    async fn url(&self, media_id: &str) -> String {
        format!("/media/{media_id}")
    }

    async fn thumbnail_url(&self, media_id: &str) -> String {
        format!("/media/thumb_{media_id}.webp")
    }
}
