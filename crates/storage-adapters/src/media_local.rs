//! # LocalMediaStore
//!
//! Local filesystem implementation of `MediaStore`.
//! Content-addressable storage with directory sharding and thumbnailing:
//! identical uploads deduplicate to one file.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use image::ImageReader;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::warn;

use domains::{MediaStore, StoreError, StoreResult};

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/static/uploads")
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root_path: root,
            url_prefix,
        }
    }

    /// Generates a sharded path: "ab/cd/ef...hash"
    fn sharded_path(&self, hash: &str) -> PathBuf {
        let mut path = self.root_path.clone();
        path.push(&hash[0..2]);
        path.push(&hash[2..4]);
        path.push(hash);
        path
    }

    /// Renders a 250px WebP thumbnail next to the original.
    async fn generate_thumbnail(&self, source_path: &Path, hash: &str) -> StoreResult<()> {
        let data = fs::read(source_path)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let img = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| StoreError::Backend(e.to_string()))?
            .decode()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let thumb = img.thumbnail(250, 250);
        let mut thumb_path = source_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root_path.clone());
        thumb_path.push(format!("thumb_{hash}.webp"));
        thumb
            .save_with_format(thumb_path, image::ImageFormat::WebP)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    /// Saves an upload using its SHA-256 hash as the filename.
    async fn save(&self, data: Bytes, content_type: &str) -> StoreResult<String> {
        let mut hasher = Sha256::new();
        hasher.update(&data);
        let hash = hex::encode(hasher.finalize());

        let target_path = self.sharded_path(&hash);
        let parent = target_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root_path.clone());

        fs::create_dir_all(&parent)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if !target_path.exists() {
            fs::write(&target_path, &data)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;

            // Videos are stored as-is; only images get a thumbnail.
            if content_type.starts_with("image/") {
                if let Err(err) = self.generate_thumbnail(&target_path, &hash).await {
                    // An undecodable upload still serves the original.
                    warn!(%hash, error = %err, "thumbnail generation failed");
                }
            }
        }

        Ok(hash)
    }

    async fn url(&self, media_id: &str) -> String {
        let rel_path = format!("{}/{}/{}", &media_id[0..2], &media_id[2..4], media_id);
        format!("{}/{}", self.url_prefix, rel_path)
    }

    async fn thumbnail_url(&self, media_id: &str) -> String {
        let rel_path = format!(
            "{}/{}/thumb_{}.webp",
            &media_id[0..2],
            &media_id[2..4],
            media_id
        );
        format!("{}/{}", self.url_prefix, rel_path)
    }
}
