//! File storage service - uploaded media on disk
//!
//! Media lives under content-type buckets (`audio/`, `covers/`) below one
//! base directory. Records reference files by bucket-relative path; public
//! URLs are the same path under the `/storage` route.
use crate::error::{Result, ServerError};
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Bucket for uploaded audio files
pub const AUDIO_BUCKET: &str = "audio";

/// Bucket for uploaded cover images
pub const COVER_BUCKET: &str = "covers";

#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Initialize storage directories
    pub async fn initialize(&self) -> Result<()> {
        for bucket in &[AUDIO_BUCKET, COVER_BUCKET] {
            let dir = self.base_path.join(bucket);
            fs::create_dir_all(&dir).await?;
        }
        Ok(())
    }

    /// Store a blob in a bucket under a fresh name.
    ///
    /// Returns the bucket-relative path to persist in the referencing record.
    pub async fn store(&self, bucket: &str, extension: &str, data: &[u8]) -> Result<String> {
        let filename = format!("{}.{}", Uuid::new_v4(), sanitize_extension(extension));
        let path = self.base_path.join(bucket).join(&filename);

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&path, data).await?;
        Ok(format!("{}/{}", bucket, filename))
    }

    /// Whether a stored file still exists
    pub fn exists(&self, relative: &str) -> bool {
        self.resolve(relative).is_ok_and(|path| path.exists())
    }

    /// Delete a stored file. Deleting a path that is already gone is a no-op.
    pub async fn delete(&self, relative: &str) -> Result<()> {
        let path = self.resolve(relative)?;
        if path.exists() {
            fs::remove_file(&path).await?;
        }
        Ok(())
    }

    /// Root directory the buckets live under
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Validate a record-stored path before touching the filesystem
    /// (prevent directory traversal)
    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let rel = Path::new(relative);

        let traversal = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if rel.is_absolute() || traversal {
            return Err(ServerError::Storage(format!(
                "invalid storage path: {}",
                relative
            )));
        }

        Ok(self.base_path.join(rel))
    }
}

fn sanitize_extension(extension: &str) -> String {
    let cleaned: String = extension
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(8)
        .collect();

    if cleaned.is_empty() {
        "bin".to_string()
    } else {
        cleaned.to_ascii_lowercase()
    }
}
