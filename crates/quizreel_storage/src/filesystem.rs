//! Filesystem storage backend.
//!
//! Writes the artifact to a temporary sibling of its final path and renames
//! it into place, so the deterministic final name only ever refers to a
//! complete file.

use crate::ArtifactStore;
use chrono::Utc;
use quizreel_core::{RenderedArtifact, StorageReceipt};
use quizreel_error::{QuizreelResult, StorageError, StorageErrorKind};
use std::path::PathBuf;

/// Filesystem storage backend.
///
/// Artifacts land at `{base_path}/{topic}_{timestamp}_{short-hash}.mp4`.
/// The key derives from the artifact's creation time and content hash, so
/// repeating a store of the same artifact overwrites its own file rather
/// than accumulating copies.
pub struct FileSystemStore {
    base_path: PathBuf,
}

impl FileSystemStore {
    /// Create a new filesystem store, creating the base directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the directory cannot be created.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> QuizreelResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Opened filesystem store");
        Ok(Self { base_path })
    }

    /// Final path for an artifact's deterministic key.
    pub fn destination(&self, artifact: &RenderedArtifact) -> PathBuf {
        self.base_path.join(artifact.storage_key())
    }
}

#[async_trait::async_trait]
impl ArtifactStore for FileSystemStore {
    #[tracing::instrument(skip(self, artifact), fields(size = artifact.bytes.len(), topic = %artifact.topic_slug))]
    async fn store(&self, artifact: &RenderedArtifact) -> QuizreelResult<StorageReceipt> {
        let path = self.destination(artifact);

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("mp4.tmp");
        tokio::fs::write(&temp_path, &artifact.bytes).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::Rename(format!(
                "{} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::info!(
            path = %path.display(),
            size = artifact.bytes.len(),
            duration_secs = artifact.duration_secs,
            "Stored rendered video"
        );

        Ok(StorageReceipt {
            backend: self.backend_name().to_string(),
            location: path.to_string_lossy().to_string(),
            stored_at: Utc::now(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
