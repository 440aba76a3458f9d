//! Storage trait definition and backend selection.

use crate::{FileSystemStore, HttpObjectStore};
use quizreel_core::{RenderedArtifact, StorageBackend, StorageConfig, StorageReceipt};
use quizreel_error::{QuizreelResult, StorageError, StorageErrorKind};

/// Trait for pluggable artifact storage backends.
///
/// Implementations persist the rendered video under the artifact's
/// deterministic key ([`RenderedArtifact::storage_key`]) and return a
/// receipt naming the final location. Storing the same artifact twice must
/// resolve to the same key and overwrite deterministically.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Persist the artifact durably and return where it ended up.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the write fails; the artifact itself is
    /// untouched and the call may be retried.
    async fn store(&self, artifact: &RenderedArtifact) -> QuizreelResult<StorageReceipt>;

    /// Backend name recorded in the receipt (e.g. "filesystem", "http").
    fn backend_name(&self) -> &'static str;
}

/// Construct the configured storage backend.
///
/// # Errors
///
/// Returns `StorageError` when the local directory cannot be prepared or
/// the remote section is missing for a remote selection.
pub fn artifact_store_from_config(config: &StorageConfig) -> QuizreelResult<Box<dyn ArtifactStore>> {
    match config.backend {
        StorageBackend::Local => Ok(Box::new(FileSystemStore::new(&config.local_path)?)),
        StorageBackend::Remote => {
            let remote = config.remote.as_ref().ok_or_else(|| {
                StorageError::new(StorageErrorKind::InvalidConfig(
                    "remote backend selected without [storage.remote] settings".to_string(),
                ))
            })?;
            Ok(Box::new(HttpObjectStore::new(remote)?))
        }
    }
}
