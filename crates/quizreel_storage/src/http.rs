//! HTTP object storage backend.
//!
//! A single PUT per artifact; success requires the upstream's acknowledged
//! 2xx response, which is the durability boundary for remote writes.

use crate::ArtifactStore;
use chrono::Utc;
use quizreel_core::{RemoteStorageConfig, RenderedArtifact, StorageReceipt};
use quizreel_error::{QuizreelResult, StorageError, StorageErrorKind};

/// HTTP object storage backend (S3-compatible PUT semantics).
pub struct HttpObjectStore {
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
    auth_token: Option<String>,
}

impl HttpObjectStore {
    /// Create a store from remote storage settings.
    ///
    /// The bearer token, when configured, is read from the environment
    /// variable named by `auth_token_env`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the named token variable is unset or the
    /// HTTP client cannot be constructed.
    #[tracing::instrument(skip(config), fields(endpoint = %config.endpoint, bucket = %config.bucket))]
    pub fn new(config: &RemoteStorageConfig) -> QuizreelResult<Self> {
        let auth_token = match &config.auth_token_env {
            Some(var) => Some(std::env::var(var).map_err(|_| {
                StorageError::new(StorageErrorKind::InvalidConfig(format!(
                    "auth token variable {} is not set",
                    var
                )))
            })?),
            None => None,
        };

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                StorageError::new(StorageErrorKind::InvalidConfig(format!(
                    "http client: {}",
                    e
                )))
            })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            auth_token,
        })
    }

    /// Object URL for an artifact's deterministic key.
    pub fn object_url(&self, artifact: &RenderedArtifact) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, artifact.storage_key())
    }
}

#[async_trait::async_trait]
impl ArtifactStore for HttpObjectStore {
    #[tracing::instrument(skip(self, artifact), fields(size = artifact.bytes.len(), topic = %artifact.topic_slug))]
    async fn store(&self, artifact: &RenderedArtifact) -> QuizreelResult<StorageReceipt> {
        let url = self.object_url(artifact);

        let mut request = self
            .http
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "video/mp4")
            .body(artifact.bytes.clone());

        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            StorageError::new(StorageErrorKind::RemoteWrite {
                status: 0,
                message: e.to_string(),
            })
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let tail: String = body.chars().take(200).collect();
            return Err(StorageError::new(StorageErrorKind::RemoteWrite {
                status: status.as_u16(),
                message: tail,
            })
            .into());
        }

        tracing::info!(url = %url, size = artifact.bytes.len(), "Remote write acknowledged");

        Ok(StorageReceipt {
            backend: self.backend_name().to_string(),
            location: url,
            stored_at: Utc::now(),
        })
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn artifact() -> RenderedArtifact {
        RenderedArtifact {
            bytes: vec![0u8; 8],
            duration_secs: 10.0,
            width: 1080,
            height: 1920,
            fps: 30,
            checksum: "abcdef0123456789".repeat(4),
            topic_slug: "science".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn object_url_joins_endpoint_bucket_and_key() {
        let store = HttpObjectStore::new(&RemoteStorageConfig {
            endpoint: "https://storage.example.com/".to_string(),
            bucket: "videos".to_string(),
            auth_token_env: None,
            timeout_secs: 30,
        })
        .unwrap();

        let url = store.object_url(&artifact());
        assert_eq!(
            url,
            "https://storage.example.com/videos/science_20260301T120000Z_abcdef012345.mp4"
        );
    }

    #[test]
    fn missing_token_variable_is_config_error() {
        let result = HttpObjectStore::new(&RemoteStorageConfig {
            endpoint: "https://storage.example.com".to_string(),
            bucket: "videos".to_string(),
            auth_token_env: Some("QUIZREEL_TEST_TOKEN_THAT_IS_NOT_SET".to_string()),
            timeout_secs: 30,
        });
        assert!(result.is_err());
    }
}
