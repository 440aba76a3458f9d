//! Rendered artifact and storage receipt types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The final rendered video of one pipeline run.
///
/// Created atomically by the assembler: either the whole artifact exists in
/// memory with its checksum, or assembly failed and nothing was written to a
/// final location. Owned transiently until handed to the artifact store.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedArtifact {
    /// Encoded video payload
    pub bytes: Vec<u8>,
    /// Video duration in seconds
    pub duration_secs: f64,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Output frame rate
    pub fps: u32,
    /// SHA-256 checksum of the payload, lowercase hex
    pub checksum: String,
    /// Topic slug the artifact was generated for
    pub topic_slug: String,
    /// Creation timestamp; storage keys derive from this, so storing the
    /// same artifact twice is idempotent
    pub created_at: DateTime<Utc>,
}

impl RenderedArtifact {
    /// Deterministic storage key: `{topic}_{timestamp}_{short-hash}.mp4`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use quizreel_core::RenderedArtifact;
    ///
    /// let artifact = RenderedArtifact {
    ///     bytes: vec![0u8; 4],
    ///     duration_secs: 14.5,
    ///     width: 1080,
    ///     height: 1920,
    ///     fps: 30,
    ///     checksum: "deadbeefcafe0123".repeat(4),
    ///     topic_slug: "history".to_string(),
    ///     created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    /// };
    /// assert_eq!(artifact.storage_key(), "history_20260301T120000Z_deadbeefcafe.mp4");
    /// ```
    pub fn storage_key(&self) -> String {
        format!(
            "{}_{}_{}.mp4",
            self.topic_slug,
            self.created_at.format("%Y%m%dT%H%M%SZ"),
            &self.checksum[..12.min(self.checksum.len())]
        )
    }
}

/// Terminal record of a successful run: where the artifact ended up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageReceipt {
    /// Backend that accepted the write (e.g. "filesystem", "http")
    pub backend: String,
    /// Final location: absolute path or URL
    pub location: String,
    /// When the write was acknowledged
    pub stored_at: DateTime<Utc>,
}
