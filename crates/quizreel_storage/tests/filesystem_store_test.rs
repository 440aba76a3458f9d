//! Tests for the filesystem storage backend.

use chrono::{TimeZone, Utc};
use quizreel_core::RenderedArtifact;
use quizreel_storage::{ArtifactStore, FileSystemStore};
use sha2::{Digest, Sha256};
use tempfile::TempDir;

fn artifact(topic: &str, bytes: Vec<u8>) -> RenderedArtifact {
    let checksum = format!("{:x}", Sha256::digest(&bytes));
    RenderedArtifact {
        bytes,
        duration_secs: 14.5,
        width: 1080,
        height: 1920,
        fps: 30,
        checksum,
        topic_slug: topic.to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn store_writes_under_deterministic_key() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    let artifact = artifact("history", b"video payload".to_vec());
    let receipt = store.store(&artifact).await.unwrap();

    assert_eq!(receipt.backend, "filesystem");
    assert!(receipt.location.ends_with(&artifact.storage_key()));

    let written = std::fs::read(&receipt.location).unwrap();
    assert_eq!(written, artifact.bytes);
}

#[tokio::test]
async fn repeated_store_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    let artifact = artifact("history", b"same payload".to_vec());
    let first = store.store(&artifact).await.unwrap();
    let second = store.store(&artifact).await.unwrap();

    // Same key both times, one file on disk
    assert_eq!(first.location, second.location);
    let entries: Vec<_> = std::fs::read_dir(temp_dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn different_content_gets_distinguishable_key() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    let a = artifact("history", b"first render".to_vec());
    let b = artifact("history", b"second render".to_vec());

    let receipt_a = store.store(&a).await.unwrap();
    let receipt_b = store.store(&b).await.unwrap();

    assert_ne!(receipt_a.location, receipt_b.location);
}

#[tokio::test]
async fn no_temp_file_remains_after_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = FileSystemStore::new(temp_dir.path()).unwrap();

    let artifact = artifact("science", b"payload".to_vec());
    store.store(&artifact).await.unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn store_creates_missing_base_directory() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("out/videos");

    let store = FileSystemStore::new(&nested).unwrap();
    let artifact = artifact("cinema", b"payload".to_vec());
    let receipt = store.store(&artifact).await.unwrap();

    assert!(std::path::Path::new(&receipt.location).exists());
}
