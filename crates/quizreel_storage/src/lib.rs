//! Artifact storage backends for Quizreel.
//!
//! A rendered video is persisted through the [`ArtifactStore`] trait, with
//! the concrete backend (local filesystem or HTTP object storage) chosen
//! by configuration at construction time.
//!
//! Both backends are durable before returning success: the filesystem
//! backend completes its write and renames into place so no partial file is
//! ever visible under the final name, and the HTTP backend only succeeds on
//! an acknowledged 2xx response. Neither deletes the rendered artifact on
//! failure, so storage can be retried without re-rendering.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod http;
mod store;

pub use filesystem::FileSystemStore;
pub use http::HttpObjectStore;
pub use store::{ArtifactStore, artifact_store_from_config};
