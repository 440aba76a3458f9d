//! Core data types for the Quizreel video pipeline.
//!
//! This crate provides the data model shared by every pipeline stage
//! (topics, quiz specifications, narration segments, timelines, rendered
//! artifacts) plus the layered TOML configuration surface.
//!
//! Every type here is owned data: a stage produces its output, hands
//! ownership to the next stage, and nothing is shared mutably across
//! stages or runs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod config;
mod narration;
mod quiz;
mod timeline;
mod topic;
mod voice;

pub use artifact::{RenderedArtifact, StorageReceipt};
pub use config::{
    AssetConfig, GenerationConfig, QuizreelConfig, RemoteStorageConfig, RenderConfig,
    SelectionConfig, StorageBackend, StorageConfig, SubtitleConfig, TimingConfig, TtsConfig,
    VideoConfig,
};
pub use narration::{NarrationSegment, SegmentRole};
pub use quiz::{QuestionUnit, QuizSpec};
pub use timeline::{OverlaySpec, Timeline, TimelineEntry};
pub use topic::Topic;
pub use voice::VoiceConfig;
