//! Error types for the Quizreel video pipeline.
//!
//! This crate provides the foundation error types used throughout the
//! Quizreel workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The taxonomy mirrors the stages of a pipeline run: configuration,
//! question generation, narration synthesis, video assembly, and storage.
//! Transient conditions expose retry classification through the
//! [`RetryableError`] trait; everything else is fatal and propagates to the
//! run boundary.
//!
//! # Examples
//!
//! ```
//! use quizreel_error::{QuizreelResult, ConfigError};
//!
//! fn load_themes() -> QuizreelResult<Vec<String>> {
//!     Err(ConfigError::new("themes list is empty"))?
//! }
//!
//! match load_themes() {
//!     Ok(themes) => println!("{} themes", themes.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod backend;
mod config;
mod error;
mod generation;
mod render;
mod storage;
mod synthesis;

pub use asset::{AssetError, AssetErrorKind};
pub use backend::{BackendError, BackendErrorKind, RetryableError};
pub use config::ConfigError;
pub use error::{QuizreelError, QuizreelErrorKind, QuizreelResult};
pub use generation::GenerationError;
pub use render::{RenderError, RenderErrorKind};
pub use storage::{StorageError, StorageErrorKind};
pub use synthesis::{SynthesisError, SynthesisErrorKind};
