//! Render toolchain error types.

/// Specific error conditions for video composition and encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RenderErrorKind {
    /// The ffmpeg binary could not be located on PATH
    #[display("ffmpeg not found on PATH: {}", _0)]
    ToolchainMissing(String),
    /// The encoder process could not be spawned
    #[display("Failed to spawn encoder: {}", _0)]
    Spawn(String),
    /// The encoder exited with a failure status
    #[display("Encoder exited with status {:?}: {}", code, stderr)]
    ExitStatus {
        /// Process exit code, if any
        code: Option<i32>,
        /// Captured stderr tail
        stderr: String,
    },
    /// The encoder reported success but produced no output file
    #[display("Encoder produced no output at {}", _0)]
    OutputMissing(String),
    /// The computed timeline violates the configured duration bounds
    #[display("Timeline violates duration policy: {}", _0)]
    DurationPolicy(String),
    /// Scratch-space I/O failure while staging composition inputs
    #[display("Render staging failed: {}", _0)]
    Staging(String),
}

impl RenderErrorKind {
    /// Check if this error condition should be retried.
    ///
    /// Toolchain crashes and spawn failures may be transient (resource
    /// pressure); a missing binary, a missing output after success, or a
    /// duration-policy violation will not change on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RenderErrorKind::Spawn(_) | RenderErrorKind::ExitStatus { .. }
        )
    }
}

/// Render error with source location tracking.
///
/// # Examples
///
/// ```
/// use quizreel_error::{RenderError, RenderErrorKind};
///
/// let err = RenderError::new(RenderErrorKind::ToolchainMissing("ffmpeg".into()));
/// assert!(format!("{}", err).contains("PATH"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Render Error: {} at line {} in {}", kind, line, file)]
pub struct RenderError {
    /// The kind of error that occurred
    pub kind: RenderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl RenderError {
    /// Create a new RenderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RenderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl crate::RetryableError for RenderError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (500, 2, 5)
    }
}
