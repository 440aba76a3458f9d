//! Narration synthesis error types.

/// Specific error conditions for narration synthesis.
///
/// A timeline needs the complete, ordered segment set, so any segment that
/// fails irrecoverably fails the whole stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SynthesisErrorKind {
    /// A segment failed after exhausting its retry budget
    #[display("Segment {} failed after {} attempts: {}", index, attempts, message)]
    SegmentFailed {
        /// Position of the segment in the spoken-unit order
        index: usize,
        /// Attempts made, including the first call
        attempts: usize,
        /// Last backend error message
        message: String,
    },
    /// The backend reported a zero or negative duration for non-empty text
    #[display("Segment {} returned an implausible duration of {}s", index, duration)]
    ImplausibleDuration {
        /// Position of the segment in the spoken-unit order
        index: usize,
        /// Reported duration in seconds (formatted)
        duration: String,
    },
    /// A synthesis worker task was cancelled or panicked
    #[display("Synthesis task aborted: {}", _0)]
    TaskAborted(String),
    /// The run was cancelled mid-synthesis
    #[display("Synthesis cancelled")]
    Cancelled,
}

/// Synthesis error with source location tracking.
///
/// # Examples
///
/// ```
/// use quizreel_error::{SynthesisError, SynthesisErrorKind};
///
/// let err = SynthesisError::new(SynthesisErrorKind::Cancelled);
/// assert!(format!("{}", err).contains("cancelled"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Synthesis Error: {} at line {} in {}", kind, line, file)]
pub struct SynthesisError {
    /// The kind of error that occurred
    pub kind: SynthesisErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SynthesisError {
    /// Create a new SynthesisError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SynthesisErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
