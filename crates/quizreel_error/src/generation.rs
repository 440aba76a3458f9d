//! Content generation error types.

/// Malformed-content error with source location.
///
/// Raised when a backend call succeeded but the returned content cannot be
/// normalized into a valid quiz: no JSON payload, missing fields, duplicate
/// choice text, or an out-of-range answer index. Not retried: replaying the
/// same malformed response cannot help without a fresh backend call, and the
/// backend call already carries its own retry budget.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", message, line, file)]
pub struct GenerationError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use quizreel_error::GenerationError;
    ///
    /// let err = GenerationError::new("no questions survived validation");
    /// assert!(err.message.contains("validation"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
