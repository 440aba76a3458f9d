//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to move a completed write into its final name
    #[display("Failed to finalize file: {}", _0)]
    Rename(String),
    /// Remote backend rejected or failed the write
    #[display("Remote write failed with status {}: {}", status, message)]
    RemoteWrite {
        /// HTTP status code (0 when the request never completed)
        status: u16,
        /// Error message
        message: String,
    },
    /// Invalid storage path
    #[display("Invalid storage path: {}", _0)]
    InvalidPath(String),
    /// Invalid storage configuration
    #[display("Invalid configuration: {}", _0)]
    InvalidConfig(String),
}

/// Storage error with location tracking.
///
/// Storage failures are fatal for the attempt, but the rendered artifact is
/// preserved by the caller, so storage alone may be retried without
/// re-rendering.
///
/// # Examples
///
/// ```
/// use quizreel_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::InvalidPath("/no/such".to_string()));
/// assert!(format!("{}", err).contains("Invalid storage path"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
