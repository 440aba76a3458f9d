//! Media asset error types.

/// Specific error conditions for required media assets.
///
/// Missing assets require operator intervention (placing the file), so these
/// are fatal and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum AssetErrorKind {
    /// Background video not found for any candidate path
    #[display("Background video not found: {}", _0)]
    MissingBackground(String),
    /// Music track not found
    #[display("Music track not found: {}", _0)]
    MissingMusic(String),
    /// Countdown tick sound not found
    #[display("Countdown tick sound not found: {}", _0)]
    MissingTick(String),
    /// Asset directory does not exist
    #[display("Asset directory does not exist: {}", _0)]
    MissingDirectory(String),
}

/// Asset error with source location tracking.
///
/// # Examples
///
/// ```
/// use quizreel_error::{AssetError, AssetErrorKind};
///
/// let err = AssetError::new(AssetErrorKind::MissingMusic("assets/music".into()));
/// assert!(format!("{}", err).contains("Music"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Asset Error: {} at line {} in {}", kind, line, file)]
pub struct AssetError {
    /// The kind of error that occurred
    pub kind: AssetErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl AssetError {
    /// Create a new AssetError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: AssetErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
