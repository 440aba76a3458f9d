//! Top-level error wrapper types.

use crate::{
    AssetError, BackendError, ConfigError, GenerationError, RenderError, StorageError,
    SynthesisError,
};

/// The foundation error enum: one variant per pipeline concern.
///
/// The variant itself identifies the originating stage of a failed run, so
/// the run boundary can report a single terminal failure with its origin
/// without any extra bookkeeping.
///
/// # Examples
///
/// ```
/// use quizreel_error::{QuizreelError, ConfigError};
///
/// let cfg_err = ConfigError::new("no themes configured");
/// let err: QuizreelError = cfg_err.into();
/// assert_eq!(err.kind().stage(), "configuration");
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum QuizreelErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Transient upstream backend error
    #[from(BackendError)]
    Backend(BackendError),
    /// Malformed generated content
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Narration synthesis error
    #[from(SynthesisError)]
    Synthesis(SynthesisError),
    /// Missing media asset
    #[from(AssetError)]
    Asset(AssetError),
    /// Video composition/encoding error
    #[from(RenderError)]
    Render(RenderError),
    /// Artifact storage error
    #[from(StorageError)]
    Storage(StorageError),
}

impl QuizreelErrorKind {
    /// The pipeline stage this error originated from.
    pub fn stage(&self) -> &'static str {
        match self {
            QuizreelErrorKind::Config(_) => "configuration",
            QuizreelErrorKind::Backend(_) | QuizreelErrorKind::Generation(_) => {
                "question generation"
            }
            QuizreelErrorKind::Synthesis(_) => "narration synthesis",
            QuizreelErrorKind::Asset(_) | QuizreelErrorKind::Render(_) => "video assembly",
            QuizreelErrorKind::Storage(_) => "artifact storage",
        }
    }
}

/// Quizreel error with kind discrimination.
///
/// # Examples
///
/// ```
/// use quizreel_error::{QuizreelResult, GenerationError};
///
/// fn might_fail() -> QuizreelResult<()> {
///     Err(GenerationError::new("missing answer index"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Quizreel Error: {}", _0)]
pub struct QuizreelError(Box<QuizreelErrorKind>);

impl QuizreelError {
    /// Create a new error from a kind.
    pub fn new(kind: QuizreelErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &QuizreelErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to QuizreelErrorKind
impl<T> From<T> for QuizreelError
where
    T: Into<QuizreelErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Quizreel operations.
///
/// # Examples
///
/// ```
/// use quizreel_error::{QuizreelResult, StorageError, StorageErrorKind};
///
/// fn persist() -> QuizreelResult<()> {
///     Err(StorageError::new(StorageErrorKind::FileWrite("disk full".into())))?
/// }
/// ```
pub type QuizreelResult<T> = std::result::Result<T, QuizreelError>;
