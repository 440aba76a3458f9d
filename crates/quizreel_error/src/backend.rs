//! Upstream backend error types and retry classification.

/// Specific error conditions for calls to external backends
/// (content generation, speech synthesis).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum BackendErrorKind {
    /// API key not found in environment
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Failed to construct the backend client
    #[display("Failed to create backend client: {}", _0)]
    ClientCreation(String),
    /// Request failed without a usable status code
    #[display("Backend request failed: {}", _0)]
    Request(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// The call exceeded its configured time budget
    #[display("Backend call timed out after {}s", _0)]
    Timeout(u64),
    /// Response body could not be decoded
    #[display("Failed to decode backend response: {}", _0)]
    Decode(String),
}

impl BackendErrorKind {
    /// Check if this error condition should be retried.
    ///
    /// Timeouts, rate limits, and server-side failures are transient;
    /// authentication and malformed-request errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendErrorKind::Http { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            BackendErrorKind::Timeout(_) => true,
            BackendErrorKind::Request(_) => true,
            _ => false,
        }
    }

    /// Get retry strategy parameters for this error condition.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    pub fn retry_strategy_params(&self) -> (u64, usize, u64) {
        match self {
            BackendErrorKind::Http { status_code, .. } => match *status_code {
                429 => (5000, 3, 40),
                503 => (2000, 5, 60),
                500 | 502 | 504 => (1000, 3, 8),
                408 => (2000, 4, 30),
                _ => (2000, 5, 60),
            },
            BackendErrorKind::Timeout(_) => (1000, 3, 10),
            _ => (2000, 5, 60),
        }
    }
}

/// Backend error with source location tracking.
///
/// # Examples
///
/// ```
/// use quizreel_error::{BackendError, BackendErrorKind};
///
/// let err = BackendError::new(BackendErrorKind::Http {
///     status_code: 503,
///     message: "overloaded".to_string(),
/// });
/// assert!(format!("{}", err).contains("503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Backend Error: {} at line {} in {}", kind, line, file)]
pub struct BackendError {
    /// The kind of error that occurred
    pub kind: BackendErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl BackendError {
    /// Create a new BackendError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BackendErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// Transient errors like 503 (service unavailable), 429 (rate limit), or
/// network timeouts should return true from [`is_retryable`]. Permanent
/// errors like 401 (unauthorized) or 400 (bad request) should return false.
///
/// [`is_retryable`]: RetryableError::is_retryable
///
/// # Examples
///
/// ```
/// use quizreel_error::{BackendError, BackendErrorKind, RetryableError};
///
/// let err = BackendError::new(BackendErrorKind::Http {
///     status_code: 429,
///     message: "rate limit exceeded".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// let (backoff, retries, _) = err.retry_strategy_params();
/// assert_eq!(backoff, 5000);
/// assert_eq!(retries, 3);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (2000, 5, 60)
    }
}

impl RetryableError for BackendError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        self.kind.retry_strategy_params()
    }
}
