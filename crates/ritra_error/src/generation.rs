//! Generation provider error types and failure classification.

/// How a failed generation attempt should be treated by retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FailureClass {
    /// Network trouble, soft timeouts, overloaded provider. Expected to clear quickly.
    #[display("transient")]
    Transient,
    /// The provider answered with an explanation instead of the requested artifact.
    #[display("refusal")]
    Refusal,
    /// Anything else: bad credentials, a request the provider will never accept.
    #[display("other")]
    Other,
}

/// Generation-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// API key environment variable not set
    #[display("{} environment variable not set", _0)]
    MissingApiKey(String),
    /// Failed to create the HTTP client
    #[display("Failed to create generation client: {}", _0)]
    ClientCreation(String),
    /// Request never produced an HTTP response
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// A provider call or upload outlived its timeout
    #[display("Request timed out after {}ms", after_ms)]
    Timeout {
        /// Milliseconds waited before giving up
        after_ms: u64,
    },
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    HttpError {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// Provider returned text where an artifact was requested
    #[display("Model returned text instead of an artifact: {}", _0)]
    Refusal(String),
    /// Provider returned no usable content at all
    #[display("No content in response")]
    EmptyResponse,
    /// Base64 decoding of inline data failed
    #[display("Base64 decode error: {}", _0)]
    Base64Decode(String),
    /// Response body could not be parsed
    #[display("Failed to parse response: {}", _0)]
    Deserialization(String),
    /// Persisting a generated artifact failed
    #[display("Failed to store artifact: {}", _0)]
    Storage(String),
    /// Request was rejected before it was sent
    #[display("Invalid generation input: {}", _0)]
    InvalidInput(String),
}

impl GenerationErrorKind {
    /// Classify this error for retry purposes.
    pub fn failure_class(&self) -> FailureClass {
        match self {
            GenerationErrorKind::Transport(_)
            | GenerationErrorKind::Timeout { .. }
            | GenerationErrorKind::Storage(_) => FailureClass::Transient,
            GenerationErrorKind::HttpError { status_code, .. } => {
                if matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504) {
                    FailureClass::Transient
                } else {
                    FailureClass::Other
                }
            }
            GenerationErrorKind::Refusal(_)
            | GenerationErrorKind::EmptyResponse
            | GenerationErrorKind::Base64Decode(_)
            | GenerationErrorKind::Deserialization(_) => FailureClass::Refusal,
            GenerationErrorKind::MissingApiKey(_)
            | GenerationErrorKind::ClientCreation(_)
            | GenerationErrorKind::InvalidInput(_) => FailureClass::Other,
        }
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use ritra_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::MissingApiKey("GEMINI_API_KEY".into()));
/// assert!(format!("{}", err).contains("GEMINI_API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
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
/// # Examples
///
/// ```
/// use ritra_error::{FailureClass, GenerationError, GenerationErrorKind, RetryableError};
///
/// let err = GenerationError::new(GenerationErrorKind::HttpError {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// assert_eq!(err.failure_class(), FailureClass::Transient);
/// ```
pub trait RetryableError {
    /// Classify the failure.
    fn failure_class(&self) -> FailureClass;

    /// Returns true if the failure is expected to clear on its own.
    ///
    /// `Other` failures (bad requests, missing credentials) are still retried
    /// under the longer backoff, but rarely recover before the deadline.
    fn is_retryable(&self) -> bool {
        self.failure_class() != FailureClass::Other
    }
}

impl RetryableError for GenerationError {
    fn failure_class(&self) -> FailureClass {
        self.kind.failure_class()
    }
}

impl RetryableError for GenerationErrorKind {
    fn failure_class(&self) -> FailureClass {
        GenerationErrorKind::failure_class(self)
    }
}
