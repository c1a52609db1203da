//! Errors raised by the title-lookup and render collaborators.

/// Error kinds for external service calls.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum ServiceErrorKind {
    /// Request never produced a response
    #[display("HTTP request failed: {}", _0)]
    Http(String),

    /// Service answered with a non-success status
    #[display("Service responded with {}: {}", status_code, message)]
    Status {
        /// HTTP status code
        status_code: u16,
        /// Status text or response body
        message: String,
    },

    /// Failed to deserialize response
    #[display("Failed to deserialize response: {}", _0)]
    Deserialization(String),

    /// Lookup reference could not be interpreted
    #[display("Invalid reference: {}", _0)]
    InvalidReference(String),

    /// Service is not configured
    #[display("Configuration error: {}", _0)]
    Configuration(String),
}

/// Error wrapper with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Service Error: {} at line {} in {}", kind, line, file)]
pub struct ServiceError {
    /// The error kind
    pub kind: ServiceErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl ServiceError {
    /// Create a new ServiceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServiceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
