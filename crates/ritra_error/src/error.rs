//! Top-level error wrapper types.

use crate::{
    ConfigError, GenerationError, PipelineError, ServerError, ServiceError, StorageError,
};

/// Every error family in the workspace.
///
/// # Examples
///
/// ```
/// use ritra_error::{GenerationError, GenerationErrorKind, RitraError, RitraErrorKind};
///
/// let err: RitraError = GenerationError::new(GenerationErrorKind::EmptyResponse).into();
/// assert!(matches!(err.kind(), RitraErrorKind::Generation(_)));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum RitraErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Generation provider error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Title lookup or render service error
    #[from(ServiceError)]
    Service(ServiceError),
    /// Run-level pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
    /// HTTP front door error
    #[from(ServerError)]
    Server(ServerError),
}

/// Ritra error with kind discrimination.
///
/// # Examples
///
/// ```
/// use ritra_error::{RitraResult, ConfigError};
///
/// fn might_fail() -> RitraResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Ritra Error: {}", _0)]
pub struct RitraError(Box<RitraErrorKind>);

impl RitraError {
    /// Create a new error from a kind.
    pub fn new(kind: RitraErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RitraErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to RitraErrorKind
impl<T> From<T> for RitraError
where
    T: Into<RitraErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Ritra operations.
pub type RitraResult<T> = std::result::Result<T, RitraError>;
