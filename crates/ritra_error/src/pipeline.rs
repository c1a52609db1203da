//! Run-level pipeline error types.

/// Conditions that end a run (or, for submission failures, a stage).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Seed could not be resolved to a usable title
    #[display("Title lookup failed: {}", _0)]
    FatalLookupFailure(String),
    /// Seed input or a stage input is unusable
    #[display("Malformed input: {}", _0)]
    MalformedInput(String),
    /// Render service rejected the completed bundle
    #[display("Render submission failed: {}", _0)]
    DownstreamSubmissionFailure(String),
}

/// Error type for pipeline runs.
///
/// # Examples
///
/// ```
/// use ritra_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::FatalLookupFailure("no row".into()));
/// assert!(format!("{}", err).contains("no row"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    /// The specific error condition
    pub kind: PipelineErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PipelineError {
    /// Create a new PipelineError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
