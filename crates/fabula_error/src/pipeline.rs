//! Pipeline error types.

/// Specific error conditions for pipeline operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PipelineErrorKind {
    /// Phase name did not match any known generation phase
    #[display("Unknown generation phase: {}", _0)]
    UnknownPhase(String),
    /// Generation endpoint returned a failure for a phase
    #[display("{} generation failed", _0)]
    Generation(String),
    /// Generation endpoint response could not be interpreted
    #[display("Malformed generation response for {}: {}", phase, message)]
    MalformedResponse {
        /// Phase whose response failed to parse
        phase: String,
        /// Error message
        message: String,
    },
    /// Serialization error
    #[display("Serialization error: {}", _0)]
    Serialization(String),
    /// Configuration error
    #[display("Configuration error: {}", _0)]
    Configuration(String),
}

/// Error type for pipeline operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{PipelineError, PipelineErrorKind};
///
/// let err = PipelineError::new(PipelineErrorKind::UnknownPhase("prologue".into()));
/// assert!(format!("{}", err).contains("prologue"));
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
