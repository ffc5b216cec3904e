//! Top-level error wrapper types.

#[cfg(feature = "database")]
use crate::DatabaseError;
use crate::{ConfigError, HttpError, JsonError, PipelineError};

/// This is the foundation error enum. Each Fabula crate contributes the
/// variants for its own failure domain.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: FabulaError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum FabulaErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Database error
    #[cfg(feature = "database")]
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Pipeline error
    #[from(PipelineError)]
    Pipeline(PipelineError),
}

/// Fabula error with kind discrimination.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaError, FabulaResult, ConfigError};
///
/// fn might_fail() -> FabulaResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Fabula Error: {}", _0)]
pub struct FabulaError(Box<FabulaErrorKind>);

impl FabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: FabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &FabulaErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to FabulaErrorKind
impl<T> From<T> for FabulaError
where
    T: Into<FabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Fabula operations.
///
/// # Examples
///
/// ```
/// use fabula_error::{FabulaResult, HttpError};
///
/// fn fetch_data() -> FabulaResult<String> {
///     Err(HttpError::new("404 Not Found"))?
/// }
/// ```
pub type FabulaResult<T> = std::result::Result<T, FabulaError>;
