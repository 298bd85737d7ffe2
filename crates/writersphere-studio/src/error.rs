//! Error types for writersphere-studio

use thiserror::Error;

/// Result type alias for writersphere-studio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the writer workflows.
///
/// Display text is what the writer sees, so wrapped errors are transparent.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from the backend client; displays the backend's message.
    #[error(transparent)]
    Client(#[from] writersphere_client::Error),

    /// Validation and other core errors.
    #[error(transparent)]
    Core(#[from] writersphere_core::Error),

    /// No signed-in user.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Signed in, but not allowed here.
    #[error("{0}")]
    Forbidden(String),

    /// A row that must exist was missing.
    #[error("{0}")]
    NotFound(String),

    /// Failure reported by a store implementation.
    #[error("{0}")]
    Store(String),
}

impl Error {
    /// Create a validation error with a user-facing message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Core(writersphere_core::Error::validation(message.into()))
    }

    /// Create a validation error for one field.
    pub fn validation_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Core(writersphere_core::Error::validation_field(
            field.into(),
            message.into(),
        ))
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Whether this is a validation failure rather than a backend failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Core(writersphere_core::Error::Validation { .. })
        )
    }
}
