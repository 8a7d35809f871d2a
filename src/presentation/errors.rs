//! # Presentation Errors

use thiserror::Error;

/// Result type for presentation operations
pub type PresentationResult<T> = Result<T, PresentationError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresentationError {
    #[error("Presentation not found: {0}")]
    NotFound(String),

    #[error("Presentation already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid presentation: {0}")]
    Invalid(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PresentationError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            PresentationError::NotFound(_) => 404,
            PresentationError::AlreadyExists(_) => 409,
            PresentationError::Invalid(_) => 400,
            PresentationError::Internal(_) => 500,
        }
    }
}
