//! # Persistence Client Errors

use thiserror::Error;

/// Result type for persistence endpoint calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures talking to the data source persistence endpoint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No data source with this id
    #[error("Data source not found: {0}")]
    NotFound(String),

    /// Endpoint answered with a non-success status
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },

    /// Endpoint could not be reached
    #[error("Persistence endpoint unavailable: {0}")]
    Unavailable(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client misconfiguration (bad base URL, bad token)
    #[error("Invalid client configuration: {0}")]
    Config(String),

    /// Update rejected by the backing store
    #[error("{0}")]
    Rejected(String),
}
