//! # Form Errors

use std::time::Duration;

use thiserror::Error;

use crate::client::ApiError;
use crate::datasource::{DataSourceError, DataSourceType, EditMode};

/// Result type for editing session operations
pub type FormResult<T> = Result<T, FormError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// No working copy has been loaded yet
    #[error("Settings have not been loaded")]
    NotLoaded,

    /// The provider's edit mode does not allow this change
    #[error("{datasource_type} data sources do not support editing {field} (edit mode: {mode})")]
    EditNotSupported {
        datasource_type: DataSourceType,
        mode: EditMode,
        field: String,
    },

    /// Bad field, section or preset name
    #[error(transparent)]
    Settings(#[from] DataSourceError),

    /// Loading the data source failed
    #[error("Failed to load data source: {0}")]
    Load(ApiError),

    /// The update call failed; message is the endpoint's, unchanged
    #[error(transparent)]
    Save(ApiError),

    /// The update call did not answer in time
    #[error("Save timed out after {0:?}")]
    Timeout(Duration),

    /// The update call was cancelled
    #[error("Save cancelled")]
    Cancelled,
}

impl FormError {
    /// Save failures leave the session dirty and can be retried
    pub fn is_save_failure(&self) -> bool {
        matches!(self, FormError::Save(_) | FormError::Timeout(_) | FormError::Cancelled)
    }
}
