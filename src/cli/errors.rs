//! CLI-specific error types

use std::fmt;
use std::io;

use crate::client::ApiError;
use crate::config::ConfigError;
use crate::datasource::DataSourceError;
use crate::form::FormError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Bad field assignment, section or preset
    InvalidInput,
    /// Data source could not be fetched
    LoadFailed,
    /// Update call failed, timed out or was cancelled
    SaveFailed,
    /// Server could not start
    ServeFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "DSCONFIG_CONFIG_ERROR",
            Self::IoError => "DSCONFIG_IO_ERROR",
            Self::InvalidInput => "DSCONFIG_INVALID_INPUT",
            Self::LoadFailed => "DSCONFIG_LOAD_FAILED",
            Self::SaveFailed => "DSCONFIG_SAVE_FAILED",
            Self::ServeFailed => "DSCONFIG_SERVE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidInput, msg)
    }

    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<ApiError> for CliError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Config(_) => Self::config_error(e.to_string()),
            _ => Self::new(CliErrorCode::LoadFailed, e.to_string()),
        }
    }
}

impl From<DataSourceError> for CliError {
    fn from(e: DataSourceError) -> Self {
        Self::invalid_input(e.to_string())
    }
}

impl From<FormError> for CliError {
    fn from(e: FormError) -> Self {
        let code = match &e {
            FormError::Load(_) | FormError::NotLoaded => CliErrorCode::LoadFailed,
            _ if e.is_save_failure() => CliErrorCode::SaveFailed,
            _ => CliErrorCode::InvalidInput,
        };
        Self::new(code, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_form_errors_map_to_codes() {
        let err: CliError = FormError::Timeout(Duration::from_secs(1)).into();
        assert_eq!(err.code(), CliErrorCode::SaveFailed);

        let err: CliError = FormError::Load(ApiError::NotFound("ds_1".into())).into();
        assert_eq!(err.code(), CliErrorCode::LoadFailed);

        let err: CliError = FormError::Settings(DataSourceError::UnknownPreset("nope".into())).into();
        assert_eq!(err.code(), CliErrorCode::InvalidInput);
    }

    #[test]
    fn test_display_includes_code() {
        let err = CliError::invalid_input("bad assignment");
        assert_eq!(err.to_string(), "DSCONFIG_INVALID_INPUT: bad assignment");
    }
}
