//! Observability for dsconfig
//!
//! Structured logging through `tracing`. Every log line carries a typed
//! [`Event`] in its `event` field.
//!
//! # Usage
//!
//! ```ignore
//! use dsconfig::observability::{init_logging, Event, LogFormat};
//!
//! init_logging(LogFormat::Json)?;
//! tracing::info!(event = %Event::SaveComplete, datasource_id = "ds_1", "settings saved");
//! ```
//!
//! Logs go to stderr; stdout is reserved for command output.

mod events;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub use events::Event;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("Invalid log format: {0} (expected 'text' or 'json')")]
    InvalidFormat(String),

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ObservabilityError::InvalidFormat(other.to_string())),
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_logging(format: LogFormat) -> Result<(), ObservabilityError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };
    result.map_err(|e| ObservabilityError::AlreadyInitialized(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_second_init_fails() {
        // The first call may race other tests; the second always fails.
        let _ = init_logging(LogFormat::Text);
        assert!(init_logging(LogFormat::Text).is_err());
    }
}
