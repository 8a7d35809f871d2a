//! # Data Source Errors

use thiserror::Error;

/// Result type for data source operations
pub type DataSourceResult<T> = Result<T, DataSourceError>;

/// Errors raised while interpreting or editing data source settings.
///
/// Malformed stored settings never produce one of these; the normalizer
/// recovers from them silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataSourceError {
    /// Provider type is not one of the supported kinds
    #[error("Unknown data source type: {0}")]
    UnknownType(String),

    /// Variation id format is neither `index` nor `key`
    #[error("Invalid variation id format: {0}")]
    InvalidVariationIdFormat(String),

    /// Settings section is neither `queries` nor `events`
    #[error("Unknown settings section: {0}")]
    UnknownSection(String),

    /// Field does not exist in the given section
    #[error("Unknown field '{name}' in {section}")]
    UnknownField { section: String, name: String },

    /// No preset registered under this name
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    /// A preset with this name is already registered
    #[error("Preset already registered: {0}")]
    DuplicatePreset(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = DataSourceError::UnknownField {
            section: "queries".into(),
            name: "metricsQuery".into(),
        };
        assert_eq!(err.to_string(), "Unknown field 'metricsQuery' in queries");
        assert!(DataSourceError::UnknownPreset("rudderstack".into())
            .to_string()
            .contains("rudderstack"));
    }
}
