//! Observable lifecycle events
//!
//! Every structured log line carries one of these as its `event` field, so
//! log consumers can match on stable names instead of message text.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Process lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Seed documents loaded into the in-memory stores
    SeedLoaded,
    /// Server bound and serving
    Serving,
    /// Server stopped
    ShutdownComplete,

    // Editing session
    /// Working copy derived from a stored data source
    FormLoaded,
    /// Load ignored because unsaved edits are pending
    FormLoadIgnored,
    /// One field of the working copy changed
    FieldEdited,
    /// Preset replaced the working queries
    PresetApplied,
    /// Submit called with nothing to save
    SaveSkipped,
    /// Update call issued
    SaveBegin,
    /// Update call succeeded
    SaveComplete,
    /// Update call failed, timed out or was cancelled
    SaveFailed,

    // Persistence endpoint (server side)
    /// Data source served
    DatasourceRead,
    /// Data source replaced
    DatasourceUpdated,
    /// Presentation created or replaced
    PresentationSaved,
    /// Presentation removed
    PresentationDeleted,
    /// Request rejected
    RequestRejected,

    // Telemetry
    /// Telemetry sink refused an event
    TelemetryFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SeedLoaded => "SEED_LOADED",
            Event::Serving => "DSCONFIG_SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::FormLoaded => "FORM_LOADED",
            Event::FormLoadIgnored => "FORM_LOAD_IGNORED",
            Event::FieldEdited => "FIELD_EDITED",
            Event::PresetApplied => "PRESET_APPLIED",
            Event::SaveSkipped => "SAVE_SKIPPED",
            Event::SaveBegin => "SAVE_BEGIN",
            Event::SaveComplete => "SAVE_COMPLETE",
            Event::SaveFailed => "SAVE_FAILED",

            Event::DatasourceRead => "DATASOURCE_READ",
            Event::DatasourceUpdated => "DATASOURCE_UPDATED",
            Event::PresentationSaved => "PRESENTATION_SAVED",
            Event::PresentationDeleted => "PRESENTATION_DELETED",
            Event::RequestRejected => "REQUEST_REJECTED",

            Event::TelemetryFailed => "TELEMETRY_FAILED",
        }
    }

    /// Events that indicate something went wrong
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::SaveFailed | Event::RequestRejected | Event::TelemetryFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::SeedLoaded,
            Event::Serving,
            Event::ShutdownComplete,
            Event::FormLoaded,
            Event::FormLoadIgnored,
            Event::FieldEdited,
            Event::PresetApplied,
            Event::SaveSkipped,
            Event::SaveBegin,
            Event::SaveComplete,
            Event::SaveFailed,
            Event::DatasourceRead,
            Event::DatasourceUpdated,
            Event::PresentationSaved,
            Event::PresentationDeleted,
            Event::RequestRejected,
            Event::TelemetryFailed,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_failure_events() {
        assert!(Event::SaveFailed.is_failure());
        assert!(!Event::SaveComplete.is_failure());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::SaveBegin), "SAVE_BEGIN");
    }
}
