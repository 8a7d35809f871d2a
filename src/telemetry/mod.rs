//! Product telemetry
//!
//! Fire-and-forget named events with a small attribute set. A failing sink
//! is logged and otherwise ignored; it never blocks or fails the caller.

mod sinks;

use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::datasource::DataSourceType;
use crate::observability::Event;

pub use sinks::{LogTracker, MemoryTracker};

/// Result type for telemetry sinks
pub type TelemetryResult<T> = Result<T, TelemetryError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TelemetryError {
    #[error("Telemetry sink unavailable: {0}")]
    Unavailable(String),
}

/// Events emitted by the settings editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackEvent {
    /// The settings form was opened
    ViewSettingsForm { source: String },
    /// Queries were saved
    EditQueries {
        datasource_type: DataSourceType,
        source: String,
    },
}

impl TrackEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TrackEvent::ViewSettingsForm { .. } => "View Datasource Settings Form",
            TrackEvent::EditQueries { .. } => "Edit Data Source Queries",
        }
    }

    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            TrackEvent::ViewSettingsForm { source } => vec![("source", source.clone())],
            TrackEvent::EditQueries {
                datasource_type,
                source,
            } => vec![
                ("type", datasource_type.as_str().to_string()),
                ("source", source.clone()),
            ],
        }
    }
}

impl fmt::Display for TrackEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A telemetry sink
pub trait Tracker: Send + Sync {
    fn track(&self, event: &TrackEvent) -> TelemetryResult<()>;
}

/// Sends `event`, swallowing any sink failure
pub fn track_quietly(tracker: &dyn Tracker, event: TrackEvent) {
    if let Err(e) = tracker.track(&event) {
        warn!(event = %Event::TelemetryFailed, name = event.name(), error = %e, "telemetry event dropped");
    }
}
