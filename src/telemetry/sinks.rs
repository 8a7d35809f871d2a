//! Telemetry sinks

use std::sync::Mutex;

use tracing::info;

use super::{TelemetryError, TelemetryResult, TrackEvent, Tracker};

/// Writes each event to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracker;

impl Tracker for LogTracker {
    fn track(&self, event: &TrackEvent) -> TelemetryResult<()> {
        let attributes = event
            .attributes()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        info!(target: "telemetry", name = event.name(), attributes = %attributes, "track");
        Ok(())
    }
}

/// Records events in memory; can be told to fail every call
#[derive(Debug, Default)]
pub struct MemoryTracker {
    events: Mutex<Vec<TrackEvent>>,
    failing: bool,
}

impl MemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every call fails
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn events(&self) -> Vec<TrackEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(TrackEvent::name).collect()
    }
}

impl Tracker for MemoryTracker {
    fn track(&self, event: &TrackEvent) -> TelemetryResult<()> {
        if self.failing {
            return Err(TelemetryError::Unavailable("sink offline".into()));
        }
        self.events
            .lock()
            .map_err(|_| TelemetryError::Unavailable("Lock poisoned".into()))?
            .push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_tracker_records_in_order() {
        let tracker = MemoryTracker::new();
        tracker.track(&TrackEvent::ViewSettingsForm { source: "a".into() }).unwrap();
        tracker.track(&TrackEvent::ViewSettingsForm { source: "b".into() }).unwrap();
        assert_eq!(tracker.events().len(), 2);
        assert_eq!(tracker.names(), vec!["View Datasource Settings Form"; 2]);
    }

    #[test]
    fn test_log_tracker_never_fails() {
        assert!(LogTracker.track(&TrackEvent::ViewSettingsForm { source: "a".into() }).is_ok());
    }
}
