//! Provider capabilities
//!
//! Which editing path a data source offers is decided once from its
//! provider type: free-form SQL queries, named events/properties, or nothing.

use std::fmt;

use super::types::{DataSourceType, EventField};

/// Editing path offered for a data source's settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditMode {
    /// Free-form SQL for each query role
    SqlQueries,
    /// Named event and property identifiers
    Events,
    /// Settings are not editable for this provider
    Unsupported,
}

impl EditMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditMode::SqlQueries => "sql_queries",
            EditMode::Events => "events",
            EditMode::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for EditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capability flags derived from a provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub edit_mode: EditMode,
}

impl Capabilities {
    pub fn settings_supported(&self) -> bool {
        self.edit_mode != EditMode::Unsupported
    }

    pub fn edits_queries(&self) -> bool {
        self.edit_mode == EditMode::SqlQueries
    }

    pub fn edits_events(&self) -> bool {
        self.edit_mode == EditMode::Events
    }

    /// Quick presets only make sense for SQL warehouses
    pub fn supports_presets(&self) -> bool {
        self.edits_queries()
    }

    pub fn edits_variation_id_format(&self) -> bool {
        self.settings_supported()
    }
}

impl DataSourceType {
    pub fn capabilities(self) -> Capabilities {
        let edit_mode = match self {
            DataSourceType::Mixpanel => EditMode::Events,
            DataSourceType::GoogleAnalytics => EditMode::Unsupported,
            DataSourceType::Redshift
            | DataSourceType::Athena
            | DataSourceType::Snowflake
            | DataSourceType::Postgres
            | DataSourceType::MySql
            | DataSourceType::BigQuery
            | DataSourceType::ClickHouse
            | DataSourceType::Presto => EditMode::SqlQueries,
        };
        Capabilities { edit_mode }
    }
}

/// Group an event field is shown under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventGroup {
    Experiments,
    PageViews,
}

/// Presentation metadata for an event field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventFieldSpec {
    pub field: EventField,
    pub group: EventGroup,
    pub label: &'static str,
    pub placeholder: &'static str,
}

/// Event fields in display order
pub const EVENT_FIELDS: [EventFieldSpec; 6] = [
    EventFieldSpec {
        field: EventField::ExperimentEvent,
        group: EventGroup::Experiments,
        label: "View Experiment Event",
        placeholder: "$experiment_started",
    },
    EventFieldSpec {
        field: EventField::ExperimentIdProperty,
        group: EventGroup::Experiments,
        label: "Experiment Id Property",
        placeholder: "Experiment name",
    },
    EventFieldSpec {
        field: EventField::VariationIdProperty,
        group: EventGroup::Experiments,
        label: "Variation Id Property",
        placeholder: "Variant name",
    },
    EventFieldSpec {
        field: EventField::PageviewEvent,
        group: EventGroup::PageViews,
        label: "Page Views Event",
        placeholder: "Page view",
    },
    EventFieldSpec {
        field: EventField::UrlProperty,
        group: EventGroup::PageViews,
        label: "URL Path Property",
        placeholder: "path",
    },
    EventFieldSpec {
        field: EventField::UserAgentProperty,
        group: EventGroup::PageViews,
        label: "User Agent Property",
        placeholder: "user_agent",
    },
];

pub fn event_field_spec(field: EventField) -> &'static EventFieldSpec {
    // EVENT_FIELDS lists every EventField in declaration order
    &EVENT_FIELDS[field as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_per_provider() {
        assert_eq!(DataSourceType::Mixpanel.capabilities().edit_mode, EditMode::Events);
        assert_eq!(DataSourceType::GoogleAnalytics.capabilities().edit_mode, EditMode::Unsupported);
        assert_eq!(DataSourceType::Postgres.capabilities().edit_mode, EditMode::SqlQueries);
    }

    #[test]
    fn test_modes_are_exclusive() {
        for t in DataSourceType::ALL {
            let caps = t.capabilities();
            assert!(!(caps.edits_queries() && caps.edits_events()));
            assert_eq!(caps.supports_presets(), caps.edits_queries());
        }
    }

    #[test]
    fn test_unsupported_provider_edits_nothing() {
        let caps = DataSourceType::GoogleAnalytics.capabilities();
        assert!(!caps.settings_supported());
        assert!(!caps.edits_variation_id_format());
        assert!(!caps.supports_presets());
    }

    #[test]
    fn test_event_field_specs_line_up() {
        for field in EventField::ALL {
            assert_eq!(event_field_spec(field).field, field);
        }
    }
}
