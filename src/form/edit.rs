//! Single-field edits to a working copy

use std::str::FromStr;

use crate::datasource::{DataSourceError, DataSourceResult, EventField, QueryRole, VariationIdFormat};

/// Settings sub-object a field lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsSection {
    Queries,
    Events,
}

impl SettingsSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsSection::Queries => "queries",
            SettingsSection::Events => "events",
        }
    }
}

impl FromStr for SettingsSection {
    type Err = DataSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queries" => Ok(SettingsSection::Queries),
            "events" => Ok(SettingsSection::Events),
            other => Err(DataSourceError::UnknownSection(other.to_string())),
        }
    }
}

/// One field change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Query { role: QueryRole, value: String },
    /// Event keys are names so configured extra keys can be edited too
    Event { name: String, value: String },
    VariationIdFormat(VariationIdFormat),
}

impl FieldEdit {
    pub fn query(role: QueryRole, value: impl Into<String>) -> Self {
        FieldEdit::Query {
            role,
            value: value.into(),
        }
    }

    pub fn event(field: EventField, value: impl Into<String>) -> Self {
        FieldEdit::Event {
            name: field.field_name().to_string(),
            value: value.into(),
        }
    }

    /// Builds an edit from a section and field name as submitted by a form
    pub fn parse(section: SettingsSection, name: &str, value: impl Into<String>) -> DataSourceResult<Self> {
        match section {
            SettingsSection::Queries => {
                let role = QueryRole::from_field_name(name).ok_or_else(|| DataSourceError::UnknownField {
                    section: section.as_str().to_string(),
                    name: name.to_string(),
                })?;
                Ok(FieldEdit::query(role, value))
            }
            SettingsSection::Events => {
                if name.is_empty() {
                    return Err(DataSourceError::UnknownField {
                        section: section.as_str().to_string(),
                        name: String::new(),
                    });
                }
                Ok(FieldEdit::Event {
                    name: name.to_string(),
                    value: value.into(),
                })
            }
        }
    }

    /// Parses `queries.<field>=<value>`, `events.<field>=<value>` or
    /// `variationIdFormat=<index|key>`
    pub fn from_assignment(assignment: &str) -> DataSourceResult<Self> {
        let (path, value) = assignment.split_once('=').ok_or_else(|| DataSourceError::UnknownField {
            section: String::new(),
            name: assignment.to_string(),
        })?;

        if path == "variationIdFormat" {
            return Ok(FieldEdit::VariationIdFormat(value.parse()?));
        }

        let (section, name) = path.split_once('.').ok_or_else(|| DataSourceError::UnknownSection(path.to_string()))?;
        Self::parse(section.parse()?, name, value)
    }

    /// Field path for log lines
    pub fn path(&self) -> String {
        match self {
            FieldEdit::Query { role, .. } => format!("queries.{}", role.field_name()),
            FieldEdit::Event { name, .. } => format!("events.{}", name),
            FieldEdit::VariationIdFormat(_) => "variationIdFormat".to_string(),
        }
    }
}
