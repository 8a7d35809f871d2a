//! Query presets
//!
//! A preset is a static bundle of queries for a known ingestion tool's table
//! layout. Applying one overwrites all three queries; it never merges.

use std::collections::BTreeMap;

use super::errors::{DataSourceError, DataSourceResult};
use super::types::{DataSourceSettings, Queries};

pub const SEGMENT: &str = "segment";

/// A named bundle of queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    name: String,
    label: String,
    queries: Queries,
}

impl Preset {
    pub fn new(name: impl Into<String>, label: impl Into<String>, queries: Queries) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            queries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn queries(&self) -> &Queries {
        &self.queries
    }

    /// Replaces the queries sub-object wholesale
    pub fn apply(&self, settings: &mut DataSourceSettings) {
        settings.queries = self.queries.clone();
    }
}

/// Segment warehouse tables (`experiment_viewed`, `pages`, `identifies`)
pub fn segment() -> Preset {
    Preset::new(
        SEGMENT,
        "Segment",
        Queries {
            experiments_query: "SELECT
  user_id,
  anonymous_id,
  received_at as timestamp,
  experiment_id,
  variation_id,
  context_page_path as url,
  context_user_agent as user_agent
FROM
  experiment_viewed"
                .to_string(),
            pageviews_query: "SELECT
  user_id,
  anonymous_id,
  received_at as timestamp,
  path as url,
  context_user_agent as user_agent
FROM
  pages"
                .to_string(),
            users_query: "SELECT
  user_id,
  anonymous_id
FROM
  identifies"
                .to_string(),
        },
    )
}

/// Presets keyed by lowercase name
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: BTreeMap<String, Preset>,
}

impl PresetRegistry {
    /// Registry with no presets
    pub fn empty() -> Self {
        Self {
            presets: BTreeMap::new(),
        }
    }

    /// Registry with the built-in presets
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.presets.insert(SEGMENT.to_string(), segment());
        registry
    }

    pub fn register(&mut self, preset: Preset) -> DataSourceResult<()> {
        let key = preset.name().to_lowercase();
        if self.presets.contains_key(&key) {
            return Err(DataSourceError::DuplicatePreset(preset.name().to_string()));
        }
        self.presets.insert(key, preset);
        Ok(())
    }

    /// Looks a preset up by name, ignoring case
    pub fn get(&self, name: &str) -> DataSourceResult<&Preset> {
        self.presets
            .get(&name.to_lowercase())
            .ok_or_else(|| DataSourceError::UnknownPreset(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.values().map(Preset::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Preset> {
        self.presets.values()
    }

    pub fn apply(&self, name: &str, settings: &mut DataSourceSettings) -> DataSourceResult<&Preset> {
        let preset = self.get(name)?;
        preset.apply(settings);
        Ok(preset)
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::types::{EventField, QueryRole, VariationIdFormat};

    #[test]
    fn test_apply_overwrites_all_queries() {
        let mut settings = DataSourceSettings::default();
        settings.queries.set(QueryRole::Experiments, "SELECT old");
        settings.queries.set(QueryRole::Users, "SELECT older");
        settings.events.set(EventField::PageviewEvent, "Page view");
        settings.variation_id_format = VariationIdFormat::Key;

        PresetRegistry::builtin().apply("segment", &mut settings).unwrap();

        assert_eq!(&settings.queries, segment().queries());
        // Siblings of `queries` are untouched
        assert_eq!(settings.events.pageview_event, "Page view");
        assert_eq!(settings.variation_id_format, VariationIdFormat::Key);
    }

    #[test]
    fn test_lookup_ignores_case() {
        let registry = PresetRegistry::builtin();
        assert_eq!(registry.get("Segment").unwrap().label(), "Segment");
        assert!(matches!(
            registry.get("snowplow"),
            Err(DataSourceError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_register_additional_preset() {
        let mut registry = PresetRegistry::builtin();
        let mut queries = Queries::default();
        queries.set(QueryRole::Users, "SELECT user_id, anonymous_id FROM users");
        registry.register(Preset::new("rudderstack", "RudderStack", queries)).unwrap();

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["rudderstack", "segment"]);
        assert!(matches!(
            registry.register(segment()),
            Err(DataSourceError::DuplicatePreset(_))
        ));
    }
}
