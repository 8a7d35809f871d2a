//! Settings normalizer
//!
//! Reconciles raw stored settings (absent, partial, or legacy-shaped) into
//! the canonical [`DataSourceSettings`]. Normalizing already canonical
//! settings yields the same value.
//!
//! `variationIdFormat` precedence is fixed, not a merge:
//!
//! 1. current-shape `variationIdFormat`
//! 2. legacy `experiments.variationFormat`
//! 3. `index`

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::raw::RawSettings;
use super::templates;
use super::types::{ConnectionParams, DataSourceSettings, EventField, EventSettings, Queries, QueryRole, VariationIdFormat};

/// Normalizer behavior switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Keep `events` keys outside the known field set (default: drop)
    #[serde(default)]
    pub preserve_unknown_events: bool,
}

/// Builds canonical settings from raw stored settings
#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsNormalizer {
    options: NormalizeOptions,
}

impl SettingsNormalizer {
    pub fn new(options: NormalizeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> NormalizeOptions {
        self.options
    }

    /// Canonical settings. Missing queries stay empty.
    pub fn normalize(&self, raw: Option<&Value>) -> DataSourceSettings {
        self.normalize_raw(&RawSettings::new(raw))
    }

    pub fn normalize_raw(&self, raw: &RawSettings<'_>) -> DataSourceSettings {
        let mut queries = Queries::default();
        for role in QueryRole::ALL {
            if let Some(existing) = raw.query(role) {
                queries.set(role, existing);
            }
        }

        DataSourceSettings {
            queries,
            events: self.normalize_events(raw),
            variation_id_format: resolve_variation_id_format(raw),
        }
    }

    fn normalize_events(&self, raw: &RawSettings<'_>) -> EventSettings {
        let mut events = EventSettings::default();
        for (name, value) in raw.events() {
            match EventField::from_field_name(name) {
                Some(field) => events.set(field, value),
                None if self.options.preserve_unknown_events => {
                    events.extra.insert(name.to_string(), value.to_string());
                }
                None => {}
            }
        }
        events
    }

    /// Canonical settings with every missing query filled from the template
    /// library. This is the working copy an editing session starts from.
    pub fn build_working_settings(&self, raw: Option<&Value>, params: &ConnectionParams) -> DataSourceSettings {
        let raw = RawSettings::new(raw);
        let mut settings = self.normalize_raw(&raw);
        settings.queries = templates::default_queries(&raw, params.schema_qualifier());
        settings
    }
}

/// Applies the fixed `variationIdFormat` precedence
pub fn resolve_variation_id_format(raw: &RawSettings<'_>) -> VariationIdFormat {
    raw.variation_id_format()
        .or_else(|| raw.legacy_variation_format())
        .unwrap_or_default()
}

/// Normalizes with default options
pub fn normalize(raw: Option<&Value>) -> DataSourceSettings {
    SettingsNormalizer::default().normalize(raw)
}
