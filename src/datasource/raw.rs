//! Lenient view over stored settings JSON
//!
//! Stored settings may be absent, partial, or in an older shape with
//! per-role table/column descriptors. Every accessor treats a missing key
//! and a value of the wrong JSON type the same way: absent.

use serde_json::{Map, Value};

use super::types::{QueryRole, VariationIdFormat};

/// Borrowed, read-only accessor for raw settings
#[derive(Debug, Clone, Copy, Default)]
pub struct RawSettings<'a> {
    root: Option<&'a Map<String, Value>>,
}

impl<'a> RawSettings<'a> {
    pub fn new(value: Option<&'a Value>) -> Self {
        Self {
            root: value.and_then(Value::as_object),
        }
    }

    /// No stored settings at all (first-time setup)
    pub fn absent() -> Self {
        Self { root: None }
    }

    pub fn is_absent(&self) -> bool {
        self.root.is_none()
    }

    fn object(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.root?.get(key)?.as_object()
    }

    fn non_empty(value: Option<&'a Value>) -> Option<&'a str> {
        value?.as_str().filter(|s| !s.is_empty())
    }

    /// Existing non-empty query for the role
    pub fn query(&self, role: QueryRole) -> Option<&'a str> {
        Self::non_empty(self.object("queries")?.get(role.field_name()))
    }

    /// Current-shape `variationIdFormat`, if recognized
    pub fn variation_id_format(&self) -> Option<VariationIdFormat> {
        Self::non_empty(self.root?.get("variationIdFormat")).and_then(VariationIdFormat::parse)
    }

    /// Legacy `experiments.variationFormat`, if recognized
    pub fn legacy_variation_format(&self) -> Option<VariationIdFormat> {
        self.legacy("experiments", "variationFormat")
            .and_then(VariationIdFormat::parse)
    }

    /// String-valued entries of the `events` object
    pub fn events(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.object("events")
            .into_iter()
            .flat_map(|events| events.iter())
            .filter_map(|(k, v)| v.as_str().map(|v| (k.as_str(), v)))
    }

    /// Non-empty string at `<section>.<key>` in the legacy descriptors
    pub fn legacy(&self, section: &str, key: &str) -> Option<&'a str> {
        Self::non_empty(self.object(section)?.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_settings() {
        let raw = RawSettings::absent();
        assert!(raw.is_absent());
        assert_eq!(raw.query(QueryRole::Users), None);
        assert_eq!(raw.events().count(), 0);
    }

    #[test]
    fn test_non_object_root_is_absent() {
        let value = json!("not settings");
        assert!(RawSettings::new(Some(&value)).is_absent());
    }

    #[test]
    fn test_wrong_types_read_as_absent() {
        let value = json!({
            "queries": {"experimentsQuery": 42, "usersQuery": ""},
            "variationIdFormat": ["key"],
            "events": {"experimentEvent": "$exp", "urlProperty": null},
            "experiments": "legacy"
        });
        let raw = RawSettings::new(Some(&value));
        assert_eq!(raw.query(QueryRole::Experiments), None);
        assert_eq!(raw.query(QueryRole::Users), None);
        assert_eq!(raw.variation_id_format(), None);
        assert_eq!(raw.legacy("experiments", "table"), None);
        let events: Vec<_> = raw.events().collect();
        assert_eq!(events, vec![("experimentEvent", "$exp")]);
    }

    #[test]
    fn test_legacy_descriptors() {
        let value = json!({
            "experiments": {"table": "exposures", "variationFormat": "key"}
        });
        let raw = RawSettings::new(Some(&value));
        assert_eq!(raw.legacy("experiments", "table"), Some("exposures"));
        assert_eq!(raw.legacy_variation_format(), Some(VariationIdFormat::Key));
    }
}
