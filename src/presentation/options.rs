//! Display options for presentations and slides
//!
//! Options are set at the presentation level and optionally per slide. A
//! value set on a slide overrides the presentation's value for that field
//! only.

use serde::{Deserialize, Serialize};

/// Display toggles. Unset fields inherit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_screen_shots: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_graphs: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_insights: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph_type: Option<String>,
    /// Metric ids to leave out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_metric: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_risk: Option<bool>,
}

impl PresentationOptions {
    /// `overrides` on top of `self`, field by field
    pub fn overlay(&self, overrides: &PresentationOptions) -> PresentationOptions {
        PresentationOptions {
            show_screen_shots: overrides.show_screen_shots.or(self.show_screen_shots),
            show_graphs: overrides.show_graphs.or(self.show_graphs),
            show_insights: overrides.show_insights.or(self.show_insights),
            graph_type: overrides.graph_type.clone().or_else(|| self.graph_type.clone()),
            hide_metric: overrides.hide_metric.clone().or_else(|| self.hide_metric.clone()),
            hide_risk: overrides.hide_risk.or(self.hide_risk),
        }
    }

    /// Concrete values, with anything still unset taking its default
    pub fn resolve(&self) -> ResolvedOptions {
        ResolvedOptions {
            show_screen_shots: self.show_screen_shots.unwrap_or(true),
            show_graphs: self.show_graphs.unwrap_or(true),
            show_insights: self.show_insights.unwrap_or(true),
            graph_type: self.graph_type.clone(),
            hide_metric: self.hide_metric.clone().unwrap_or_default(),
            hide_risk: self.hide_risk.unwrap_or(false),
        }
    }
}

/// Options with every toggle decided
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOptions {
    pub show_screen_shots: bool,
    pub show_graphs: bool,
    pub show_insights: bool,
    pub graph_type: Option<String>,
    pub hide_metric: Vec<String>,
    pub hide_risk: bool,
}

impl ResolvedOptions {
    pub fn shows_metric(&self, metric_id: &str) -> bool {
        !self.hide_metric.iter().any(|m| m == metric_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_overrides_field_by_field() {
        let deck = PresentationOptions {
            show_graphs: Some(false),
            hide_risk: Some(true),
            graph_type: Some("violin".into()),
            ..Default::default()
        };
        let slide = PresentationOptions {
            show_graphs: Some(true),
            ..Default::default()
        };

        let merged = deck.overlay(&slide);
        assert_eq!(merged.show_graphs, Some(true));
        assert_eq!(merged.hide_risk, Some(true));
        assert_eq!(merged.graph_type.as_deref(), Some("violin"));
    }

    #[test]
    fn test_resolve_defaults() {
        let resolved = PresentationOptions::default().resolve();
        assert!(resolved.show_screen_shots);
        assert!(resolved.show_graphs);
        assert!(resolved.show_insights);
        assert!(!resolved.hide_risk);
        assert!(resolved.hide_metric.is_empty());
        assert!(resolved.shows_metric("met_revenue"));
    }

    #[test]
    fn test_hidden_metric_list_replaced_not_merged() {
        let deck = PresentationOptions {
            hide_metric: Some(vec!["met_a".into()]),
            ..Default::default()
        };
        let slide = PresentationOptions {
            hide_metric: Some(vec!["met_b".into()]),
            ..Default::default()
        };
        let resolved = deck.overlay(&slide).resolve();
        assert!(resolved.shows_metric("met_a"));
        assert!(!resolved.shows_metric("met_b"));
    }

    #[test]
    fn test_unset_fields_are_not_serialized() {
        let json = serde_json::to_value(PresentationOptions {
            hide_risk: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"hideRisk": false}));
    }
}
