//! # Presentation Documents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::{PresentationError, PresentationResult};
use super::options::{PresentationOptions, ResolvedOptions};

/// What a slide shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideType {
    Experiment,
    Metric,
}

/// One slide, referencing an experiment or metric by id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(rename = "type")]
    pub slide_type: SlideType,
    pub id: String,
    #[serde(default)]
    pub options: PresentationOptions,
}

impl Slide {
    pub fn experiment(id: impl Into<String>) -> Self {
        Self {
            slide_type: SlideType::Experiment,
            id: id.into(),
            options: PresentationOptions::default(),
        }
    }

    pub fn metric(id: impl Into<String>) -> Self {
        Self {
            slide_type: SlideType::Metric,
            id: id.into(),
            options: PresentationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PresentationOptions) -> Self {
        self.options = options;
        self
    }
}

/// Theme overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomTheme {
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub text_color: String,
    #[serde(default)]
    pub heading_font: String,
    #[serde(default)]
    pub body_font: String,
}

/// A deck of experiment/metric slides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: PresentationOptions,
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_theme: Option<CustomTheme>,
    #[serde(default)]
    pub sharable: bool,
    #[serde(default)]
    pub voting: bool,
    pub date_created: DateTime<Utc>,
    pub date_updated: DateTime<Utc>,
}

impl Presentation {
    /// New empty deck with a generated id
    pub fn new(user_id: impl Into<String>, organization: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: format!("pres_{}", Uuid::new_v4().simple()),
            user_id: user_id.into(),
            organization: organization.into(),
            title: title.into(),
            description: String::new(),
            options: PresentationOptions::default(),
            slides: Vec::new(),
            theme: String::new(),
            custom_theme: None,
            sharable: false,
            voting: false,
            date_created: now,
            date_updated: now,
        }
    }

    pub fn with_slide(mut self, slide: Slide) -> Self {
        self.slides.push(slide);
        self
    }

    /// Options in effect for the slide at `index`
    pub fn slide_options(&self, index: usize) -> Option<ResolvedOptions> {
        let slide = self.slides.get(index)?;
        Some(self.options.overlay(&slide.options).resolve())
    }

    pub fn validate(&self) -> PresentationResult<()> {
        if self.id.trim().is_empty() {
            return Err(PresentationError::Invalid("id must not be empty".into()));
        }
        if let Some(position) = self.slides.iter().position(|s| s.id.trim().is_empty()) {
            return Err(PresentationError::Invalid(format!(
                "slide {} has no experiment or metric id",
                position
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slide_options_inherit_and_override() {
        let mut deck = Presentation::new("u_1", "org_1", "Q3 results")
            .with_slide(Slide::experiment("exp_1"))
            .with_slide(Slide::metric("met_1").with_options(PresentationOptions {
                show_graphs: Some(true),
                ..Default::default()
            }));
        deck.options.show_graphs = Some(false);

        assert!(!deck.slide_options(0).unwrap().show_graphs);
        assert!(deck.slide_options(1).unwrap().show_graphs);
        assert!(deck.slide_options(2).is_none());
    }

    #[test]
    fn test_decode_stored_document() {
        let deck: Presentation = serde_json::from_value(json!({
            "id": "pres_1",
            "userId": "u_1",
            "organization": "org_1",
            "title": "Weekly",
            "slides": [{"type": "experiment", "id": "exp_9", "options": {"hideRisk": true}}],
            "customTheme": {"backgroundColor": "#000", "textColor": "#fff"},
            "sharable": true,
            "dateCreated": "2024-01-01T00:00:00Z",
            "dateUpdated": "2024-01-02T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(deck.slides[0].slide_type, SlideType::Experiment);
        assert_eq!(deck.slides[0].options.hide_risk, Some(true));
        assert_eq!(deck.custom_theme.unwrap().text_color, "#fff");
        assert!(deck.sharable);
        assert!(!deck.voting);
    }

    #[test]
    fn test_validate_rejects_blank_slide_id() {
        let deck = Presentation::new("u", "o", "t").with_slide(Slide::metric(" "));
        assert!(matches!(deck.validate(), Err(PresentationError::Invalid(_))));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = Presentation::new("u", "o", "t");
        let b = Presentation::new("u", "o", "t");
        assert_ne!(a.id, b.id);
        assert!(a.validate().is_ok());
    }
}
