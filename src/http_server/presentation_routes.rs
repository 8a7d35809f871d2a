//! Presentation HTTP Routes

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::observability::Event;
use crate::presentation::{CustomTheme, Presentation, PresentationOptions, PresentationStore, Slide};

use super::errors::ServerResult;

// ==================
// Shared State
// ==================

#[derive(Debug, Default)]
pub struct PresentationState {
    pub store: PresentationStore,
}

impl PresentationState {
    pub fn new() -> Self {
        Self::default()
    }
}

// ==================
// Request/Response Types
// ==================

/// Editable fields of a presentation. Used for both create and replace.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PresentationBody {
    pub user_id: String,
    pub organization: String,
    pub title: String,
    pub description: String,
    pub options: PresentationOptions,
    pub slides: Vec<Slide>,
    pub theme: String,
    pub custom_theme: Option<CustomTheme>,
    pub sharable: bool,
    pub voting: bool,
}

impl PresentationBody {
    fn apply_to(self, presentation: &mut Presentation) {
        presentation.user_id = self.user_id;
        presentation.organization = self.organization;
        presentation.title = self.title;
        presentation.description = self.description;
        presentation.options = self.options;
        presentation.slides = self.slides;
        presentation.theme = self.theme;
        presentation.custom_theme = self.custom_theme;
        presentation.sharable = self.sharable;
        presentation.voting = self.voting;
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub organization: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PresentationListResponse {
    pub presentations: Vec<Presentation>,
    pub total: usize,
}

// ==================
// Routes
// ==================

pub fn presentation_routes(state: Arc<PresentationState>) -> Router {
    Router::new()
        .route("/presentations", get(list_presentations_handler))
        .route("/presentation", post(create_presentation_handler))
        .route(
            "/presentation/:id",
            get(get_presentation_handler)
                .put(update_presentation_handler)
                .delete(delete_presentation_handler),
        )
        .with_state(state)
}

async fn list_presentations_handler(
    State(state): State<Arc<PresentationState>>,
    Query(query): Query<ListQuery>,
) -> ServerResult<Json<PresentationListResponse>> {
    let presentations = state.store.list(query.organization.as_deref())?;
    Ok(Json(PresentationListResponse {
        total: presentations.len(),
        presentations,
    }))
}

async fn create_presentation_handler(
    State(state): State<Arc<PresentationState>>,
    Json(body): Json<PresentationBody>,
) -> ServerResult<(StatusCode, Json<Presentation>)> {
    let mut presentation = Presentation::new("", "", "");
    body.apply_to(&mut presentation);
    let created = state.store.create(presentation)?;
    info!(event = %Event::PresentationSaved, presentation_id = %created.id, "presentation created");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_presentation_handler(
    State(state): State<Arc<PresentationState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Presentation>> {
    Ok(Json(state.store.get(&id)?))
}

async fn update_presentation_handler(
    State(state): State<Arc<PresentationState>>,
    Path(id): Path<String>,
    Json(body): Json<PresentationBody>,
) -> ServerResult<Json<Presentation>> {
    let mut presentation = state.store.get(&id)?;
    body.apply_to(&mut presentation);
    let saved = state.store.update(presentation)?;
    info!(event = %Event::PresentationSaved, presentation_id = %saved.id, "presentation updated");
    Ok(Json(saved))
}

async fn delete_presentation_handler(
    State(state): State<Arc<PresentationState>>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    state.store.delete(&id)?;
    info!(event = %Event::PresentationDeleted, presentation_id = %id, "presentation deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_replaces_editable_fields_only() {
        let mut deck = Presentation::new("u_1", "org_1", "Old");
        let id = deck.id.clone();
        let created = deck.date_created;

        let body: PresentationBody = serde_json::from_value(json!({
            "organization": "org_1",
            "title": "New",
            "slides": [{"type": "metric", "id": "met_1"}],
            "voting": true
        }))
        .unwrap();
        body.apply_to(&mut deck);

        assert_eq!(deck.id, id);
        assert_eq!(deck.date_created, created);
        assert_eq!(deck.title, "New");
        assert_eq!(deck.user_id, "");
        assert_eq!(deck.slides.len(), 1);
        assert!(deck.voting);
    }
}
