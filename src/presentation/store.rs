//! # Presentation Registry
//!
//! In-memory document registry. Every write replaces a whole document.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use super::errors::{PresentationError, PresentationResult};
use super::types::Presentation;

#[derive(Debug, Default)]
pub struct PresentationStore {
    by_id: RwLock<HashMap<String, Presentation>>,
}

impl PresentationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, presentation: Presentation) -> PresentationResult<Presentation> {
        presentation.validate()?;
        let mut by_id = self
            .by_id
            .write()
            .map_err(|_| PresentationError::Internal("Lock poisoned".into()))?;
        if by_id.contains_key(&presentation.id) {
            return Err(PresentationError::AlreadyExists(presentation.id));
        }
        by_id.insert(presentation.id.clone(), presentation.clone());
        Ok(presentation)
    }

    pub fn get(&self, id: &str) -> PresentationResult<Presentation> {
        let by_id = self
            .by_id
            .read()
            .map_err(|_| PresentationError::Internal("Lock poisoned".into()))?;
        by_id
            .get(id)
            .cloned()
            .ok_or_else(|| PresentationError::NotFound(id.to_string()))
    }

    /// Replaces a stored document. Creation date is kept; update date is set
    /// to now.
    pub fn update(&self, mut presentation: Presentation) -> PresentationResult<Presentation> {
        presentation.validate()?;
        let mut by_id = self
            .by_id
            .write()
            .map_err(|_| PresentationError::Internal("Lock poisoned".into()))?;
        let existing = by_id
            .get(&presentation.id)
            .ok_or_else(|| PresentationError::NotFound(presentation.id.clone()))?;

        presentation.date_created = existing.date_created;
        presentation.date_updated = Utc::now();
        by_id.insert(presentation.id.clone(), presentation.clone());
        Ok(presentation)
    }

    pub fn delete(&self, id: &str) -> PresentationResult<()> {
        let mut by_id = self
            .by_id
            .write()
            .map_err(|_| PresentationError::Internal("Lock poisoned".into()))?;
        by_id
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PresentationError::NotFound(id.to_string()))
    }

    /// All documents, optionally for one organization, newest first
    pub fn list(&self, organization: Option<&str>) -> PresentationResult<Vec<Presentation>> {
        let by_id = self
            .by_id
            .read()
            .map_err(|_| PresentationError::Internal("Lock poisoned".into()))?;
        let mut presentations: Vec<Presentation> = by_id
            .values()
            .filter(|p| organization.map_or(true, |org| p.organization == org))
            .cloned()
            .collect();
        presentations.sort_by(|a, b| b.date_created.cmp(&a.date_created).then_with(|| a.id.cmp(&b.id)));
        Ok(presentations)
    }

    pub fn len(&self) -> usize {
        self.by_id.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
