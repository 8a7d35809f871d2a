//! Data source HTTP Routes
//!
//! The persistence endpoint the settings editor talks to. Reads return the
//! stored record as-is (settings may be absent or legacy-shaped). Writes
//! replace the whole record and only ever store canonical settings.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::datasource::{DataSourceRecord, NormalizeOptions, SettingsNormalizer};
use crate::observability::Event;

use super::errors::{ServerError, ServerResult};

// ==================
// Shared State
// ==================

/// Stored data sources, keyed by id
pub struct DatasourceState {
    records: RwLock<BTreeMap<String, DataSourceRecord>>,
    normalizer: SettingsNormalizer,
}

impl DatasourceState {
    pub fn new() -> Self {
        Self::with_options(NormalizeOptions::default())
    }

    pub fn with_options(options: NormalizeOptions) -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            normalizer: SettingsNormalizer::new(options),
        }
    }

    /// Stores a record without touching its settings
    pub fn insert(&self, record: DataSourceRecord) -> ServerResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| ServerError::Internal("Lock poisoned".into()))?;
        records.insert(record.id.clone(), record);
        Ok(())
    }

    pub fn get(&self, id: &str) -> ServerResult<DataSourceRecord> {
        let records = self
            .records
            .read()
            .map_err(|_| ServerError::Internal("Lock poisoned".into()))?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| ServerError::NotFound(format!("Data source not found: {}", id)))
    }

    pub fn list(&self) -> ServerResult<Vec<DataSourceRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| ServerError::Internal("Lock poisoned".into()))?;
        Ok(records.values().cloned().collect())
    }

    /// Replaces an existing record. Settings are normalized before storing.
    pub fn replace(&self, id: &str, mut record: DataSourceRecord) -> ServerResult<DataSourceRecord> {
        if record.id != id {
            return Err(ServerError::BadRequest(format!(
                "body id '{}' does not match path id '{}'",
                record.id, id
            )));
        }

        let mut records = self
            .records
            .write()
            .map_err(|_| ServerError::Internal("Lock poisoned".into()))?;
        if !records.contains_key(id) {
            return Err(ServerError::NotFound(format!("Data source not found: {}", id)));
        }

        let settings = self.normalizer.normalize(record.settings.as_ref());
        record.settings = Some(settings.to_value());
        records.insert(id.to_string(), record.clone());
        Ok(record)
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DatasourceState {
    fn default() -> Self {
        Self::new()
    }
}

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct DatasourceListResponse {
    pub datasources: Vec<DataSourceRecord>,
    pub total: usize,
}

// ==================
// Routes
// ==================

pub fn datasource_routes(state: Arc<DatasourceState>) -> Router {
    Router::new()
        .route("/datasources", get(list_datasources_handler))
        .route(
            "/datasource/:id",
            get(get_datasource_handler).put(update_datasource_handler),
        )
        .with_state(state)
}

async fn list_datasources_handler(
    State(state): State<Arc<DatasourceState>>,
) -> ServerResult<Json<DatasourceListResponse>> {
    let datasources = state.list()?;
    Ok(Json(DatasourceListResponse {
        total: datasources.len(),
        datasources,
    }))
}

async fn get_datasource_handler(
    State(state): State<Arc<DatasourceState>>,
    Path(id): Path<String>,
) -> ServerResult<Json<DataSourceRecord>> {
    let record = state.get(&id)?;
    debug!(event = %Event::DatasourceRead, datasource_id = %id, "data source read");
    Ok(Json(record))
}

async fn update_datasource_handler(
    State(state): State<Arc<DatasourceState>>,
    Path(id): Path<String>,
    Json(record): Json<DataSourceRecord>,
) -> ServerResult<Json<DataSourceRecord>> {
    let stored = state.replace(&id, record)?;
    info!(
        event = %Event::DatasourceUpdated,
        datasource_id = %id,
        datasource_type = %stored.datasource_type,
        "data source updated"
    );
    Ok(Json(stored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::{DataSourceType, VariationIdFormat};
    use serde_json::json;

    #[test]
    fn test_replace_normalizes_legacy_settings() {
        let state = DatasourceState::new();
        state.insert(DataSourceRecord::new("ds_1", DataSourceType::Postgres)).unwrap();

        let incoming = DataSourceRecord::new("ds_1", DataSourceType::Postgres).with_settings(json!({
            "experiments": {"variationFormat": "key"},
            "queries": {"usersQuery": "SELECT 1"}
        }));
        let stored = state.replace("ds_1", incoming).unwrap();
        let settings = stored.settings.unwrap();

        assert_eq!(settings["variationIdFormat"], VariationIdFormat::Key.as_str());
        assert_eq!(settings["queries"]["usersQuery"], "SELECT 1");
        assert!(settings.get("experiments").is_none());
    }

    #[test]
    fn test_replace_unknown_id() {
        let state = DatasourceState::new();
        let err = state
            .replace("ds_x", DataSourceRecord::new("ds_x", DataSourceType::Redshift))
            .unwrap_err();
        assert!(matches!(err, ServerError::NotFound(_)));
    }

    #[test]
    fn test_replace_id_mismatch() {
        let state = DatasourceState::new();
        state.insert(DataSourceRecord::new("ds_1", DataSourceType::MySql)).unwrap();
        let err = state
            .replace("ds_1", DataSourceRecord::new("ds_2", DataSourceType::MySql))
            .unwrap_err();
        assert!(matches!(err, ServerError::BadRequest(_)));
    }

    #[test]
    fn test_list_is_ordered_by_id() {
        let state = DatasourceState::new();
        state.insert(DataSourceRecord::new("ds_b", DataSourceType::MySql)).unwrap();
        state.insert(DataSourceRecord::new("ds_a", DataSourceType::MySql)).unwrap();
        let ids: Vec<String> = state.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["ds_a", "ds_b"]);
    }
}
