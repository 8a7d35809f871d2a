//! Settings Form Flow Tests
//!
//! End-to-end editing sessions against the in-memory persistence client:
//! - First-time setup yields templates, `index` format, empty events
//! - Edits touch one field and mark the session dirty
//! - Submit sends the whole working copy once, then the session is clean
//! - Failed saves keep the working copy and the dirty state
//! - Event-based providers edit events, not queries

use std::sync::Arc;
use std::time::Duration;

use dsconfig::client::{ApiError, MemoryDataSourceApi};
use dsconfig::datasource::{
    segment, ConnectionParams, DataSourceRecord, DataSourceType, EventField, QueryRole, VariationIdFormat,
};
use dsconfig::form::{FieldEdit, FormError, FormOptions, FormState, SettingsForm, SubmitOutcome};
use dsconfig::telemetry::MemoryTracker;
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn session(api: &Arc<MemoryDataSourceApi>, tracker: &Arc<MemoryTracker>) -> SettingsForm {
    SettingsForm::new(api.clone(), tracker.clone(), "datasource-page")
}

fn redshift(id: &str) -> DataSourceRecord {
    DataSourceRecord::new(id, DataSourceType::Redshift).with_params(ConnectionParams::with_schema("analytics"))
}

// =============================================================================
// First-Time Setup
// =============================================================================

/// A data source with no settings starts from generated templates.
#[tokio::test]
async fn test_first_time_setup_uses_templates() {
    let api = Arc::new(MemoryDataSourceApi::new().with_record(redshift("ds_1")));
    let tracker = Arc::new(MemoryTracker::new());
    let mut form = session(&api, &tracker);

    assert_eq!(form.state(), FormState::Loading);
    assert!(form.load_from_api("ds_1").await.unwrap());
    assert_eq!(form.state(), FormState::Clean);

    let settings = form.settings().unwrap();
    assert_eq!(settings.variation_id_format, VariationIdFormat::Index);
    for field in EventField::ALL {
        assert_eq!(settings.events.get(field), "");
    }
    for role in QueryRole::ALL {
        let query = settings.queries.get(role);
        assert!(query.starts_with("SELECT"), "{} was {:?}", role.field_name(), query);
        assert!(query.contains("analytics."));
    }
    assert!(settings.queries.users_query.contains("analytics.identifies"));
}

/// Legacy table descriptors shape the generated templates.
#[tokio::test]
async fn test_legacy_descriptors_shape_templates() {
    let record = redshift("ds_legacy").with_settings(json!({
        "experiments": {
            "table": "raw.exposures",
            "variationColumn": "variant",
            "variationFormat": "key"
        },
        "queries": {"pageviewsQuery": "SELECT * FROM my_pages"}
    }));
    let api = Arc::new(MemoryDataSourceApi::new().with_record(record));
    let tracker = Arc::new(MemoryTracker::new());
    let mut form = session(&api, &tracker);
    form.load_from_api("ds_legacy").await.unwrap();

    let settings = form.settings().unwrap();
    assert_eq!(settings.variation_id_format, VariationIdFormat::Key);
    assert_eq!(settings.queries.pageviews_query, "SELECT * FROM my_pages");
    assert!(settings.queries.experiments_query.contains("variant as variation_id"));
    assert!(settings.queries.experiments_query.contains("FROM\n  raw.exposures"));
}

// =============================================================================
// Edit and Submit
// =============================================================================

/// Editing one query keeps its siblings and saves the full working copy once.
#[tokio::test]
async fn test_edit_then_submit_sends_whole_copy() {
    let api = Arc::new(MemoryDataSourceApi::new().with_record(redshift("ds_1")));
    let tracker = Arc::new(MemoryTracker::new());
    let mut form = session(&api, &tracker);
    form.load_from_api("ds_1").await.unwrap();
    let before = form.settings().unwrap().clone();

    form.edit(FieldEdit::query(QueryRole::Experiments, "SELECT * FROM exposures"))
        .unwrap();
    assert_eq!(form.state(), FormState::Dirty);

    assert_eq!(form.submit().await.unwrap(), SubmitOutcome::Saved);
    assert_eq!(form.state(), FormState::Clean);

    let updates = api.updates();
    assert_eq!(updates.len(), 1);
    let sent = &updates[0].settings;
    assert_eq!(sent.queries.experiments_query, "SELECT * FROM exposures");
    assert_eq!(sent.queries.pageviews_query, before.queries.pageviews_query);
    assert_eq!(sent.queries.users_query, before.queries.users_query);
    assert_eq!(sent.events, before.events);

    assert_eq!(
        tracker.names(),
        vec!["View Datasource Settings Form", "Edit Data Source Queries"]
    );
}

/// Submitting a clean session makes no update call.
#[tokio::test]
async fn test_submit_clean_is_noop() {
    let api = Arc::new(MemoryDataSourceApi::new().with_record(redshift("ds_1")));
    let tracker = Arc::new(MemoryTracker::new());
    let mut form = session(&api, &tracker);
    form.load_from_api("ds_1").await.unwrap();

    assert_eq!(form.submit().await.unwrap(), SubmitOutcome::Skipped);
    assert_eq!(api.update_count(), 0);
}

/// A preset replaces all three queries and leaves events alone.
#[tokio::test]
async fn test_preset_overwrites_queries() {
    let record = redshift("ds_1").with_settings(json!({
        "queries": {"usersQuery": "SELECT custom FROM people"},
        "events": {"experimentEvent": "viewed"}
    }));
    let api = Arc::new(MemoryDataSourceApi::new().with_record(record));
    let tracker = Arc::new(MemoryTracker::new());
    let mut form = session(&api, &tracker);
    form.load_from_api("ds_1").await.unwrap();

    form.apply_preset("segment").unwrap();
    assert!(form.is_dirty());

    let settings = form.settings().unwrap();
    assert_eq!(settings.queries, *segment().queries());
    assert_eq!(settings.events.experiment_event, "viewed");
}

// =============================================================================
// Failure Handling
// =============================================================================

/// A rejected save hands back the endpoint's message and stays dirty.
#[tokio::test]
async fn test_failed_save_preserves_working_copy() {
    let api = Arc::new(MemoryDataSourceApi::new().with_record(redshift("ds_1")));
    let tracker = Arc::new(MemoryTracker::new());
    let mut form = session(&api, &tracker);
    form.load_from_api("ds_1").await.unwrap();
    form.set_field("queries", "usersQuery", "SELECT 1").unwrap();

    api.fail_updates(ApiError::Rejected("warehouse is read-only".into()));
    let err = form.submit().await.unwrap_err();
    assert_eq!(err.to_string(), "warehouse is read-only");
    assert_eq!(form.state(), FormState::Dirty);
    assert_eq!(form.settings().unwrap().queries.users_query, "SELECT 1");

    // No retry happened behind our back.
    assert_eq!(api.update_count(), 1);

    api.clear_failure();
    assert_eq!(form.submit().await.unwrap(), SubmitOutcome::Saved);
    let stored = api.record("ds_1").unwrap().settings.unwrap();
    assert_eq!(stored["queries"]["usersQuery"], "SELECT 1");
}

/// A load arriving while edits are pending does not clobber them.
#[tokio::test]
async fn test_reload_ignored_while_dirty() {
    let api = Arc::new(MemoryDataSourceApi::new().with_record(redshift("ds_1")));
    let tracker = Arc::new(MemoryTracker::new());
    let mut form = session(&api, &tracker);
    form.load_from_api("ds_1").await.unwrap();
    form.edit(FieldEdit::VariationIdFormat(VariationIdFormat::Key)).unwrap();

    assert!(!form.load_from_api("ds_1").await.unwrap());
    assert_eq!(form.settings().unwrap().variation_id_format, VariationIdFormat::Key);
}

/// A stalled endpoint trips the save timeout.
#[tokio::test]
async fn test_save_timeout() {
    let api = Arc::new(
        MemoryDataSourceApi::new()
            .with_delay(Duration::from_secs(5))
            .with_record(redshift("ds_1")),
    );
    let tracker = Arc::new(MemoryTracker::new());
    let options = FormOptions {
        save_timeout: Some(Duration::from_millis(50)),
        ..Default::default()
    };
    let mut form = SettingsForm::with_options(api.clone(), tracker.clone(), "test", options);
    form.load_from_api("ds_1").await.unwrap();
    form.edit(FieldEdit::query(QueryRole::Users, "SELECT 2")).unwrap();

    let err = form.submit().await.unwrap_err();
    assert_eq!(err, FormError::Timeout(Duration::from_millis(50)));
    assert!(form.is_dirty());
}

// =============================================================================
// Provider Capabilities
// =============================================================================

/// Event-based providers edit events; queries are off limits.
#[tokio::test]
async fn test_mixpanel_edits_events() {
    let api = Arc::new(MemoryDataSourceApi::new().with_record(DataSourceRecord::new(
        "ds_mp",
        DataSourceType::Mixpanel,
    )));
    let tracker = Arc::new(MemoryTracker::new());
    let mut form = session(&api, &tracker);
    form.load_from_api("ds_mp").await.unwrap();

    assert!(matches!(
        form.edit(FieldEdit::query(QueryRole::Users, "SELECT 1")),
        Err(FormError::EditNotSupported { .. })
    ));
    assert!(form.apply_preset("segment").is_err());
    assert_eq!(form.state(), FormState::Clean);

    form.edit(FieldEdit::event(EventField::ExperimentEvent, "$experiment_started"))
        .unwrap();
    form.submit().await.unwrap();

    let sent = &api.updates()[0].settings;
    assert_eq!(sent.events.experiment_event, "$experiment_started");
    assert_eq!(sent.events.pageview_event, "");
}

/// Google Analytics exposes no editable settings.
#[tokio::test]
async fn test_google_analytics_is_read_only() {
    let api = Arc::new(MemoryDataSourceApi::new().with_record(DataSourceRecord::new(
        "ds_ga",
        DataSourceType::GoogleAnalytics,
    )));
    let tracker = Arc::new(MemoryTracker::new());
    let mut form = session(&api, &tracker);
    form.load_from_api("ds_ga").await.unwrap();

    assert!(!form.capabilities().unwrap().settings_supported());
    assert!(form
        .edit(FieldEdit::VariationIdFormat(VariationIdFormat::Key))
        .is_err());
}
