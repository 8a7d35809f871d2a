//! Settings editing session
//!
//! A [`SettingsForm`] owns the working copy of one data source for the
//! length of an editing session. Submission takes `&mut self`, so a second
//! submission for the same session cannot start while one is in flight.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::DataSourceApi;
use crate::datasource::{
    Capabilities, DataSource, DataSourceError, DataSourceRecord, DataSourceSettings, EventField, NormalizeOptions,
    PresetRegistry, SettingsNormalizer,
};
use crate::observability::Event;
use crate::telemetry::{track_quietly, TrackEvent, Tracker};

use super::edit::{FieldEdit, SettingsSection};
use super::errors::{FormError, FormResult};
use super::state::{FormState, SubmitOutcome};

/// Default limit on a single update call
pub const DEFAULT_SAVE_TIMEOUT: Duration = Duration::from_secs(30);

/// Session behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormOptions {
    /// `None` waits for the update call indefinitely
    pub save_timeout: Option<Duration>,
    pub normalize: NormalizeOptions,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            save_timeout: Some(DEFAULT_SAVE_TIMEOUT),
            normalize: NormalizeOptions::default(),
        }
    }
}

/// Cancels the update call in flight, if any.
///
/// A cancel issued while no submit is running has no effect on later ones.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    generation: Arc<watch::Sender<u64>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.generation.send_modify(|g| *g = g.wrapping_add(1));
    }
}

/// Editing session for one data source's settings
pub struct SettingsForm {
    api: Arc<dyn DataSourceApi>,
    tracker: Arc<dyn Tracker>,
    presets: PresetRegistry,
    normalizer: SettingsNormalizer,
    options: FormOptions,
    source: String,
    state: FormState,
    working: Option<DataSource>,
    cancel: Arc<watch::Sender<u64>>,
}

impl SettingsForm {
    /// Opens a session. `source` tags telemetry with where the editor was
    /// opened from.
    pub fn new(api: Arc<dyn DataSourceApi>, tracker: Arc<dyn Tracker>, source: impl Into<String>) -> Self {
        Self::with_options(api, tracker, source, FormOptions::default())
    }

    pub fn with_options(
        api: Arc<dyn DataSourceApi>,
        tracker: Arc<dyn Tracker>,
        source: impl Into<String>,
        options: FormOptions,
    ) -> Self {
        let source = source.into();
        track_quietly(tracker.as_ref(), TrackEvent::ViewSettingsForm { source: source.clone() });

        let (cancel, _) = watch::channel(0u64);
        Self {
            api,
            tracker,
            presets: PresetRegistry::builtin(),
            normalizer: SettingsNormalizer::new(options.normalize),
            options,
            source,
            state: FormState::Loading,
            working: None,
            cancel: Arc::new(cancel),
        }
    }

    /// Replaces the preset registry
    pub fn with_presets(mut self, presets: PresetRegistry) -> Self {
        self.presets = presets;
        self
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == FormState::Dirty
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn presets(&self) -> &PresetRegistry {
        &self.presets
    }

    pub fn working_copy(&self) -> Option<&DataSource> {
        self.working.as_ref()
    }

    pub fn settings(&self) -> Option<&DataSourceSettings> {
        self.working.as_ref().map(|ds| &ds.settings)
    }

    pub fn capabilities(&self) -> Option<Capabilities> {
        self.working.as_ref().map(|ds| ds.datasource_type.capabilities())
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            generation: Arc::clone(&self.cancel),
        }
    }

    /// Derives the working copy from stored data. Ignored (returns `false`)
    /// while unsaved edits are pending.
    pub fn load(&mut self, record: DataSourceRecord) -> bool {
        if self.state.has_unsaved_edits() {
            debug!(event = %Event::FormLoadIgnored, datasource_id = %record.id, state = %self.state, "unsaved edits pending");
            return false;
        }

        let settings = self
            .normalizer
            .build_working_settings(record.settings.as_ref(), &record.params);
        info!(
            event = %Event::FormLoaded,
            datasource_id = %record.id,
            datasource_type = %record.datasource_type,
            "working copy loaded"
        );

        self.working = Some(DataSource {
            id: record.id,
            name: record.name,
            datasource_type: record.datasource_type,
            params: record.params,
            settings,
        });
        self.state = FormState::Clean;
        true
    }

    /// Fetches the data source and loads it
    pub async fn load_from_api(&mut self, id: &str) -> FormResult<bool> {
        let record = self.api.get_datasource(id).await.map_err(FormError::Load)?;
        Ok(self.load(record))
    }

    fn working_mut(&mut self) -> FormResult<&mut DataSource> {
        self.working.as_mut().ok_or(FormError::NotLoaded)
    }

    fn check_allowed(&self, edit: &FieldEdit) -> FormResult<()> {
        let working = self.working.as_ref().ok_or(FormError::NotLoaded)?;
        let caps = working.datasource_type.capabilities();
        let allowed = match edit {
            FieldEdit::Query { .. } => caps.edits_queries(),
            FieldEdit::Event { .. } => caps.edits_events(),
            FieldEdit::VariationIdFormat(_) => caps.edits_variation_id_format(),
        };
        if allowed {
            Ok(())
        } else {
            Err(FormError::EditNotSupported {
                datasource_type: working.datasource_type,
                mode: caps.edit_mode,
                field: edit.path(),
            })
        }
    }

    /// Changes one field, keeping every sibling
    pub fn edit(&mut self, edit: FieldEdit) -> FormResult<()> {
        self.check_allowed(&edit)?;
        let path = edit.path();
        let preserve_unknown = self.options.normalize.preserve_unknown_events;
        let working = self.working_mut()?;

        match edit {
            FieldEdit::Query { role, value } => working.settings.queries.set(role, value),
            FieldEdit::Event { name, value } => match EventField::from_field_name(&name) {
                Some(field) => working.settings.events.set(field, value),
                None if preserve_unknown => {
                    working.settings.events.extra.insert(name, value);
                }
                None => {
                    return Err(FormError::Settings(DataSourceError::UnknownField {
                        section: SettingsSection::Events.as_str().to_string(),
                        name,
                    }))
                }
            },
            FieldEdit::VariationIdFormat(format) => working.settings.variation_id_format = format,
        }

        debug!(event = %Event::FieldEdited, field = %path, "field edited");
        self.state = FormState::Dirty;
        Ok(())
    }

    /// Parses and applies a form-style field change
    pub fn set_field(&mut self, section: &str, name: &str, value: impl Into<String>) -> FormResult<()> {
        let edit = FieldEdit::parse(section.parse()?, name, value)?;
        self.edit(edit)
    }

    /// Overwrites all three queries with a named preset
    pub fn apply_preset(&mut self, name: &str) -> FormResult<()> {
        let working = self.working.as_ref().ok_or(FormError::NotLoaded)?;
        let caps = working.datasource_type.capabilities();
        if !caps.supports_presets() {
            return Err(FormError::EditNotSupported {
                datasource_type: working.datasource_type,
                mode: caps.edit_mode,
                field: "queries".to_string(),
            });
        }

        let preset = self.presets.get(name)?.clone();
        let working = self.working_mut()?;
        preset.apply(&mut working.settings);

        info!(event = %Event::PresetApplied, preset = preset.name(), "preset applied");
        self.state = FormState::Dirty;
        Ok(())
    }

    /// Persists the working copy if it has unsaved edits.
    ///
    /// On failure the working copy is left as it was, the session returns to
    /// `Dirty`, and the error is handed back unchanged. There is no retry.
    pub async fn submit(&mut self) -> FormResult<SubmitOutcome> {
        match self.state {
            FormState::Loading => return Err(FormError::NotLoaded),
            FormState::Clean => {
                debug!(event = %Event::SaveSkipped, "nothing to save");
                return Ok(SubmitOutcome::Skipped);
            }
            FormState::Dirty | FormState::Saving => {}
        }

        let working = self.working.as_ref().ok_or(FormError::NotLoaded)?;
        let id = working.id.clone();
        let datasource_type = working.datasource_type;
        let timeout = self.options.save_timeout;

        let saving = SavingGuard::begin(&mut self.state);
        info!(event = %Event::SaveBegin, datasource_id = %id, "saving settings");

        // Subscribing marks the current generation as seen; only cancels
        // issued from here on resolve `changed()`.
        let mut cancelled = self.cancel.subscribe();
        let update = self.api.update_datasource(&id, working);
        let save = async move {
            match timeout {
                Some(limit) => match tokio::time::timeout(limit, update).await {
                    Ok(result) => result.map_err(FormError::Save),
                    Err(_) => Err(FormError::Timeout(limit)),
                },
                None => update.await.map_err(FormError::Save),
            }
        };

        let result = tokio::select! {
            result = save => result,
            _ = cancelled.changed() => Err(FormError::Cancelled),
        };

        match result {
            Ok(()) => {
                saving.settle(FormState::Clean);
                info!(event = %Event::SaveComplete, datasource_id = %id, "settings saved");
                track_quietly(
                    self.tracker.as_ref(),
                    TrackEvent::EditQueries {
                        datasource_type,
                        source: self.source.clone(),
                    },
                );
                Ok(SubmitOutcome::Saved)
            }
            Err(e) => {
                saving.settle(FormState::Dirty);
                warn!(event = %Event::SaveFailed, datasource_id = %id, error = %e, "save failed");
                Err(e)
            }
        }
    }
}

/// Holds the session in `Saving`; falls back to `Dirty` if the save
/// future is dropped before it settles.
struct SavingGuard<'a> {
    state: &'a mut FormState,
    settled: bool,
}

impl<'a> SavingGuard<'a> {
    fn begin(state: &'a mut FormState) -> Self {
        *state = FormState::Saving;
        Self { state, settled: false }
    }

    fn settle(mut self, next: FormState) {
        *self.state = next;
        self.settled = true;
    }
}

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *self.state = FormState::Dirty;
        }
    }
}
