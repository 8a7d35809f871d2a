//! Data source settings editing sessions
//!
//! Dirty-state tracking, single-field updates, presets, and guarded
//! submission to the persistence endpoint.

mod controller;
mod edit;
mod errors;
mod state;

pub use controller::{CancelHandle, FormOptions, SettingsForm, DEFAULT_SAVE_TIMEOUT};
pub use edit::{FieldEdit, SettingsSection};
pub use errors::{FormError, FormResult};
pub use state::{FormState, SubmitOutcome};
