//! Data source settings model
//!
//! - Canonical settings types and provider kinds
//! - Lenient reader for stored (possibly legacy) settings
//! - Query template library
//! - Settings normalizer
//! - Provider capabilities and event field set
//! - Query presets

mod capability;
mod errors;
mod normalize;
mod presets;
mod raw;
pub mod templates;
mod types;

pub use capability::{event_field_spec, Capabilities, EditMode, EventFieldSpec, EventGroup, EVENT_FIELDS};
pub use errors::{DataSourceError, DataSourceResult};
pub use normalize::{normalize, resolve_variation_id_format, NormalizeOptions, SettingsNormalizer};
pub use presets::{segment, Preset, PresetRegistry, SEGMENT};
pub use raw::RawSettings;
pub use types::{
    ConnectionParams, DataSource, DataSourceRecord, DataSourceSettings, DataSourceType, EventField,
    EventSettings, Queries, QueryRole, VariationIdFormat,
};
