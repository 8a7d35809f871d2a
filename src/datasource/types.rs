//! Data source type definitions
//!
//! The canonical settings shape is the only shape ever written. Field names
//! on the wire are camelCase.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::DataSourceError;

/// Provider kinds a data source can connect to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSourceType {
    #[serde(rename = "redshift")]
    Redshift,
    #[serde(rename = "athena")]
    Athena,
    #[serde(rename = "google_analytics")]
    GoogleAnalytics,
    #[serde(rename = "snowflake")]
    Snowflake,
    #[serde(rename = "postgres")]
    Postgres,
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "bigquery")]
    BigQuery,
    #[serde(rename = "clickhouse")]
    ClickHouse,
    #[serde(rename = "presto")]
    Presto,
    #[serde(rename = "mixpanel")]
    Mixpanel,
}

impl DataSourceType {
    pub const ALL: [DataSourceType; 10] = [
        DataSourceType::Redshift,
        DataSourceType::Athena,
        DataSourceType::GoogleAnalytics,
        DataSourceType::Snowflake,
        DataSourceType::Postgres,
        DataSourceType::MySql,
        DataSourceType::BigQuery,
        DataSourceType::ClickHouse,
        DataSourceType::Presto,
        DataSourceType::Mixpanel,
    ];

    /// Returns the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceType::Redshift => "redshift",
            DataSourceType::Athena => "athena",
            DataSourceType::GoogleAnalytics => "google_analytics",
            DataSourceType::Snowflake => "snowflake",
            DataSourceType::Postgres => "postgres",
            DataSourceType::MySql => "mysql",
            DataSourceType::BigQuery => "bigquery",
            DataSourceType::ClickHouse => "clickhouse",
            DataSourceType::Presto => "presto",
            DataSourceType::Mixpanel => "mixpanel",
        }
    }
}

impl fmt::Display for DataSourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataSourceType {
    type Err = DataSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataSourceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DataSourceError::UnknownType(s.to_string()))
    }
}

/// How variation ids are encoded in experiment query results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariationIdFormat {
    /// Numeric array index (0 = control, 1 = first variation, ...)
    #[default]
    Index,
    /// Custom string keys (e.g. `control`, `blue-buttons`)
    Key,
}

impl VariationIdFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariationIdFormat::Index => "index",
            VariationIdFormat::Key => "key",
        }
    }

    /// Parses a stored value. Unrecognized values yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "index" => Some(VariationIdFormat::Index),
            "key" => Some(VariationIdFormat::Key),
            _ => None,
        }
    }
}

impl fmt::Display for VariationIdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VariationIdFormat {
    type Err = DataSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DataSourceError::InvalidVariationIdFormat(s.to_string()))
    }
}

/// The three query roles a SQL data source provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryRole {
    Experiments,
    Pageviews,
    Users,
}

impl QueryRole {
    pub const ALL: [QueryRole; 3] = [QueryRole::Experiments, QueryRole::Pageviews, QueryRole::Users];

    /// Field name inside the `queries` object
    pub fn field_name(&self) -> &'static str {
        match self {
            QueryRole::Experiments => "experimentsQuery",
            QueryRole::Pageviews => "pageviewsQuery",
            QueryRole::Users => "usersQuery",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        QueryRole::ALL.into_iter().find(|r| r.field_name() == name)
    }

    /// Column names the query result must expose
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            QueryRole::Experiments => &[
                "user_id",
                "anonymous_id",
                "timestamp",
                "experiment_id",
                "variation_id",
                "url",
                "user_agent",
            ],
            QueryRole::Pageviews => &["user_id", "anonymous_id", "timestamp", "url", "user_agent"],
            QueryRole::Users => &["user_id", "anonymous_id"],
        }
    }

    /// What the platform uses the query for
    pub fn description(&self) -> &'static str {
        match self {
            QueryRole::Experiments => "Used to pull experiment results. One row per user/experiment/variation.",
            QueryRole::Pageviews => "Used to predict running time before an experiment starts. One row per page view.",
            QueryRole::Users => "Used to join users to anonymous sessions before they logged in. One row per user/anonymous_id.",
        }
    }
}

impl fmt::Display for QueryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// Query strings, one per role. Opaque to this layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Queries {
    pub experiments_query: String,
    pub pageviews_query: String,
    pub users_query: String,
}

impl Queries {
    pub fn get(&self, role: QueryRole) -> &str {
        match role {
            QueryRole::Experiments => &self.experiments_query,
            QueryRole::Pageviews => &self.pageviews_query,
            QueryRole::Users => &self.users_query,
        }
    }

    pub fn set(&mut self, role: QueryRole, value: impl Into<String>) {
        let value = value.into();
        match role {
            QueryRole::Experiments => self.experiments_query = value,
            QueryRole::Pageviews => self.pageviews_query = value,
            QueryRole::Users => self.users_query = value,
        }
    }
}

/// Named event/property identifiers used by event-based providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventField {
    ExperimentEvent,
    ExperimentIdProperty,
    VariationIdProperty,
    PageviewEvent,
    UrlProperty,
    UserAgentProperty,
}

impl EventField {
    pub const ALL: [EventField; 6] = [
        EventField::ExperimentEvent,
        EventField::ExperimentIdProperty,
        EventField::VariationIdProperty,
        EventField::PageviewEvent,
        EventField::UrlProperty,
        EventField::UserAgentProperty,
    ];

    /// Field name inside the `events` object
    pub fn field_name(&self) -> &'static str {
        match self {
            EventField::ExperimentEvent => "experimentEvent",
            EventField::ExperimentIdProperty => "experimentIdProperty",
            EventField::VariationIdProperty => "variationIdProperty",
            EventField::PageviewEvent => "pageviewEvent",
            EventField::UrlProperty => "urlProperty",
            EventField::UserAgentProperty => "userAgentProperty",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        EventField::ALL.into_iter().find(|f| f.field_name() == name)
    }
}

impl fmt::Display for EventField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// Event and property names for event-based providers.
///
/// Known fields always exist (empty when unset). `extra` only holds keys
/// when the normalizer is configured to keep unknown ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventSettings {
    pub experiment_event: String,
    pub experiment_id_property: String,
    pub variation_id_property: String,
    pub pageview_event: String,
    pub url_property: String,
    pub user_agent_property: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl EventSettings {
    pub fn get(&self, field: EventField) -> &str {
        match field {
            EventField::ExperimentEvent => &self.experiment_event,
            EventField::ExperimentIdProperty => &self.experiment_id_property,
            EventField::VariationIdProperty => &self.variation_id_property,
            EventField::PageviewEvent => &self.pageview_event,
            EventField::UrlProperty => &self.url_property,
            EventField::UserAgentProperty => &self.user_agent_property,
        }
    }

    pub fn set(&mut self, field: EventField, value: impl Into<String>) {
        let value = value.into();
        match field {
            EventField::ExperimentEvent => self.experiment_event = value,
            EventField::ExperimentIdProperty => self.experiment_id_property = value,
            EventField::VariationIdProperty => self.variation_id_property = value,
            EventField::PageviewEvent => self.pageview_event = value,
            EventField::UrlProperty => self.url_property = value,
            EventField::UserAgentProperty => self.user_agent_property = value,
        }
    }
}

/// Canonical data source settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSourceSettings {
    pub queries: Queries,
    pub events: EventSettings,
    pub variation_id_format: VariationIdFormat,
}

impl DataSourceSettings {
    /// Serializes to the persisted JSON shape
    pub fn to_value(&self) -> Value {
        // Every field is a string, enum or string map; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Provider-specific connection details.
///
/// Only `defaultSchema` is interpreted; everything else is carried along.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionParams {
    #[serde(rename = "defaultSchema", default, skip_serializing_if = "Option::is_none")]
    pub default_schema: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConnectionParams {
    pub fn with_schema(schema: impl Into<String>) -> Self {
        Self {
            default_schema: Some(schema.into()),
            extra: Map::new(),
        }
    }

    /// Schema used to qualify generated table names, if any
    pub fn schema_qualifier(&self) -> Option<&str> {
        self.default_schema
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A data source as read from storage. Settings are raw and may be absent
/// or in a legacy shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub datasource_type: DataSourceType,
    #[serde(default)]
    pub params: ConnectionParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
}

impl DataSourceRecord {
    pub fn new(id: impl Into<String>, datasource_type: DataSourceType) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            datasource_type,
            params: ConnectionParams::default(),
            settings: None,
        }
    }

    pub fn with_params(mut self, params: ConnectionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }
}

/// A data source with canonical settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub datasource_type: DataSourceType,
    #[serde(default)]
    pub params: ConnectionParams,
    #[serde(default)]
    pub settings: DataSourceSettings,
}

impl From<DataSource> for DataSourceRecord {
    fn from(ds: DataSource) -> Self {
        let settings = ds.settings.to_value();
        Self {
            id: ds.id,
            name: ds.name,
            datasource_type: ds.datasource_type,
            params: ds.params,
            settings: Some(settings),
        }
    }
}
