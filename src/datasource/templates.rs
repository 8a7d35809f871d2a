//! Default query templates
//!
//! Pure functions. An existing non-empty query for a role is always returned
//! unchanged; otherwise a template is synthesized from the legacy table and
//! column descriptors (falling back to a Segment-style event layout) and the
//! optional schema qualifier.

use super::raw::RawSettings;
use super::types::{Queries, QueryRole};

pub const DEFAULT_EXPERIMENTS_TABLE: &str = "experiment_viewed";
pub const DEFAULT_PAGEVIEWS_TABLE: &str = "pages";
pub const DEFAULT_USERS_TABLE: &str = "identifies";

/// Legacy descriptor sections holding the table/column names for each role,
/// in lookup order
fn legacy_sections(role: QueryRole) -> &'static [&'static str] {
    match role {
        QueryRole::Experiments => &["experiments"],
        QueryRole::Pageviews => &["pageviews"],
        QueryRole::Users => &["identifies", "users"],
    }
}

fn legacy_value<'a>(settings: &RawSettings<'a>, role: QueryRole, key: &str) -> Option<&'a str> {
    legacy_sections(role)
        .iter()
        .find_map(|section| settings.legacy(section, key))
}

fn default_table(role: QueryRole) -> &'static str {
    match role {
        QueryRole::Experiments => DEFAULT_EXPERIMENTS_TABLE,
        QueryRole::Pageviews => DEFAULT_PAGEVIEWS_TABLE,
        QueryRole::Users => DEFAULT_USERS_TABLE,
    }
}

/// (legacy column key, default expression, output alias) per selected column
fn columns(role: QueryRole) -> &'static [(&'static str, &'static str, &'static str)] {
    match role {
        QueryRole::Experiments => &[
            ("userIdColumn", "user_id", "user_id"),
            ("anonymousIdColumn", "anonymous_id", "anonymous_id"),
            ("timestampColumn", "received_at", "timestamp"),
            ("experimentIdColumn", "experiment_id", "experiment_id"),
            ("variationColumn", "variation_id", "variation_id"),
            ("urlColumn", "context_page_path", "url"),
            ("userAgentColumn", "context_user_agent", "user_agent"),
        ],
        QueryRole::Pageviews => &[
            ("userIdColumn", "user_id", "user_id"),
            ("anonymousIdColumn", "anonymous_id", "anonymous_id"),
            ("timestampColumn", "received_at", "timestamp"),
            ("urlColumn", "path", "url"),
            ("userAgentColumn", "context_user_agent", "user_agent"),
        ],
        QueryRole::Users => &[
            ("userIdColumn", "user_id", "user_id"),
            ("anonymousIdColumn", "anonymous_id", "anonymous_id"),
        ],
    }
}

fn select_column(expr: &str, alias: &str) -> String {
    if expr == alias {
        alias.to_string()
    } else {
        format!("{} as {}", expr, alias)
    }
}

/// Table reference, prefixed with the schema unless already qualified
pub fn table_ref(schema: Option<&str>, table: &str) -> String {
    match schema.map(str::trim).filter(|s| !s.is_empty()) {
        Some(schema) if !table.contains('.') => format!("{}.{}", schema, table),
        _ => table.to_string(),
    }
}

/// Synthesizes the template for a role, ignoring any existing query
pub fn template(role: QueryRole, settings: &RawSettings<'_>, schema: Option<&str>) -> String {
    let select = columns(role)
        .iter()
        .map(|&(key, default, alias)| {
            let expr = legacy_value(settings, role, key).unwrap_or(default);
            format!("  {}", select_column(expr, alias))
        })
        .collect::<Vec<_>>()
        .join(",\n");
    let table = legacy_value(settings, role, "table").unwrap_or(default_table(role));

    format!("SELECT\n{}\nFROM\n  {}", select, table_ref(schema, table))
}

/// Existing query for the role, or a generated template
pub fn query_for(role: QueryRole, settings: &RawSettings<'_>, schema: Option<&str>) -> String {
    match settings.query(role) {
        Some(existing) => existing.to_string(),
        None => template(role, settings, schema),
    }
}

pub fn experiments_query(settings: &RawSettings<'_>, schema: Option<&str>) -> String {
    query_for(QueryRole::Experiments, settings, schema)
}

pub fn pageviews_query(settings: &RawSettings<'_>, schema: Option<&str>) -> String {
    query_for(QueryRole::Pageviews, settings, schema)
}

pub fn users_query(settings: &RawSettings<'_>, schema: Option<&str>) -> String {
    query_for(QueryRole::Users, settings, schema)
}

/// All three queries, existing ones kept
pub fn default_queries(settings: &RawSettings<'_>, schema: Option<&str>) -> Queries {
    Queries {
        experiments_query: experiments_query(settings, schema),
        pageviews_query: pageviews_query(settings, schema),
        users_query: users_query(settings, schema),
    }
}
