//! CLI command implementations
//!
//! Async work runs on a runtime built per command; `main` stays synchronous.

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::datasource::{ConnectionParams, NormalizeOptions, PresetRegistry, QueryRole, SettingsNormalizer};
use crate::form::{FieldEdit, SettingsForm, SubmitOutcome};
use crate::http_server::{DatasourceState, HttpServer, PresentationState, SeedData};
use crate::observability::{init_logging, Event, LogFormat};
use crate::telemetry::LogTracker;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// Parse arguments and run. Command failures are also reported on stdout as
/// an error envelope.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let log_format = cli.log_format;
    let result = run_command(cli.command, log_format);
    if let Err(e) = &result {
        // stdout may be closed; the caller still prints to stderr.
        let _ = write_error(e.code_str(), e.message());
    }
    result
}

pub fn run_command(cmd: Command, log_format: Option<LogFormat>) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => {
            let config = load_config(&config, log_format)?;
            serve(config)
        }
        Command::Normalize {
            schema,
            fill_templates,
            preserve_unknown_events,
        } => {
            start_logging(log_format.unwrap_or_default());
            let input = read_request()?;
            let options = NormalizeOptions { preserve_unknown_events };
            write_response(normalize(&input, schema.as_deref(), fill_templates, options))
        }
        Command::Presets { name } => {
            start_logging(log_format.unwrap_or_default());
            write_response(presets(name.as_deref())?)
        }
        Command::Edit {
            config,
            id,
            set,
            preset,
            source,
        } => {
            let config = load_config(&config, log_format)?;
            let data = runtime()?.block_on(edit(&config, &id, &set, preset.as_deref(), &source))?;
            write_response(data)
        }
    }
}

fn start_logging(format: LogFormat) {
    // A subscriber installed by an embedding process takes precedence.
    if let Err(e) = init_logging(format) {
        eprintln!("{}", e);
    }
}

fn load_config(path: &Path, log_format: Option<LogFormat>) -> CliResult<AppConfig> {
    let config = AppConfig::load_or_default(path)?;
    start_logging(log_format.unwrap_or(config.log_format));
    info!(event = %Event::ConfigLoaded, path = %path.display(), "configuration loaded");
    Ok(config)
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))
}

/// Runs the HTTP server until ctrl-c
pub fn serve(config: AppConfig) -> CliResult<()> {
    let datasources = Arc::new(DatasourceState::with_options(config.form.normalize_options()));
    let presentations = Arc::new(PresentationState::new());

    if let Some(seed_file) = &config.seed_file {
        SeedData::load(seed_file)
            .and_then(|seed| seed.install(&datasources, &presentations))
            .map_err(|e| CliError::config_error(e.to_string()))?;
        info!(
            event = %Event::SeedLoaded,
            path = %seed_file.display(),
            datasources = datasources.len(),
            presentations = presentations.store.len(),
            "seed loaded"
        );
    }

    let server = HttpServer::with_state(config.server, datasources, presentations);
    runtime()?
        .block_on(server.start())
        .map_err(|e| CliError::serve_failed(e.to_string()))
}

/// Canonical settings for a stored settings document
pub fn normalize(input: &Value, schema: Option<&str>, fill_templates: bool, options: NormalizeOptions) -> Value {
    let normalizer = SettingsNormalizer::new(options);
    let raw = (!input.is_null()).then_some(input);
    let settings = if fill_templates {
        let params = schema.map(ConnectionParams::with_schema).unwrap_or_default();
        normalizer.build_working_settings(raw, &params)
    } else {
        normalizer.normalize(raw)
    };
    settings.to_value()
}

/// Every builtin preset, or the queries of one
pub fn presets(name: Option<&str>) -> CliResult<Value> {
    let registry = PresetRegistry::builtin();
    match name {
        Some(name) => {
            let preset = registry.get(name)?;
            Ok(json!({
                "name": preset.name(),
                "label": preset.label(),
                "queries": preset.queries(),
                "roles": role_descriptions(),
            }))
        }
        None => {
            let presets: Vec<Value> = registry
                .iter()
                .map(|p| json!({"name": p.name(), "label": p.label()}))
                .collect();
            Ok(json!({ "presets": presets }))
        }
    }
}

fn role_descriptions() -> Vec<Value> {
    QueryRole::ALL
        .iter()
        .map(|role| {
            json!({
                "field": role.field_name(),
                "description": role.description(),
                "requiredColumns": role.required_columns(),
            })
        })
        .collect()
}

/// Loads a data source, applies the preset then each assignment in order,
/// and saves.
pub async fn edit(
    config: &AppConfig,
    id: &str,
    assignments: &[String],
    preset: Option<&str>,
    source: &str,
) -> CliResult<Value> {
    let edits = assignments
        .iter()
        .map(|a| FieldEdit::from_assignment(a))
        .collect::<Result<Vec<_>, _>>()?;

    let api = Arc::new(config.api.build_client()?);
    let mut form = SettingsForm::with_options(api, Arc::new(LogTracker), source, config.form.to_options());
    form.load_from_api(id).await?;

    if let Some(preset) = preset {
        form.apply_preset(preset)?;
    }
    for edit in edits {
        form.edit(edit)?;
    }

    let outcome = form.submit().await?;
    if outcome == SubmitOutcome::Skipped {
        warn!(event = %Event::SaveSkipped, datasource_id = %id, "no changes given");
    }

    let settings = form.settings().map(|s| s.to_value()).unwrap_or(Value::Null);
    Ok(json!({
        "id": id,
        "outcome": outcome.as_str(),
        "settings": settings,
        "requiredColumns": QueryRole::ALL
            .iter()
            .map(|role| (role.field_name(), role.required_columns()))
            .collect::<std::collections::BTreeMap<_, _>>(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_null_input() {
        let out = normalize(&Value::Null, None, false, NormalizeOptions::default());
        assert_eq!(out["variationIdFormat"], "index");
        assert_eq!(out["queries"]["usersQuery"], "");
    }

    #[test]
    fn test_normalize_fills_templates_with_schema() {
        let out = normalize(&Value::Null, Some("analytics"), true, NormalizeOptions::default());
        let users = out["queries"]["usersQuery"].as_str().unwrap();
        assert!(users.contains("analytics."));
    }

    #[test]
    fn test_presets_listing_and_lookup() {
        let listing = presets(None).unwrap();
        assert_eq!(listing["presets"][0]["name"], "segment");

        let one = presets(Some("SEGMENT")).unwrap();
        assert!(!one["queries"]["experimentsQuery"].as_str().unwrap().is_empty());
        assert_eq!(one["roles"][2]["field"], "usersQuery");
        assert_eq!(one["roles"][2]["requiredColumns"], json!(["user_id", "anonymous_id"]));
        assert!(one["roles"][0]["description"].as_str().unwrap().starts_with("Used to pull"));

        assert!(presets(Some("rudderstack")).is_err());
    }
}
