//! Configuration file
//!
//! A single JSON document. Every field has a default, so `{}` is a valid
//! configuration.
//!
//! ```json
//! {
//!   "server": { "host": "127.0.0.1", "port": 54321 },
//!   "api": { "base_url": "http://127.0.0.1:54321", "request_timeout_ms": 10000 },
//!   "form": { "save_timeout_ms": 30000, "preserve_unknown_events": false },
//!   "seed_file": "./seed.json",
//!   "log_format": "text"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::{ApiResult, HttpDataSourceApi};
use crate::datasource::NormalizeOptions;
use crate::form::FormOptions;
use crate::http_server::HttpServerConfig;
use crate::observability::LogFormat;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Persistence endpoint used by `edit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Sent as a bearer token when set
    #[serde(default)]
    pub auth_token: Option<String>,

    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:54321".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl ApiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn build_client(&self) -> ApiResult<HttpDataSourceApi> {
        HttpDataSourceApi::new(
            &self.base_url,
            self.auth_token.as_deref(),
            self.connect_timeout(),
            self.request_timeout(),
        )
    }
}

/// Editing session settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// 0 disables the limit
    #[serde(default = "default_save_timeout_ms")]
    pub save_timeout_ms: u64,

    #[serde(default)]
    pub preserve_unknown_events: bool,
}

fn default_save_timeout_ms() -> u64 {
    30_000
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            save_timeout_ms: default_save_timeout_ms(),
            preserve_unknown_events: false,
        }
    }
}

impl FormConfig {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            preserve_unknown_events: self.preserve_unknown_events,
        }
    }

    pub fn to_options(&self) -> FormOptions {
        FormOptions {
            save_timeout: (self.save_timeout_ms > 0).then(|| Duration::from_millis(self.save_timeout_ms)),
            normalize: self.normalize_options(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub form: FormConfig,

    /// Documents loaded into the server's stores at startup
    #[serde(default)]
    pub seed_file: Option<PathBuf>,

    #[serde(default)]
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Loads `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server.host must not be empty".into()));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        if self.api.connect_timeout_ms == 0 {
            return Err(ConfigError::Invalid("api.connect_timeout_ms must be > 0".into()));
        }
        if self.api.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid("api.request_timeout_ms must be > 0".into()));
        }
        Ok(())
    }
}
