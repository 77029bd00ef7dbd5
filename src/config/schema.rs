//! Boot document schema.
//!
//! The boot document is a YAML file with one optional section per built-in
//! entry kind. Each registration function reads only the section it
//! understands; unknown sections are ignored so plugins and user entries can
//! keep their own configuration in the same file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

/// Root of the boot document.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BootConfig {
    /// Application metadata.
    pub app: Option<AppInfoConfig>,

    /// Logger entries.
    pub logger: Vec<LoggerConfig>,

    /// Event entries.
    pub event: Vec<EventConfig>,

    /// Config entries.
    pub config: Vec<ConfigSourceConfig>,
}

/// The `app` section alone.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppSection {
    pub app: Option<AppInfoConfig>,
}

/// The `logger` section alone.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggerSection {
    pub logger: Vec<LoggerConfig>,
}

/// The `event` section alone.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EventSection {
    pub event: Vec<EventConfig>,
}

/// The `config` section alone.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ConfigSection {
    pub config: Vec<ConfigSourceConfig>,
}

/// Application metadata (`app` section).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppInfoConfig {
    pub name: String,
    pub version: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub home_url: Option<Url>,
    pub docs_url: Option<Url>,
    pub maintainers: Vec<String>,
}

impl Default for AppInfoConfig {
    fn default() -> Self {
        Self {
            name: "app".to_string(),
            version: "local".to_string(),
            description: String::new(),
            keywords: Vec::new(),
            home_url: None,
            docs_url: None,
            maintainers: Vec::new(),
        }
    }
}

/// Severity threshold for a logger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Line format for loggers and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

/// Destination for rendered lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Output {
    #[default]
    Stdout,
    Stderr,
    Noop,
}

/// One item of the `logger` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Entry name; an unnamed item registers under the empty name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Marks this logger as the one returned when no name is requested.
    #[serde(default)]
    pub default: bool,

    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub output: Output,
}

/// One item of the `event` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConfig {
    /// Entry name; an unnamed item registers under the empty name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Marks this event entry as the one returned when no name is requested.
    #[serde(default)]
    pub default: bool,

    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default)]
    pub output: Output,
}

/// One item of the `config` section.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSourceConfig {
    /// Entry name; an unnamed item registers under the empty name.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// File to load on bootstrap (`.toml`, `.yaml`, `.yml` or `.json`).
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Prefix for environment overrides, e.g. `APP` for `APP_DB_HOST`.
    #[serde(default)]
    pub env_prefix: Option<String>,

    /// Inline values; the file, when present, is merged over them.
    #[serde(default)]
    pub content: serde_json::Map<String, serde_json::Value>,
}
