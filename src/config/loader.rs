//! Boot document and config source loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::schema::BootConfig;
use crate::config::validation::{validate_boot_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// File formats a config entry can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Read the raw boot document bytes.
pub fn load_boot_file(path: &Path) -> Result<Vec<u8>, ConfigError> {
    fs::read(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse raw boot document bytes. An empty document yields the defaults.
pub fn parse_boot_config(raw: &[u8]) -> Result<BootConfig, ConfigError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(BootConfig::default());
    }
    Ok(serde_yaml::from_slice(raw)?)
}

/// Parse one section view of the boot document, such as
/// [`LoggerSection`](crate::config::schema::LoggerSection).
///
/// Keys outside the view are skipped without being typed, so a broken
/// section only fails the views that contain it.
pub fn parse_section<T: DeserializeOwned + Default>(raw: &[u8]) -> Result<T, ConfigError> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_yaml::from_slice(raw)?)
}

/// Parse and validate the whole boot document.
pub fn load_boot_config(raw: &[u8]) -> Result<BootConfig, ConfigError> {
    let config = parse_boot_config(raw)?;
    validate_boot_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load a config source file into a JSON value, picking the parser by extension.
pub fn load_document(path: &Path) -> Result<serde_json::Value, ConfigError> {
    let format = DocumentFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value: serde_json::Value = match format {
        DocumentFormat::Toml => {
            let table: toml::Table = toml::from_str(&content)?;
            serde_json::to_value(table)?
        }
        DocumentFormat::Yaml => serde_yaml::from_str(&content)?,
        DocumentFormat::Json => serde_json::from_str(&content)?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{AppSection, LoggerSection, Output, OutputFormat};

    #[test]
    fn test_parse_full_document() {
        let raw = br#"
app:
  name: demo
  version: 1.2.3
  homeUrl: https://example.com
logger:
  - name: main-logger
    default: true
    level: debug
    format: json
event:
  - name: main-event
    output: noop
config:
  - name: app-config
    path: conf/app.toml
    envPrefix: APP
    content:
      port: 8080
"#;
        let config = parse_boot_config(raw).unwrap();
        let app = config.app.unwrap();
        assert_eq!(app.name, "demo");
        assert_eq!(app.home_url.unwrap().as_str(), "https://example.com/");

        assert_eq!(config.logger.len(), 1);
        assert!(config.logger[0].default);
        assert_eq!(config.logger[0].format, OutputFormat::Json);
        assert_eq!(config.event[0].output, Output::Noop);
        assert_eq!(config.config[0].env_prefix.as_deref(), Some("APP"));
        assert_eq!(config.config[0].content["port"], 8080);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = parse_boot_config(b"  \n").unwrap();
        assert!(config.app.is_none());
        assert!(config.logger.is_empty());
    }

    #[test]
    fn test_unknown_sections_ignored() {
        let config = parse_boot_config(b"myPlugin:\n  enabled: true\n").unwrap();
        assert!(config.event.is_empty());
    }

    #[test]
    fn test_section_ignores_broken_neighbours() {
        let raw = b"app:\n  name: demo\nlogger:\n  - name: l\n    level: verbose\n";
        let app: AppSection = parse_section(raw).unwrap();
        assert_eq!(app.app.unwrap().name, "demo");

        let err = parse_section::<LoggerSection>(raw).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
        assert!(parse_boot_config(raw).is_err());
    }

    #[test]
    fn test_section_empty_document() {
        let loggers: LoggerSection = parse_section(b"").unwrap();
        assert!(loggers.logger.is_empty());
    }

    #[test]
    fn test_unnamed_items_default_to_empty_name() {
        let raw = b"logger:\n  - level: info\nevent:\n  - output: noop\nconfig:\n  - envPrefix: APP\n";
        let config = parse_boot_config(raw).unwrap();
        assert_eq!(config.logger[0].name, "");
        assert_eq!(config.event[0].name, "");
        assert_eq!(config.config[0].name, "");
    }

    #[test]
    fn test_invalid_yaml() {
        let err = parse_boot_config(b"logger: [name: x").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_load_document_formats() {
        let dir = std::env::temp_dir().join(format!("app-registry-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();

        let toml_path = dir.join("a.toml");
        fs::write(&toml_path, "[db]\nhost = \"localhost\"\n").unwrap();
        assert_eq!(load_document(&toml_path).unwrap()["db"]["host"], "localhost");

        let yaml_path = dir.join("a.yml");
        fs::write(&yaml_path, "db:\n  port: 5432\n").unwrap();
        assert_eq!(load_document(&yaml_path).unwrap()["db"]["port"], 5432);

        let json_path = dir.join("a.json");
        fs::write(&json_path, r#"{"debug": true}"#).unwrap();
        assert_eq!(load_document(&json_path).unwrap()["debug"], true);

        let ini_path = dir.join("a.ini");
        assert!(matches!(
            load_document(&ini_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        fs::remove_dir_all(&dir).unwrap_or_default();
    }

    #[test]
    fn test_load_boot_file_missing() {
        let err = load_boot_file(Path::new("/nonexistent/boot.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
