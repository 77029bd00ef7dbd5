//! Logger entry backed by a `tracing` dispatcher.
//!
//! # Responsibilities
//! - Build a `tracing::Dispatch` from a `logger` section item
//! - Run caller code with that dispatcher as the thread default
//!
//! # Design Decisions
//! - The dispatcher is built at construction, so a logger is usable before
//!   bootstrap and the stdout/noop fallbacks never need bootstrapping
//! - The process-wide subscriber is left alone; the binary owns that one

use std::fmt;
use std::sync::Arc;

use tracing::Dispatch;
use tracing_subscriber::filter::LevelFilter;

use crate::config::loader::{parse_section, ConfigError};
use crate::config::schema::{LogLevel, LoggerConfig, LoggerSection, Output, OutputFormat};
use crate::config::validation::validate_loggers;
use crate::context::AppContext;
use crate::entry::{Entry, EntryMap, LOGGER_ENTRY_TYPE};
use crate::error::RegistryResult;

const STDOUT_LOGGER_NAME: &str = "LoggerStdout";
const NOOP_LOGGER_NAME: &str = "LoggerNoop";

/// A named logger.
#[derive(Debug)]
pub struct LoggerEntry {
    config: LoggerConfig,
    dispatch: Dispatch,
}

impl LoggerEntry {
    pub fn new(config: LoggerConfig) -> Self {
        let dispatch = build_dispatch(&config);
        Self { config, dispatch }
    }

    /// Console logger writing to stdout at info level.
    pub fn stdout() -> Self {
        Self::new(LoggerConfig {
            name: STDOUT_LOGGER_NAME.to_string(),
            description: "Logger writing to stdout".to_string(),
            default: false,
            level: LogLevel::Info,
            format: OutputFormat::Console,
            output: Output::Stdout,
        })
    }

    /// Logger that discards everything.
    pub fn noop() -> Self {
        Self::new(LoggerConfig {
            name: NOOP_LOGGER_NAME.to_string(),
            description: "Logger discarding all output".to_string(),
            default: false,
            level: LogLevel::Info,
            format: OutputFormat::Console,
            output: Output::Noop,
        })
    }

    pub fn level(&self) -> LogLevel {
        self.config.level
    }

    pub fn format(&self) -> OutputFormat {
        self.config.format
    }

    pub fn output(&self) -> Output {
        self.config.output
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the default dispatcher of the current thread.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
    }
}

fn build_dispatch(config: &LoggerConfig) -> Dispatch {
    let builder = tracing_subscriber::fmt().with_max_level(level_filter(config.level));

    match (config.output, config.format) {
        (Output::Noop, _) => Dispatch::none(),
        (Output::Stdout, OutputFormat::Console) => {
            Dispatch::new(builder.with_writer(std::io::stdout).finish())
        }
        (Output::Stdout, OutputFormat::Json) => {
            Dispatch::new(builder.json().with_writer(std::io::stdout).finish())
        }
        (Output::Stderr, OutputFormat::Console) => {
            Dispatch::new(builder.with_writer(std::io::stderr).finish())
        }
        (Output::Stderr, OutputFormat::Json) => {
            Dispatch::new(builder.json().with_writer(std::io::stderr).finish())
        }
    }
}

impl fmt::Display for LoggerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dump = serde_json::json!({
            "entryName": self.config.name,
            "entryType": LOGGER_ENTRY_TYPE,
            "entryDescription": self.config.description,
            "default": self.config.default,
            "level": self.config.level,
            "format": self.config.format,
            "output": self.config.output,
        });
        write!(f, "{}", dump)
    }
}

impl Entry for LoggerEntry {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn entry_type(&self) -> &str {
        LOGGER_ENTRY_TYPE
    }

    fn description(&self) -> &str {
        &self.config.description
    }

    fn bootstrap(&self, _ctx: &AppContext) {
        tracing::debug!(
            entry_name = %self.config.name,
            level = ?self.config.level,
            output = ?self.config.output,
            "Logger ready"
        );
    }

    fn interrupt(&self, _ctx: &AppContext) {
        tracing::debug!(entry_name = %self.config.name, "Logger interrupted");
    }

    fn is_default(&self) -> bool {
        self.config.default
    }
}

/// Registration function for the `logger` section.
pub fn register_logger_entry_yaml(raw: &[u8]) -> RegistryResult<EntryMap> {
    let section: LoggerSection = parse_section(raw)?;

    let errors = validate_loggers(&section.logger);
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors).into());
    }

    Ok(section
        .logger
        .into_iter()
        .map(|config| {
            let entry: Arc<dyn Entry> = Arc::new(LoggerEntry::new(config));
            (entry.name().to_string(), entry)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;

    #[test]
    fn test_register_from_yaml() {
        let raw = b"logger:\n  - name: a\n    default: true\n    level: warn\n  - name: b\n    output: noop\n";
        let entries = register_logger_entry_yaml(raw).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries["a"].is_default());
        assert!(!entries["b"].is_default());
        assert_eq!(entries["a"].entry_type(), LOGGER_ENTRY_TYPE);
    }

    #[test]
    fn test_register_unnamed_item() {
        let entries = register_logger_entry_yaml(b"logger:\n  - level: info\n    output: noop\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[""].name(), "");
    }

    #[test]
    fn test_ignores_other_sections() {
        let raw = b"app:\n  homeUrl: not a url\nlogger:\n  - name: a\n    output: noop\n";
        let entries = register_logger_entry_yaml(raw).unwrap();
        assert!(entries.contains_key("a"));
    }

    #[test]
    fn test_rejects_second_default() {
        let raw = b"logger:\n  - name: a\n    default: true\n  - name: b\n    default: true\n";
        let err = register_logger_entry_yaml(raw).err().unwrap();
        assert!(matches!(
            err,
            RegistryError::Config(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_fallbacks() {
        let stdout = LoggerEntry::stdout();
        assert_eq!(stdout.name(), STDOUT_LOGGER_NAME);
        assert_eq!(stdout.output(), Output::Stdout);
        assert!(!stdout.is_default());

        let noop = LoggerEntry::noop();
        assert_eq!(noop.output(), Output::Noop);
    }

    #[test]
    fn test_in_scope_returns_value() {
        let logger = LoggerEntry::noop();
        let value = logger.in_scope(|| {
            tracing::info!("discarded");
            42
        });
        assert_eq!(value, 42);
    }

    #[test]
    fn test_display_is_json() {
        let dump: serde_json::Value =
            serde_json::from_str(&LoggerEntry::stdout().to_string()).unwrap();
        assert_eq!(dump["entryType"], LOGGER_ENTRY_TYPE);
        assert_eq!(dump["level"], "info");
    }
}
