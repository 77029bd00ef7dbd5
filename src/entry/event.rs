//! Event entry: structured records of timed operations.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::config::loader::{parse_section, ConfigError};
use crate::config::schema::{EventConfig, EventSection, Output, OutputFormat};
use crate::config::validation::validate_events;
use crate::context::AppContext;
use crate::entry::{Entry, EntryMap, EVENT_ENTRY_TYPE};
use crate::error::RegistryResult;

const STDOUT_EVENT_NAME: &str = "EventStdout";
const NOOP_EVENT_NAME: &str = "EventNoop";

/// A single timed operation, opened with [`EventEntry::start_event`].
#[derive(Debug, Clone)]
pub struct Event {
    id: Uuid,
    operation: String,
    start_ms: u64,
    started: Instant,
    fields: BTreeMap<String, String>,
    errors: Vec<String>,
}

impl Event {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn add_field(&mut self, key: impl Into<String>, value: impl ToString) {
        self.fields.insert(key.into(), value.to_string());
    }

    pub fn add_error(&mut self, error: impl ToString) {
        self.errors.push(error.to_string());
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// A named event sink.
#[derive(Debug)]
pub struct EventEntry {
    config: EventConfig,
    emitted: AtomicU64,
}

impl EventEntry {
    pub fn new(config: EventConfig) -> Self {
        Self {
            config,
            emitted: AtomicU64::new(0),
        }
    }

    /// Console events written to stdout.
    pub fn stdout() -> Self {
        Self::new(EventConfig {
            name: STDOUT_EVENT_NAME.to_string(),
            description: "Events written to stdout".to_string(),
            default: false,
            format: OutputFormat::Console,
            output: Output::Stdout,
        })
    }

    /// Events that go nowhere.
    pub fn noop() -> Self {
        Self::new(EventConfig {
            name: NOOP_EVENT_NAME.to_string(),
            description: "Events discarded".to_string(),
            default: false,
            format: OutputFormat::Console,
            output: Output::Noop,
        })
    }

    pub fn format(&self) -> OutputFormat {
        self.config.format
    }

    pub fn output(&self) -> Output {
        self.config.output
    }

    /// Number of events finished through this entry.
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    /// Open a new event for `operation`.
    pub fn start_event(&self, operation: impl Into<String>) -> Event {
        let start_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Event {
            id: Uuid::new_v4(),
            operation: operation.into(),
            start_ms,
            started: Instant::now(),
            fields: BTreeMap::new(),
            errors: Vec::new(),
        }
    }

    /// Close `event` and write it to the configured output.
    pub fn finish_event(&self, event: Event) {
        self.emitted.fetch_add(1, Ordering::Relaxed);

        let line = self.render(&event);
        let result = match self.config.output {
            Output::Noop => Ok(()),
            Output::Stdout => writeln!(std::io::stdout().lock(), "{}", line),
            Output::Stderr => writeln!(std::io::stderr().lock(), "{}", line),
        };
        if let Err(e) = result {
            tracing::warn!(entry_name = %self.config.name, error = %e, "Failed to write event");
        }
    }

    /// Render `event` as a single line in the configured format.
    pub fn render(&self, event: &Event) -> String {
        let elapsed_ms = event.started.elapsed().as_millis() as u64;

        match self.config.format {
            OutputFormat::Json => serde_json::json!({
                "eventId": event.id.to_string(),
                "entryName": self.config.name,
                "operation": event.operation,
                "startMs": event.start_ms,
                "elapsedMs": elapsed_ms,
                "fields": event.fields,
                "errors": event.errors,
            })
            .to_string(),
            OutputFormat::Console => {
                let mut line = format!(
                    "eventId={} entryName={} operation={} startMs={} elapsedMs={}",
                    event.id, self.config.name, event.operation, event.start_ms, elapsed_ms
                );
                for (k, v) in &event.fields {
                    line.push_str(&format!(" {}={}", k, v));
                }
                if !event.errors.is_empty() {
                    line.push_str(&format!(" errors={}", event.errors.join(";")));
                }
                line
            }
        }
    }
}

impl fmt::Display for EventEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dump = serde_json::json!({
            "entryName": self.config.name,
            "entryType": EVENT_ENTRY_TYPE,
            "entryDescription": self.config.description,
            "default": self.config.default,
            "format": self.config.format,
            "output": self.config.output,
        });
        write!(f, "{}", dump)
    }
}

impl Entry for EventEntry {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn entry_type(&self) -> &str {
        EVENT_ENTRY_TYPE
    }

    fn description(&self) -> &str {
        &self.config.description
    }

    fn bootstrap(&self, _ctx: &AppContext) {
        tracing::debug!(entry_name = %self.config.name, "Event entry ready");
    }

    fn interrupt(&self, _ctx: &AppContext) {
        tracing::debug!(
            entry_name = %self.config.name,
            emitted = self.emitted(),
            "Event entry interrupted"
        );
    }

    fn is_default(&self) -> bool {
        self.config.default
    }
}

/// Registration function for the `event` section.
pub fn register_event_entry_yaml(raw: &[u8]) -> RegistryResult<EntryMap> {
    let section: EventSection = parse_section(raw)?;

    let errors = validate_events(&section.event);
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors).into());
    }

    Ok(section
        .event
        .into_iter()
        .map(|config| {
            let entry: Arc<dyn Entry> = Arc::new(EventEntry::new(config));
            (entry.name().to_string(), entry)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_from_yaml() {
        let entries =
            register_event_entry_yaml(b"event:\n  - name: audit\n    default: true\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries["audit"].is_default());
    }

    #[test]
    fn test_register_rejects_stderr() {
        let err = register_event_entry_yaml(b"event:\n  - name: audit\n    output: stderr\n")
            .err().unwrap();
        assert!(matches!(
            err,
            crate::error::RegistryError::Config(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_render_json() {
        let entry = EventEntry::new(EventConfig {
            name: "audit".into(),
            description: String::new(),
            default: false,
            format: OutputFormat::Json,
            output: Output::Noop,
        });
        let mut event = entry.start_event("login");
        event.add_field("user", "alice");
        event.add_error("bad password");

        let line: serde_json::Value = serde_json::from_str(&entry.render(&event)).unwrap();
        assert_eq!(line["eventId"], event.id().to_string());
        assert_eq!(line["operation"], "login");
        assert_eq!(line["fields"]["user"], "alice");
        assert_eq!(line["errors"][0], "bad password");
    }

    #[test]
    fn test_render_console() {
        let entry = EventEntry::noop();
        let mut event = entry.start_event("sync");
        event.add_field("count", 3);

        let line = entry.render(&event);
        assert!(line.starts_with(&format!("eventId={}", event.id())));
        assert!(line.contains("operation=sync"));
        assert!(line.ends_with("count=3"));
    }

    #[test]
    fn test_finish_counts_events() {
        let entry = EventEntry::noop();
        let first = entry.start_event("a");
        let second = entry.start_event("b");
        assert_ne!(first.id(), second.id());

        entry.finish_event(first);
        entry.finish_event(second);
        assert_eq!(entry.emitted(), 2);
    }
}
