//! Config entry: key/value settings from a file, inline defaults and env.
//!
//! # Responsibilities
//! - Load a TOML, YAML or JSON file on bootstrap
//! - Merge it over the inline `content` of the boot document
//! - Resolve dotted keys, letting `<PREFIX>_<KEY>` environment variables win
//!
//! # Design Decisions
//! - Values are held in an `ArcSwap` so readers never block a reload
//! - A load failure at bootstrap is logged and leaves the inline values live

use std::env;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::Value;

use crate::config::loader::{load_document, parse_section, ConfigError};
use crate::config::schema::{ConfigSection, ConfigSourceConfig};
use crate::config::validation::validate_config_sources;
use crate::context::AppContext;
use crate::entry::{Entry, EntryMap, CONFIG_ENTRY_TYPE};
use crate::error::RegistryResult;

/// A named configuration source.
#[derive(Debug)]
pub struct ConfigEntry {
    config: ConfigSourceConfig,
    values: ArcSwap<Value>,
}

impl ConfigEntry {
    pub fn new(config: ConfigSourceConfig) -> Self {
        let values = ArcSwap::from_pointee(Value::Object(config.content.clone()));
        Self { config, values }
    }

    /// (Re)load the backing file, if any, over the inline content.
    pub fn load(&self) -> Result<(), ConfigError> {
        let mut merged = Value::Object(self.config.content.clone());
        if let Some(path) = &self.config.path {
            let document = load_document(path)?;
            merge(&mut merged, document);
        }
        self.values.store(Arc::new(merged));
        Ok(())
    }

    /// Look up a dotted key such as `db.host`.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.env_override(key) {
            return Some(Value::String(value));
        }

        let values = self.values.load();
        let mut current: &Value = &values;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current.clone())
    }

    /// Like [`get`](Self::get), rendering non-string values as text.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// Snapshot of every loaded value.
    pub fn values(&self) -> Arc<Value> {
        self.values.load_full()
    }

    fn env_override(&self, key: &str) -> Option<String> {
        let prefix = self.config.env_prefix.as_deref()?;
        let var = format!("{}_{}", prefix, key.replace('.', "_")).to_uppercase();
        env::var(var).ok()
    }
}

/// Deep-merge `overlay` into `base`; objects merge key by key, anything else replaces.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                merge(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, overlay) => *base = overlay,
    }
}

impl fmt::Display for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dump = serde_json::json!({
            "entryName": self.config.name,
            "entryType": CONFIG_ENTRY_TYPE,
            "entryDescription": self.config.description,
            "path": self.config.path,
            "envPrefix": self.config.env_prefix,
        });
        write!(f, "{}", dump)
    }
}

impl Entry for ConfigEntry {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn entry_type(&self) -> &str {
        CONFIG_ENTRY_TYPE
    }

    fn description(&self) -> &str {
        &self.config.description
    }

    fn bootstrap(&self, _ctx: &AppContext) {
        if let Err(e) = self.load() {
            tracing::error!(
                entry_name = %self.config.name,
                error = %e,
                "Failed to load config source, keeping inline values"
            );
            return;
        }
        tracing::debug!(entry_name = %self.config.name, path = ?self.config.path, "Config loaded");
    }

    fn interrupt(&self, _ctx: &AppContext) {}
}

/// Registration function for the `config` section.
pub fn register_config_entry_yaml(raw: &[u8]) -> RegistryResult<EntryMap> {
    let section: ConfigSection = parse_section(raw)?;

    let errors = validate_config_sources(&section.config);
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors).into());
    }

    Ok(section
        .config
        .into_iter()
        .map(|config| {
            let entry: Arc<dyn Entry> = Arc::new(ConfigEntry::new(config));
            (entry.name().to_string(), entry)
        })
        .collect())
}
