//! Application metadata entry.

use std::fmt;
use std::sync::Arc;

use crate::config::loader::parse_section;
use crate::config::schema::{AppInfoConfig, AppSection};
use crate::context::AppContext;
use crate::entry::{Entry, EntryMap, APP_INFO_ENTRY_NAME, APP_INFO_ENTRY_TYPE};
use crate::error::RegistryResult;

/// Descriptive metadata about the running application.
#[derive(Debug, Clone)]
pub struct AppInfoEntry {
    config: AppInfoConfig,
}

impl AppInfoEntry {
    pub fn new(config: AppInfoConfig) -> Self {
        Self { config }
    }

    pub fn app_name(&self) -> &str {
        &self.config.name
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn keywords(&self) -> &[String] {
        &self.config.keywords
    }

    pub fn home_url(&self) -> Option<&url::Url> {
        self.config.home_url.as_ref()
    }

    pub fn docs_url(&self) -> Option<&url::Url> {
        self.config.docs_url.as_ref()
    }

    pub fn maintainers(&self) -> &[String] {
        &self.config.maintainers
    }
}

impl Default for AppInfoEntry {
    fn default() -> Self {
        Self::new(AppInfoConfig::default())
    }
}

impl fmt::Display for AppInfoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dump = serde_json::json!({
            "entryName": APP_INFO_ENTRY_NAME,
            "entryType": APP_INFO_ENTRY_TYPE,
            "appName": self.config.name,
            "version": self.config.version,
            "keywords": self.config.keywords,
            "maintainers": self.config.maintainers,
        });
        write!(f, "{}", dump)
    }
}

impl Entry for AppInfoEntry {
    fn name(&self) -> &str {
        APP_INFO_ENTRY_NAME
    }

    fn entry_type(&self) -> &str {
        APP_INFO_ENTRY_TYPE
    }

    fn description(&self) -> &str {
        &self.config.description
    }

    fn bootstrap(&self, _ctx: &AppContext) {
        tracing::info!(
            app_name = %self.config.name,
            version = %self.config.version,
            "Application info loaded"
        );
    }

    fn interrupt(&self, _ctx: &AppContext) {}
}

/// Registration function for the `app` section.
///
/// Produces nothing when the section is absent so the default instance
/// created with the context stays in place.
pub fn register_app_info_entry_yaml(raw: &[u8]) -> RegistryResult<EntryMap> {
    let section: AppSection = parse_section(raw)?;
    let mut entries = EntryMap::new();

    if let Some(app) = section.app {
        let entry: Arc<dyn Entry> = Arc::new(AppInfoEntry::new(app));
        entries.insert(APP_INFO_ENTRY_NAME.to_string(), entry);
    }
    Ok(entries)
}
