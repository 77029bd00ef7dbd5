//! Process-wide application context.
//!
//! # Responsibilities
//! - Own the entry registry and the four registration-function lists
//! - Orchestrate entry bootstrap from a boot document
//! - Carry the shutdown channel, shutdown hooks, user values, embedded
//!   resources and probe callbacks
//!
//! # Design Decisions
//! - Passed explicitly as `Arc<AppContext>`; [`AppContext::global`] exists
//!   only for the outermost composition layer
//! - Every store is locked for the duration of one call and hands out
//!   snapshots, so entries may call back into the context from `bootstrap`
//! - Only [`AppContext::wait_for_shutdown_sig`] suspends

pub mod embed;
pub mod registry;
pub mod values;

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant, SystemTime};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::entry::{
    AppInfoEntry, ConfigEntry, Crypto, Entry, EntryMap, EventEntry, LoggerEntry,
    APP_INFO_ENTRY_NAME, APP_INFO_ENTRY_TYPE, CONFIG_ENTRY_TYPE, CRYPTO_ENTRY_TYPE,
    EVENT_ENTRY_TYPE, LOGGER_ENTRY_TYPE,
};
use crate::error::RegistryResult;
use crate::health::probes::{LivenessCheck, ProbeSlot, ReadinessCheck};
use crate::lifecycle::shutdown::{ShutdownHook, ShutdownHooks, ShutdownSignal, Signal};
use crate::lifecycle::startup::{self, EntryClass, RegFunc, RegFuncTable};
use crate::lifecycle::signals;

pub use embed::{EmbedFs, EmbedStore, StaticFs};
pub use registry::EntryRegistry;
pub use values::{UserValue, UserValues};

static GLOBAL: OnceLock<Arc<AppContext>> = OnceLock::new();

/// Shared state of one application process.
pub struct AppContext {
    start_time: SystemTime,
    started: Instant,
    registry: EntryRegistry,
    reg_funcs: RegFuncTable,
    logger_stdout: Arc<LoggerEntry>,
    logger_noop: Arc<LoggerEntry>,
    event_stdout: Arc<EventEntry>,
    event_noop: Arc<EventEntry>,
    values: UserValues,
    embeds: EmbedStore,
    hooks: ShutdownHooks,
    shutdown: ShutdownSignal,
    readiness: ProbeSlot,
    liveness: ProbeSlot,
}

impl AppContext {
    /// Fresh context holding only the default app-info entry and the
    /// built-in registration functions.
    pub fn new() -> Self {
        let ctx = Self {
            start_time: SystemTime::now(),
            started: Instant::now(),
            registry: EntryRegistry::new(),
            reg_funcs: RegFuncTable::with_builtins(),
            logger_stdout: Arc::new(LoggerEntry::stdout()),
            logger_noop: Arc::new(LoggerEntry::noop()),
            event_stdout: Arc::new(EventEntry::stdout()),
            event_noop: Arc::new(EventEntry::noop()),
            values: UserValues::new(),
            embeds: EmbedStore::new(),
            hooks: ShutdownHooks::new(),
            shutdown: ShutdownSignal::new(),
            readiness: ProbeSlot::new(),
            liveness: ProbeSlot::new(),
        };
        ctx.registry.add(Arc::new(AppInfoEntry::default()));
        ctx
    }

    /// The process-wide context, created on first use.
    pub fn global() -> Arc<AppContext> {
        GLOBAL.get_or_init(|| Arc::new(AppContext::new())).clone()
    }

    pub fn registry(&self) -> &EntryRegistry {
        &self.registry
    }

    pub fn reg_funcs(&self) -> &RegFuncTable {
        &self.reg_funcs
    }

    // --- Entries ---

    /// Insert or overwrite `entry` at its (type, name). `None` is ignored.
    pub fn add_entry(&self, entry: impl Into<Option<Arc<dyn Entry>>>) {
        if let Some(entry) = entry.into() {
            self.registry.add(entry);
        }
    }

    pub fn get_entry(&self, entry_type: &str, name: &str) -> Option<Arc<dyn Entry>> {
        self.registry.get(entry_type, name)
    }

    /// Fetch an entry as the concrete kind `T`.
    pub fn lookup<T: Entry>(&self, entry_type: &str, name: &str) -> RegistryResult<Arc<T>> {
        self.registry.lookup(entry_type, name)
    }

    pub fn remove_entry(&self, entry: &dyn Entry) {
        self.registry.remove(entry);
    }

    pub fn remove_entry_by_type(&self, entry_type: &str) {
        self.registry.remove_by_type(entry_type);
    }

    pub fn list_entries_by_type(&self, entry_type: &str) -> EntryMap {
        self.registry.list_by_type(entry_type)
    }

    pub fn list_entries(&self) -> HashMap<String, EntryMap> {
        self.registry.list()
    }

    /// Drop every entry, including the default app-info entry.
    pub fn clear_entries(&self) {
        self.registry.clear();
    }

    pub fn get_app_info_entry(&self) -> Option<Arc<AppInfoEntry>> {
        self.registry
            .lookup(APP_INFO_ENTRY_TYPE, APP_INFO_ENTRY_NAME)
            .ok()
    }

    pub fn get_config_entry(&self, name: &str) -> Option<Arc<ConfigEntry>> {
        self.registry.lookup(CONFIG_ENTRY_TYPE, name).ok()
    }

    pub fn get_logger_entry(&self, name: &str) -> Option<Arc<LoggerEntry>> {
        self.registry.lookup(LOGGER_ENTRY_TYPE, name).ok()
    }

    pub fn get_event_entry(&self, name: &str) -> Option<Arc<EventEntry>> {
        self.registry.lookup(EVENT_ENTRY_TYPE, name).ok()
    }

    pub fn get_crypto_entry(&self, name: &str) -> Option<Arc<dyn Crypto>> {
        self.registry.get(CRYPTO_ENTRY_TYPE, name)?.as_crypto()
    }

    /// The default logger entry, or the stdout fallback if none is flagged.
    pub fn get_logger_entry_default(&self) -> Arc<LoggerEntry> {
        self.registry
            .find_default(LOGGER_ENTRY_TYPE)
            .unwrap_or_else(|| self.logger_stdout.clone())
    }

    /// The default event entry, or the stdout fallback if none is flagged.
    pub fn get_event_entry_default(&self) -> Arc<EventEntry> {
        self.registry
            .find_default(EVENT_ENTRY_TYPE)
            .unwrap_or_else(|| self.event_stdout.clone())
    }

    pub fn logger_entry_stdout(&self) -> Arc<LoggerEntry> {
        self.logger_stdout.clone()
    }

    pub fn logger_entry_noop(&self) -> Arc<LoggerEntry> {
        self.logger_noop.clone()
    }

    pub fn event_entry_stdout(&self) -> Arc<EventEntry> {
        self.event_stdout.clone()
    }

    pub fn event_entry_noop(&self) -> Arc<EventEntry> {
        self.event_noop.clone()
    }

    // --- Registration Functions ---

    pub fn register_plugin_reg_func(&self, func: impl Into<Option<RegFunc>>) {
        self.reg_funcs.register(EntryClass::Plugin, func);
    }

    pub fn register_web_frame_reg_func(&self, func: impl Into<Option<RegFunc>>) {
        self.reg_funcs.register(EntryClass::WebFrame, func);
    }

    pub fn register_user_entry_reg_func(&self, func: impl Into<Option<RegFunc>>) {
        self.reg_funcs.register(EntryClass::UserDefined, func);
    }

    pub fn list_builtin_entry_reg_func(&self) -> Vec<RegFunc> {
        self.reg_funcs.snapshot(EntryClass::BuiltIn)
    }

    pub fn list_plugin_entry_reg_func(&self) -> Vec<RegFunc> {
        self.reg_funcs.snapshot(EntryClass::Plugin)
    }

    pub fn list_web_frame_entry_reg_func(&self) -> Vec<RegFunc> {
        self.reg_funcs.snapshot(EntryClass::WebFrame)
    }

    pub fn list_user_entry_reg_func(&self) -> Vec<RegFunc> {
        self.reg_funcs.snapshot(EntryClass::UserDefined)
    }

    // --- Bootstrap ---

    pub fn bootstrap_builtin_entry_from_yaml(&self, raw: &[u8]) -> RegistryResult<usize> {
        startup::bootstrap_class(self, EntryClass::BuiltIn, raw)
    }

    pub fn bootstrap_plugin_entry_from_yaml(&self, raw: &[u8]) -> RegistryResult<usize> {
        startup::bootstrap_class(self, EntryClass::Plugin, raw)
    }

    pub fn bootstrap_web_frame_entry_from_yaml(&self, raw: &[u8]) -> RegistryResult<usize> {
        startup::bootstrap_class(self, EntryClass::WebFrame, raw)
    }

    pub fn bootstrap_user_entry_from_yaml(&self, raw: &[u8]) -> RegistryResult<usize> {
        startup::bootstrap_class(self, EntryClass::UserDefined, raw)
    }

    /// Built-in, plugin, web-framework and user-defined classes, in that order.
    pub fn bootstrap_all_from_yaml(&self, raw: &[u8]) -> RegistryResult<usize> {
        startup::bootstrap_all(self, raw)
    }

    // --- Shutdown ---

    /// Forward OS termination signals into this context's shutdown channel.
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn install_signal_handlers(&self) -> io::Result<JoinHandle<()>> {
        let handle = signals::listen(self.shutdown.sender())?;
        tracing::info!("Signal handlers installed");
        Ok(handle)
    }

    /// Wait for the next shutdown signal. Each signal releases one call.
    pub async fn wait_for_shutdown_sig(&self) -> Option<Signal> {
        self.shutdown.wait().await
    }

    pub fn shutdown_sender(&self) -> mpsc::UnboundedSender<Signal> {
        self.shutdown.sender()
    }

    /// Store `hook` under `name`. `None` is ignored; last write wins.
    pub fn add_shutdown_hook(&self, name: impl Into<String>, hook: impl Into<Option<ShutdownHook>>) {
        self.hooks.add(name, hook);
    }

    pub fn get_shutdown_hook(&self, name: &str) -> Option<ShutdownHook> {
        self.hooks.get(name)
    }

    pub fn list_shutdown_hooks(&self) -> HashMap<String, ShutdownHook> {
        self.hooks.list()
    }

    pub fn remove_shutdown_hook(&self, name: &str) -> bool {
        self.hooks.remove(name)
    }

    pub fn clear_shutdown_hooks(&self) {
        self.hooks.clear();
    }

    pub fn start_time(&self) -> SystemTime {
        self.start_time
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    // --- Values ---

    pub fn add_value<T: std::any::Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.values.add(key, value);
    }

    pub fn get_value(&self, key: &str) -> Option<UserValue> {
        self.values.get(key)
    }

    pub fn get_value_as<T: std::any::Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.values.get_as(key)
    }

    pub fn list_values(&self) -> HashMap<String, UserValue> {
        self.values.list()
    }

    pub fn remove_value(&self, key: &str) {
        self.values.remove(key);
    }

    pub fn clear_values(&self) {
        self.values.clear();
    }

    // --- Embedded Resources ---

    pub fn add_embed_fs(
        &self,
        entry_type: &str,
        name: &str,
        fs: impl Into<Option<Arc<dyn EmbedFs>>>,
    ) {
        self.embeds.add(entry_type, name, fs);
    }

    pub fn get_embed_fs(&self, entry_type: &str, name: &str) -> Option<Arc<dyn EmbedFs>> {
        self.embeds.get(entry_type, name)
    }

    // --- Probes ---

    pub fn set_readiness_check(&self, check: impl Into<Option<ReadinessCheck>>) {
        self.readiness.set(check);
    }

    pub fn set_liveness_check(&self, check: impl Into<Option<LivenessCheck>>) {
        self.liveness.set(check);
    }

    pub fn readiness_check(&self) -> Option<ReadinessCheck> {
        self.readiness.get()
    }

    pub fn liveness_check(&self) -> Option<LivenessCheck> {
        self.liveness.get()
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}
