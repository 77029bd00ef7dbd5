//! Startup orchestration.
//!
//! # Responsibilities
//! - Hold the registration functions of each priority class
//! - Turn raw boot bytes into entries, class by class
//! - Register every produced entry, then bootstrap it
//!
//! # Design Decisions
//! - Class order is fixed: built-in, plugin, web-framework, user-defined.
//!   Logging, config and events are live before anything that uses them
//! - Within a class, functions run in registration order; within one
//!   function's output, entries run in name order
//! - Lists are append-only `ArcSwap<Vec<_>>`; a pass iterates a snapshot, so
//!   a registration function may register further functions without deadlock
//! - No retry and no deadline: a stuck bootstrap stalls the pass

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;

use crate::context::AppContext;
use crate::entry::app_info::register_app_info_entry_yaml;
use crate::entry::config::register_config_entry_yaml;
use crate::entry::event::register_event_entry_yaml;
use crate::entry::logger::register_logger_entry_yaml;
use crate::entry::EntryMap;
use crate::error::RegistryResult;
use crate::observability::metrics;

type RegFn = dyn Fn(&[u8]) -> RegistryResult<EntryMap> + Send + Sync;

/// A registration function: raw boot document bytes in, named entries out.
#[derive(Clone)]
pub struct RegFunc(Arc<RegFn>);

impl RegFunc {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[u8]) -> RegistryResult<EntryMap> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, raw: &[u8]) -> RegistryResult<EntryMap> {
        (self.0)(raw)
    }
}

impl fmt::Debug for RegFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegFunc").finish_non_exhaustive()
    }
}

/// Priority class of a registration function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryClass {
    BuiltIn,
    Plugin,
    WebFrame,
    UserDefined,
}

impl EntryClass {
    /// Bootstrap order across classes.
    pub const ORDER: [EntryClass; 4] = [
        EntryClass::BuiltIn,
        EntryClass::Plugin,
        EntryClass::WebFrame,
        EntryClass::UserDefined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryClass::BuiltIn => "builtin",
            EntryClass::Plugin => "plugin",
            EntryClass::WebFrame => "web_frame",
            EntryClass::UserDefined => "user_defined",
        }
    }
}

impl fmt::Display for EntryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four ordered registration-function lists.
pub struct RegFuncTable {
    builtin: ArcSwap<Vec<RegFunc>>,
    plugin: ArcSwap<Vec<RegFunc>>,
    web_frame: ArcSwap<Vec<RegFunc>>,
    user_defined: ArcSwap<Vec<RegFunc>>,
}

impl RegFuncTable {
    /// Table whose built-in list holds the app-info, logger, event and config
    /// constructors.
    pub fn with_builtins() -> Self {
        let table = Self::empty();
        table.builtin.store(Arc::new(vec![
            RegFunc::new(register_app_info_entry_yaml),
            RegFunc::new(register_logger_entry_yaml),
            RegFunc::new(register_event_entry_yaml),
            RegFunc::new(register_config_entry_yaml),
        ]));
        table
    }

    /// Table with all four lists empty.
    pub fn empty() -> Self {
        Self {
            builtin: ArcSwap::from_pointee(Vec::new()),
            plugin: ArcSwap::from_pointee(Vec::new()),
            web_frame: ArcSwap::from_pointee(Vec::new()),
            user_defined: ArcSwap::from_pointee(Vec::new()),
        }
    }

    fn list(&self, class: EntryClass) -> &ArcSwap<Vec<RegFunc>> {
        match class {
            EntryClass::BuiltIn => &self.builtin,
            EntryClass::Plugin => &self.plugin,
            EntryClass::WebFrame => &self.web_frame,
            EntryClass::UserDefined => &self.user_defined,
        }
    }

    /// Append `func` to the list of `class`. `None` is ignored.
    ///
    /// The built-in list is fixed at construction and cannot be extended.
    pub fn register(&self, class: EntryClass, func: impl Into<Option<RegFunc>>) {
        let Some(func) = func.into() else {
            return;
        };
        if class == EntryClass::BuiltIn {
            tracing::warn!("Built-in registration functions are fixed, ignoring registration");
            return;
        }

        self.list(class).rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(func.clone());
            next
        });
        tracing::debug!(class = %class, "Registration function added");
    }

    /// Copy of the list of `class`.
    pub fn snapshot(&self, class: EntryClass) -> Vec<RegFunc> {
        self.list(class).load().to_vec()
    }

    pub fn len(&self, class: EntryClass) -> usize {
        self.list(class).load().len()
    }

    #[cfg(test)]
    pub(crate) fn clear(&self, class: EntryClass) {
        self.list(class).store(Arc::new(Vec::new()));
    }
}

impl Default for RegFuncTable {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Run every registration function of `class` against `raw`, register the
/// produced entries and bootstrap them.
///
/// Returns the number of entries bootstrapped. A failing registration
/// function aborts the pass; entries bootstrapped before it stay registered.
pub fn bootstrap_class(ctx: &AppContext, class: EntryClass, raw: &[u8]) -> RegistryResult<usize> {
    let funcs = ctx.reg_funcs().snapshot(class);
    let mut count = 0;

    for func in &funcs {
        let entries = func.call(raw).inspect_err(|e| {
            tracing::error!(class = %class, error = %e, "Registration function failed");
        })?;

        for entry in entries.values() {
            ctx.add_entry(entry.clone());
        }

        for entry in entries.values() {
            let started = Instant::now();
            entry.bootstrap(ctx);
            metrics::record_bootstrap(class.as_str(), entry.entry_type(), started);

            tracing::info!(
                class = %class,
                entry_type = %entry.entry_type(),
                entry_name = %entry.name(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Entry bootstrapped"
            );
            count += 1;
        }
    }
    Ok(count)
}

/// Bootstrap all four classes in order.
pub fn bootstrap_all(ctx: &AppContext, raw: &[u8]) -> RegistryResult<usize> {
    let started = Instant::now();
    let mut total = 0;
    for class in EntryClass::ORDER {
        total += bootstrap_class(ctx, class, raw)?;
    }

    tracing::info!(
        entries = total,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Bootstrap complete"
    );
    Ok(total)
}
