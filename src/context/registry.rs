//! Two-level entry store: entry type, then entry name.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use crate::entry::{Entry, EntryMap};
use crate::error::{RegistryError, RegistryResult};
use crate::observability::metrics;

/// Concurrent entry registry.
///
/// Every operation locks one shard for its own duration only; snapshots are
/// returned by value so no guard outlives a call.
#[derive(Default)]
pub struct EntryRegistry {
    entries: DashMap<String, EntryMap>,
}

impl EntryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `entry` at its (type, name), replacing any previous one.
    pub fn add(&self, entry: Arc<dyn Entry>) {
        let entry_type = entry.entry_type().to_string();
        let name = entry.name().to_string();

        if entry.is_default() {
            if let Some(other) = self.other_default(&entry_type, &name) {
                tracing::warn!(
                    entry_type = %entry_type,
                    entry_name = %name,
                    existing = %other,
                    "Second default entry registered for type"
                );
            }
        }

        let count = {
            let mut named = self.entries.entry(entry_type.clone()).or_default();
            if named.insert(name.clone(), entry).is_some() {
                tracing::debug!(entry_type = %entry_type, entry_name = %name, "Entry replaced");
            }
            named.len()
        };
        metrics::record_entry_count(&entry_type, count);
    }

    fn other_default(&self, entry_type: &str, name: &str) -> Option<String> {
        let named = self.entries.get(entry_type)?;
        let found = named
            .iter()
            .find(|(other, e)| other.as_str() != name && e.is_default())
            .map(|(other, _)| other.clone());
        found
    }

    pub fn get(&self, entry_type: &str, name: &str) -> Option<Arc<dyn Entry>> {
        self.entries
            .get(entry_type)
            .and_then(|named| named.get(name).cloned())
    }

    /// Fetch and narrow to `T`, saying why on failure.
    pub fn lookup<T: Entry>(&self, entry_type: &str, name: &str) -> RegistryResult<Arc<T>> {
        let entry = self
            .get(entry_type, name)
            .ok_or_else(|| RegistryError::NotFound {
                entry_type: entry_type.to_string(),
                name: name.to_string(),
            })?;

        entry
            .into_any_arc()
            .downcast::<T>()
            .map_err(|_| RegistryError::KindMismatch {
                entry_type: entry_type.to_string(),
                name: name.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// First entry of `entry_type`, in name order, that narrows to `T` and is
    /// flagged default.
    pub fn find_default<T: Entry>(&self, entry_type: &str) -> Option<Arc<T>> {
        self.list_by_type(entry_type)
            .into_values()
            .filter(|entry| entry.is_default())
            .find_map(|entry| entry.into_any_arc().downcast::<T>().ok())
    }

    /// Remove the entry at `entry`'s (type, name). Idempotent.
    pub fn remove(&self, entry: &dyn Entry) {
        let count = match self.entries.get_mut(entry.entry_type()) {
            Some(mut named) => {
                named.remove(entry.name());
                named.len()
            }
            None => return,
        };
        metrics::record_entry_count(entry.entry_type(), count);
    }

    /// Drop every entry of `entry_type`. Idempotent.
    pub fn remove_by_type(&self, entry_type: &str) {
        if self.entries.remove(entry_type).is_some() {
            metrics::record_entry_count(entry_type, 0);
        }
    }

    /// Snapshot of the entries of `entry_type`; empty for an unknown type.
    pub fn list_by_type(&self, entry_type: &str) -> EntryMap {
        self.entries
            .get(entry_type)
            .map(|named| named.value().clone())
            .unwrap_or_default()
    }

    /// Snapshot of the whole registry.
    pub fn list(&self) -> HashMap<String, EntryMap> {
        self.entries
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }

    /// Total number of entries across all types.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|r| r.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn clear(&self) {
        self.entries.clear();
    }
}
