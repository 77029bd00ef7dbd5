//! Embedded resources registered per entry.
//!
//! The store only keeps handles; what a handle serves is up to the entry that
//! registered it.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use dashmap::DashMap;

/// Read-only file tree compiled into the binary.
pub trait EmbedFs: Send + Sync {
    /// Contents of `path`, if present.
    fn open(&self, path: &str) -> Option<&[u8]>;

    /// Every path in the tree.
    fn paths(&self) -> Vec<&str>;
}

/// `EmbedFs` over a static table, typically built with `include_bytes!`.
#[derive(Debug, Clone, Default)]
pub struct StaticFs {
    files: BTreeMap<&'static str, &'static [u8]>,
}

impl StaticFs {
    pub fn new(files: &[(&'static str, &'static [u8])]) -> Self {
        Self {
            files: files.iter().copied().collect(),
        }
    }
}

impl EmbedFs for StaticFs {
    fn open(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).copied()
    }

    fn paths(&self) -> Vec<&str> {
        self.files.keys().copied().collect()
    }
}

/// entry type → entry name → handle.
#[derive(Default)]
pub struct EmbedStore {
    trees: DashMap<String, HashMap<String, Arc<dyn EmbedFs>>>,
}

impl EmbedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `fs` for (type, name). Empty type, empty name or `None` is ignored.
    pub fn add(&self, entry_type: &str, name: &str, fs: impl Into<Option<Arc<dyn EmbedFs>>>) {
        let Some(fs) = fs.into() else {
            return;
        };
        if entry_type.is_empty() || name.is_empty() {
            return;
        }

        self.trees
            .entry(entry_type.to_string())
            .or_default()
            .insert(name.to_string(), fs);
    }

    pub fn get(&self, entry_type: &str, name: &str) -> Option<Arc<dyn EmbedFs>> {
        self.trees
            .get(entry_type)
            .and_then(|named| named.get(name).cloned())
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
