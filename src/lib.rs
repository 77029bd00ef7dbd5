//! Process-wide application registry.
//!
//! Entries (loggers, event emitters, config sources, app metadata and
//! user-defined subsystems) are built from a YAML boot document by ordered
//! registration functions, stored by (type, name) in an [`AppContext`] and
//! bootstrapped class by class. The context also carries the shutdown signal
//! channel, named shutdown hooks, user values, embedded resources and
//! readiness/liveness callbacks.

// Core
pub mod context;
pub mod entry;
pub mod error;

// Boot document
pub mod config;

// Process lifecycle
pub mod health;
pub mod lifecycle;
pub mod observability;

pub use context::AppContext;
pub use entry::{Crypto, Entry, EntryMap};
pub use error::{RegistryError, RegistryResult};
pub use lifecycle::{EntryClass, RegFunc, ShutdownHook, Signal};
