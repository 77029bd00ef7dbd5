//! Entry abstraction and the built-in entry kinds.
//!
//! # Data Flow
//! ```text
//! boot document bytes
//!     → registration function (one per entry kind)
//!     → EntryMap (name → Arc<dyn Entry>)
//!     → AppContext registry (type → name → entry)
//!     → Entry::bootstrap
//!     ...
//!     → Entry::interrupt (owning process, at shutdown)
//! ```
//!
//! # Design Decisions
//! - Entries are shared as `Arc<dyn Entry>`; lifecycle methods take `&self`
//!   so entries keep their own interior state
//! - Narrowing to a concrete kind happens only at the registry accessors,
//!   through `into_any_arc`
//! - Capabilities that are traits rather than concrete types (`Crypto`) are
//!   narrowed through a dedicated provided method

pub mod app_info;
pub mod config;
pub mod event;
pub mod logger;

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::context::AppContext;
use crate::error::RegistryResult;

pub use app_info::AppInfoEntry;
pub use config::ConfigEntry;
pub use event::{Event, EventEntry};
pub use logger::LoggerEntry;

pub const APP_INFO_ENTRY_TYPE: &str = "AppInfoEntry";
pub const APP_INFO_ENTRY_NAME: &str = "AppInfoDefault";
pub const LOGGER_ENTRY_TYPE: &str = "LoggerEntry";
pub const EVENT_ENTRY_TYPE: &str = "EventEntry";
pub const CONFIG_ENTRY_TYPE: &str = "ConfigEntry";
pub const CRYPTO_ENTRY_TYPE: &str = "CryptoEntry";

/// Entries produced by one registration function, keyed by name.
pub type EntryMap = BTreeMap<String, Arc<dyn Entry>>;

/// Converts a shared entry into `Arc<dyn Any>` for downcasting.
///
/// Implemented for every sized `Send + Sync` type; entry authors never
/// implement it by hand.
pub trait AsAnyArc {
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAnyArc for T {
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A named, typed subsystem managed by the application context.
///
/// `Display` doubles as the diagnostic dump of the entry.
pub trait Entry: AsAnyArc + fmt::Display + Send + Sync + 'static {
    /// Entry name, unique within its type.
    fn name(&self) -> &str;

    /// Entry type, the first level of the registry key.
    fn entry_type(&self) -> &str;

    /// Human readable description.
    fn description(&self) -> &str;

    /// One-time initialization, called once per orchestration pass.
    fn bootstrap(&self, ctx: &AppContext);

    /// Release resources; called by the owning process at shutdown.
    fn interrupt(&self, ctx: &AppContext);

    /// Whether this entry is the default of its type.
    fn is_default(&self) -> bool {
        false
    }

    /// Narrow to the crypto capability.
    fn as_crypto(self: Arc<Self>) -> Option<Arc<dyn Crypto>> {
        None
    }
}

/// Capability of entries that encrypt and decrypt payloads.
///
/// Implementors override [`Entry::as_crypto`] to return themselves.
pub trait Crypto: Entry {
    /// Algorithm identifier, e.g. `AES-256-GCM`.
    fn algorithm(&self) -> &str;

    fn encrypt(&self, plain: &[u8]) -> RegistryResult<Vec<u8>>;

    fn decrypt(&self, cipher: &[u8]) -> RegistryResult<Vec<u8>>;
}

/// Pointer identity of two entries, ignoring vtables.
pub fn same_entry(a: &Arc<dyn Entry>, b: &Arc<dyn Entry>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
