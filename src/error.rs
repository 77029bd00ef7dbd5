//! Error types for fallible registry operations.
//!
//! Most registry operations are silent on bad input and return `Option` on a
//! miss. The types here cover the surfaces that genuinely fail: typed lookups
//! that must say *why* they missed, boot document handling, and crypto entries.

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors surfaced by the registry and the bootstrap orchestrator.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No entry is registered under the given type and name.
    #[error("entry {entry_type}/{name} not found")]
    NotFound { entry_type: String, name: String },

    /// An entry exists but is not of the requested kind.
    #[error("entry {entry_type}/{name} is not a {expected}")]
    KindMismatch {
        entry_type: String,
        name: String,
        expected: &'static str,
    },

    /// The boot document or a config entry source could not be used.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A crypto entry failed to encrypt or decrypt.
    #[error("crypto error: {0}")]
    Crypto(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
