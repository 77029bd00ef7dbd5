//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process-wide `tracing` subscriber for the binary
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via `RUST_LOG`, with a fallback filter
//! - Library code never installs a global subscriber; `LoggerEntry` builds
//!   scoped dispatchers instead

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber, reading `RUST_LOG` or falling back to
/// `default_filter`.
pub fn init(default_filter: &str) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
