//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registry, orchestrator, signal listener produce:
//!     → tracing events (structured fields: entry_type, entry_name, class)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → logging.rs subscriber installed by the binary
//!     → whatever metrics recorder the host installs
//! ```

pub mod logging;
pub mod metrics;
