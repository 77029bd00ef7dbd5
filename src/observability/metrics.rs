//! Metrics collection.
//!
//! # Metrics
//! - `app_registry_entries` (gauge): registered entries by entry type
//! - `app_registry_bootstraps_total` (counter): bootstrapped entries by class, entry type
//! - `app_registry_bootstrap_duration_seconds` (histogram): time spent in `bootstrap`
//! - `app_registry_shutdown_signals_total` (counter): received signals by name
//!
//! # Design Decisions
//! - Only the `metrics` facade is used; the host process installs a recorder
//!   (and exporter) if it wants them, otherwise every call is a no-op

use std::time::Instant;

/// Record the current number of entries of `entry_type`.
pub fn record_entry_count(entry_type: &str, count: usize) {
    metrics::gauge!("app_registry_entries", "entry_type" => entry_type.to_string())
        .set(count as f64);
}

/// Record one completed entry bootstrap.
pub fn record_bootstrap(class: &'static str, entry_type: &str, started: Instant) {
    metrics::counter!(
        "app_registry_bootstraps_total",
        "class" => class,
        "entry_type" => entry_type.to_string()
    )
    .increment(1);
    metrics::histogram!("app_registry_bootstrap_duration_seconds", "class" => class)
        .record(started.elapsed().as_secs_f64());
}

/// Record a received shutdown signal.
pub fn record_shutdown_signal(signal: &'static str) {
    metrics::counter!("app_registry_shutdown_signals_total", "signal" => signal).increment(1);
}
