//! Readiness and liveness probes.
//!
//! # Data Flow
//! ```text
//! Probe callbacks (probes.rs):
//!     Set on the AppContext → single slot per probe, last write wins
//!
//! Probe endpoints (router.rs):
//!     GET /readyz, GET /livez
//!     → response pre-filled with 200 "ok"
//!     → callback, if set, may edit the response
//!     → false result with a still-200 status becomes 503
//! ```
//!
//! # Design Decisions
//! - The context only stores the callbacks; serving them is opt-in
//! - No callback means the probe always succeeds

pub mod probes;
pub mod router;

pub use probes::{LivenessCheck, ProbeCheck, ProbeSlot, ReadinessCheck};
pub use router::probe_router;
