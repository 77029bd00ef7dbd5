//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Boot bytes → registration functions (built-in, plugin, web-frame,
//!     user-defined) → register entries → bootstrap entries
//!
//! Shutdown (shutdown.rs):
//!     Signal received → waiter released → owning process runs hooks
//!     → owning process interrupts entries → exit
//!
//! Signals (signals.rs):
//!     SIGHUP/SIGINT/SIGTERM/SIGQUIT → shutdown channel
//! ```
//!
//! # Design Decisions
//! - Ordered startup: infrastructure entries first, user entries last
//! - The context stores hooks but never runs them; the process decides when
//! - Signals are forwarded, not interpreted

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{ShutdownHook, ShutdownHooks, ShutdownSignal, Signal};
pub use startup::{EntryClass, RegFunc, RegFuncTable};
