//! Boot document handling.
//!
//! # Data Flow
//! ```text
//! boot file (YAML)
//!     → loader.rs (read raw bytes)
//!     → registration functions, one per entry kind
//!         → schema.rs (deserialize the section they own)
//!         → validation.rs (semantic checks on that section)
//!         → entries
//! ```
//!
//! # Design Decisions
//! - The registry only ever sees raw bytes; each registration function decodes
//!   the part of the document it understands
//! - All fields have defaults to allow minimal documents
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{
    AppInfoConfig, AppSection, BootConfig, ConfigSection, ConfigSourceConfig, EventConfig,
    EventSection, LogLevel, LoggerConfig, LoggerSection, Output, OutputFormat,
};
