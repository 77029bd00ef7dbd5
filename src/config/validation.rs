//! Boot document validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - At most one default entry per logger/event section
//! - No duplicate names within a section (they would silently overwrite)
//! - Config sources point at a loadable file format
//! - Event entries write to stdout or nowhere
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Sections validate independently so each registration function only
//!   fails on the section it owns

use std::collections::HashSet;

use thiserror::Error;

use crate::config::loader::DocumentFormat;
use crate::config::schema::{BootConfig, ConfigSourceConfig, EventConfig, LoggerConfig, Output};

/// A single semantic problem in the boot document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{section}: more than one default entry ('{first}' and '{second}')")]
    MultipleDefaults {
        section: &'static str,
        first: String,
        second: String,
    },

    #[error("{section}: duplicate entry name '{name}'")]
    DuplicateName { section: &'static str, name: String },

    #[error("config '{name}': unsupported file format '{path}'")]
    UnsupportedPath { name: String, path: String },

    #[error("{section} '{name}': unsupported output '{output}'")]
    UnsupportedOutput {
        section: &'static str,
        name: String,
        output: &'static str,
    },
}

/// Validate every section of the boot document.
pub fn validate_boot_config(config: &BootConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    errors.extend(validate_loggers(&config.logger));
    errors.extend(validate_events(&config.event));
    errors.extend(validate_config_sources(&config.config));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the `logger` section.
pub fn validate_loggers(loggers: &[LoggerConfig]) -> Vec<ValidationError> {
    check_section(
        "logger",
        loggers.iter().map(|l| (l.name.as_str(), l.default)),
    )
}

/// Validate the `event` section.
pub fn validate_events(events: &[EventConfig]) -> Vec<ValidationError> {
    let mut errors = check_section("event", events.iter().map(|e| (e.name.as_str(), e.default)));

    for event in events {
        if event.output == Output::Stderr {
            errors.push(ValidationError::UnsupportedOutput {
                section: "event",
                name: event.name.clone(),
                output: "stderr",
            });
        }
    }
    errors
}

/// Validate the `config` section.
pub fn validate_config_sources(sources: &[ConfigSourceConfig]) -> Vec<ValidationError> {
    let mut errors = check_section("config", sources.iter().map(|c| (c.name.as_str(), false)));

    for source in sources {
        if let Some(path) = &source.path {
            if DocumentFormat::from_path(path).is_none() {
                errors.push(ValidationError::UnsupportedPath {
                    name: source.name.clone(),
                    path: path.display().to_string(),
                });
            }
        }
    }
    errors
}

fn check_section<'a>(
    section: &'static str,
    items: impl Iterator<Item = (&'a str, bool)>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let mut default_name: Option<&str> = None;

    for (name, is_default) in items {
        if !seen.insert(name) {
            errors.push(ValidationError::DuplicateName {
                section,
                name: name.to_string(),
            });
        }
        if is_default {
            match default_name {
                Some(first) => errors.push(ValidationError::MultipleDefaults {
                    section,
                    first: first.to_string(),
                    second: name.to_string(),
                }),
                None => default_name = Some(name),
            }
        }
    }
    errors
}
