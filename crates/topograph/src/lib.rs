//! Topograph - load and analyze architecture definitions.
//!
//! This crate reads a project configuration and the application definition
//! files it points at, builds a [`topograph_core::Project`], and provides the
//! `topograph` command-line interface over the analyses in
//! [`topograph_core`].

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod config;
pub mod error;
pub mod loader;

// Public CLI module (needed by binary)
pub mod cli;

// Rendering of command results
pub mod output;

mod strict;

pub use config::{ApplicationOverride, DEFAULT_CONFIG_FILE, ProjectConfig, SubViewConfig};
pub use error::{Error, Result};
pub use loader::{ParsedDefinition, ProjectLoader};
