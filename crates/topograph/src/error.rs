//! Error types for loading projects from disk.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for configuration and definition loading.
#[derive(Debug, Error)]
pub enum Error {
    /// A file or directory could not be read.
    #[error("Cannot read {}: {source}", .path.display())]
    Io {
        /// The path that failed
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// A file is not well-formed YAML, or does not match the expected shape.
    #[error("Cannot parse {}: {source}", .path.display())]
    Yaml {
        /// The file that failed to parse
        path: PathBuf,
        /// Underlying parser error
        #[source]
        source: serde_yaml::Error,
    },

    /// The project configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A definition file parsed but its content is not acceptable.
    #[error("Invalid definition in {}: {message}", .path.display())]
    Definition {
        /// The offending file
        path: PathBuf,
        /// What is wrong with it
        message: String,
    },

    /// Two definitions declare an application with the same name.
    #[error(
        "Application '{name}' is defined in {} and again in {}",
        .first.display(),
        .second.display()
    )]
    DuplicateApplication {
        /// The duplicated name
        name: String,
        /// File of the first definition
        first: PathBuf,
        /// File of the second definition
        second: PathBuf,
    },

    /// The requested sub-view does not exist in the configuration.
    #[error("Subview with name '{0}' not defined")]
    UnknownSubView(String),

    /// A file given explicitly is not a YAML file.
    #[error("Unsupported file type: {} (expected .yml or .yaml)", .0.display())]
    UnsupportedFileType(PathBuf),

    /// A definitions directory has no entries to load.
    #[error("No files found in folder {}", .0.display())]
    NoDefinitionFiles(PathBuf),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn definition(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Definition {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A specialized Result type for loading operations.
pub type Result<T> = std::result::Result<T, Error>;
