//! Error types for lookups on the architecture model.
//!
//! A failed lookup is an ordinary outcome, not a fatal condition. The
//! validator turns these into reportable defects; renderers usually treat
//! them as "not present" and move on.

use thiserror::Error;

/// The error type for model lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No application with the given name exists in the project.
    #[error("Application with name '{0}' not found")]
    ApplicationNotFound(String),

    /// The application exists but exposes no service with the given name.
    #[error("Application {application} has no Service with name {service}")]
    ServiceNotFound {
        /// Name of the application that was searched.
        application: String,
        /// Name of the service that was requested.
        service: String,
    },

    /// The application declares no dependency to the given target.
    #[error("Application {from} has no dependencies to {to}")]
    NoDependencyTo {
        /// Name of the application whose dependencies were searched.
        from: String,
        /// Name of the requested target application.
        to: String,
    },
}

/// A specialized Result type for model lookups.
pub type Result<T> = std::result::Result<T, Error>;
