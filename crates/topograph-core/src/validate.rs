//! Structural validation of a project.
//!
//! Validation never stops at the first defect: every problem in the project
//! is collected so a single run can report all of them.

use crate::domain::{Project, REFERENCE_SEPARATOR};
use crate::error::Error;
use std::collections::HashSet;
use thiserror::Error;

/// A structural defect found in a project.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An application has an empty name.
    #[error("Application at position {position} has an empty name")]
    EmptyName {
        /// 1-based position of the application in the project
        position: usize,
    },

    /// An application name contains the reference separator.
    #[error("Application name '{0}' contains '.'")]
    NameContainsSeparator(String),

    /// Two applications share a name.
    #[error("Application name '{0}' is duplicated")]
    DuplicateName(String),

    /// A dependency does not resolve.
    #[error("Application '{application}' Dependencies has Error: {source}")]
    Dependency {
        /// Name of the application owning the dependency
        application: String,
        /// Why the dependency did not resolve
        #[source]
        source: Error,
    },
}

impl ValidationError {
    /// Name of the application the defect belongs to, if it has one.
    #[must_use]
    pub fn application(&self) -> Option<&str> {
        match self {
            Self::EmptyName { .. } => None,
            Self::NameContainsSeparator(name) | Self::DuplicateName(name) => Some(name),
            Self::Dependency { application, .. } => Some(application),
        }
    }
}

/// Validate `project` and return every defect found, in declaration order.
///
/// For each application the name is checked first, then each of its
/// flattened dependencies is resolved: the target application must exist,
/// and if the reference names a service, the target must expose it.
#[must_use]
pub fn validate(project: &Project) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, application) in project.applications.iter().enumerate() {
        if application.name.is_empty() {
            errors.push(ValidationError::EmptyName {
                position: index + 1,
            });
        } else if application.name.contains(REFERENCE_SEPARATOR) {
            errors.push(ValidationError::NameContainsSeparator(
                application.name.clone(),
            ));
        }
        if !application.name.is_empty() && !seen.insert(&application.name) {
            errors.push(ValidationError::DuplicateName(application.name.clone()));
        }

        for dependency in application.all_dependencies() {
            if let Err(source) = dependency.service(project) {
                errors.push(ValidationError::Dependency {
                    application: application.name.clone(),
                    source,
                });
            }
        }
    }

    tracing::debug!(
        project = %project.name,
        errors = errors.len(),
        "Validated project"
    );
    errors
}
