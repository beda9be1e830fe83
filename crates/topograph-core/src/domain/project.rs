//! The project aggregate.

use super::Application;
use crate::error::{Error, Result};
use serde::Serialize;

/// The full set of applications under analysis for one invocation.
///
/// A project is built once from configuration. After [`Project::new`] (which
/// assigns ids) it is treated as read-only by every analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Project {
    /// Project name
    pub name: String,

    /// Applications in declaration order
    pub applications: Vec<Application>,
}

impl Project {
    /// Build a project and assign application ids.
    pub fn new(name: impl Into<String>, applications: Vec<Application>) -> Self {
        let mut project = Self {
            name: name.into(),
            applications,
        };
        project.assign_ids();
        project
    }

    /// Set every application's id to its 1-based position.
    pub fn assign_ids(&mut self) {
        for (position, application) in self.applications.iter_mut().enumerate() {
            application.id = position + 1;
        }
    }

    /// Find an application by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApplicationNotFound`] if no application has that name.
    pub fn find_application(&self, name: &str) -> Result<&Application> {
        self.applications
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| Error::ApplicationNotFound(name.to_string()))
    }

    /// Returns `true` if an application with that name exists.
    #[must_use]
    pub fn has_application(&self, name: &str) -> bool {
        self.applications.iter().any(|a| a.name == name)
    }

    /// Applications with at least one dependency resolving to `target`, in
    /// declaration order.
    #[must_use]
    pub fn find_applications_that_reference(&self, target: &Application) -> Vec<&Application> {
        self.applications
            .iter()
            .filter(|candidate| {
                candidate
                    .all_dependencies()
                    .any(|d| d.application(self).is_ok_and(|a| a.name == target.name))
            })
            .collect()
    }

    /// Number of applications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.applications.len()
    }

    /// Returns `true` if the project has no applications.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}
