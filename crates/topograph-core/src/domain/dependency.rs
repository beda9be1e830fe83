//! Dependency edges and their by-name resolution.

use super::{Application, Project, Service, Status};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Separator between application and service name in a reference.
pub const REFERENCE_SEPARATOR: char = '.';

/// Relationship inferred for undeclared edges into open-host services.
pub const OPEN_HOST_RELATIONSHIP: &str = "open-host";

/// A directed edge from an application or service to another application,
/// optionally to one specific service on it.
///
/// The target is named by [`reference`](Self::reference): `"app"` or
/// `"app.service"`. Everything before the first `.` is the application name,
/// everything after it the service name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dependency {
    /// Target reference, `application` or `application.service`
    pub reference: String,

    /// Context-map relationship (`acl`, `customer-supplier`, `conformist`, ...)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub relationship: String,

    /// The edge should not influence layout ranking
    pub is_same_level: bool,

    /// The consumer is resilient against the target being unavailable
    pub resilience: bool,

    /// The call is made from the browser rather than server side
    pub is_browser_based: bool,

    /// Lifecycle status
    pub status: Status,
}

impl Dependency {
    /// Create a dependency on `reference` with defaults for everything else.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            ..Self::default()
        }
    }

    fn split_reference(&self) -> (&str, &str) {
        self.reference
            .split_once(REFERENCE_SEPARATOR)
            .unwrap_or((self.reference.as_str(), ""))
    }

    /// Name of the target application.
    #[must_use]
    pub fn application_name(&self) -> &str {
        self.split_reference().0
    }

    /// Name of the target service, or `""` if the whole application is meant.
    #[must_use]
    pub fn service_name(&self) -> &str {
        self.split_reference().1
    }

    /// Resolve the target application in `project`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApplicationNotFound`] if the target does not exist.
    pub fn application<'p>(&self, project: &'p Project) -> Result<&'p Application> {
        project.find_application(self.application_name())
    }

    /// Resolve the target service in `project`.
    ///
    /// Returns `Ok(None)` when the reference names no service.
    ///
    /// # Errors
    ///
    /// Returns an error if the target application or the named service does
    /// not exist.
    pub fn service<'p>(&self, project: &'p Project) -> Result<Option<&'p Service>> {
        let application = self.application(project)?;
        match self.service_name() {
            "" => Ok(None),
            name => application.find_service(name).map(Some),
        }
    }

    /// The declared relationship, or `open-host` when none is declared and
    /// the target is open for any consumer.
    ///
    /// For a service reference the target service decides; for a whole
    /// application reference any open-host service on it does.
    #[must_use]
    pub fn effective_relationship<'a>(&'a self, project: &Project) -> &'a str {
        if !self.relationship.is_empty() {
            return &self.relationship;
        }
        let open_host = match self.service(project) {
            Ok(Some(service)) => service.is_open_host,
            Ok(None) => self
                .application(project)
                .is_ok_and(Application::is_open_host),
            Err(_) => false,
        };
        if open_host { OPEN_HOST_RELATIONSHIP } else { "" }
    }
}

/// Dependencies from one application to one target application.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependenciesGrouped<'p> {
    /// The depending application
    pub source_application: &'p Application,

    /// The target application
    pub application: &'p Application,

    /// Every dependency from source to target, in declaration order
    pub dependencies: Vec<&'p Dependency>,
}
