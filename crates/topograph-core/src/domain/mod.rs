//! Domain types for the architecture model.
//!
//! An [`Application`] owns its [`Service`]s and its outgoing [`Dependency`]
//! edges; a [`Project`] owns its applications. Edges point at other
//! applications by name and are resolved on demand against a project.

mod dependency;
mod project;

pub use dependency::{
    DependenciesGrouped, Dependency, OPEN_HOST_RELATIONSHIP, REFERENCE_SEPARATOR,
};
pub use project::Project;

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Number of description characters used when no explicit summary is set.
const SUMMARY_FALLBACK_LENGTH: usize = 100;

/// Lifecycle status of an application, service or dependency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// Built and running. Also the status of anything that declares none.
    #[default]
    Active,

    /// Not yet built.
    Planned,

    /// Still running but scheduled for removal.
    Deprecated,

    /// Any other status, kept verbatim.
    Other(String),
}

impl Status {
    /// Returns `true` for [`Status::Planned`].
    #[must_use]
    pub fn is_planned(&self) -> bool {
        matches!(self, Self::Planned)
    }

    /// The status as it appears in definition files.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Planned => "planned",
            Self::Deprecated => "deprecated",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "active" => Self::Active,
            "planned" => Self::Planned,
            "deprecated" => Self::Deprecated,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Status {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering hints carried through to graph renderers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Rotate the node when drawing
    pub rotate: bool,

    /// Border and edge color
    #[serde(rename = "bordercolor", skip_serializing_if = "String::is_empty")]
    pub border_color: String,

    /// Background color
    #[serde(skip_serializing_if = "String::is_empty")]
    pub color: String,
}

impl DisplaySettings {
    fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A piece of infrastructure an application needs (database, queue, ...).
///
/// These are informational and never part of the dependency graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfrastructureDependency {
    /// Infrastructure kind, e.g. `database`
    #[serde(rename = "type")]
    pub kind: String,
}

/// A named capability exposed by an application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    /// Name, unique within the owning application
    pub name: String,

    /// Display title
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Short summary
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,

    /// Long description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Free-form kind tag (`api`, `gui`, `exchange`, ...)
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub service_type: String,

    /// Reachable from outside the organisation
    pub is_public: bool,

    /// Open to any consumer without further governance
    pub is_open_host: bool,

    /// Security classification
    #[serde(skip_serializing_if = "String::is_empty")]
    pub security_level: String,

    /// Outgoing dependencies of this service
    #[serde(deserialize_with = "nullable")]
    pub dependencies: Vec<Dependency>,

    /// Lifecycle status
    pub status: Status,

    /// Free-form key/value properties
    #[serde(deserialize_with = "nullable", skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

impl Service {
    /// Create a service with the given name and defaults for everything else.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an outgoing dependency.
    #[must_use]
    pub fn with_dependency(mut self, reference: impl Into<String>) -> Self {
        self.dependencies.push(Dependency::new(reference));
        self
    }

    /// Returns `true` if `property` is set to exactly `value`.
    #[must_use]
    pub fn has_property_with_value(&self, property: &str, value: &str) -> bool {
        self.properties.get(property).is_some_and(|v| v == value)
    }

    /// Returns `true` if the service is not yet built.
    #[must_use]
    pub fn is_planned(&self) -> bool {
        self.status.is_planned()
    }
}

/// A node in the architecture graph: one deployable application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Application {
    /// Position-based id assigned when the project is built
    pub id: usize,

    /// Unique name; must be non-empty and must not contain `.`
    pub name: String,

    /// Display title
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Short summary
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,

    /// Long description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Owning team
    #[serde(skip_serializing_if = "String::is_empty")]
    pub team: String,

    /// Slash-delimited group path, e.g. `core/payments`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub group: String,

    /// Implementation technology
    #[serde(skip_serializing_if = "String::is_empty")]
    pub technology: String,

    /// Category (`core`, `external`, ...)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub category: String,

    /// Lifecycle status
    pub status: Status,

    /// Free-form key/value properties
    #[serde(deserialize_with = "nullable", skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,

    /// Services this application exposes
    #[serde(deserialize_with = "nullable")]
    pub provided_services: Vec<Service>,

    /// Infrastructure this application needs
    #[serde(deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub infrastructure_dependencies: Vec<InfrastructureDependency>,

    /// Outgoing dependencies of the application itself
    #[serde(deserialize_with = "nullable")]
    pub dependencies: Vec<Dependency>,

    /// Rendering hints
    #[serde(skip_serializing_if = "DisplaySettings::is_default")]
    pub display: DisplaySettings,
}

impl Application {
    /// Create an application with the given name and defaults for everything else.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an outgoing dependency.
    #[must_use]
    pub fn with_dependency(mut self, reference: impl Into<String>) -> Self {
        self.dependencies.push(Dependency::new(reference));
        self
    }

    /// Add a provided service.
    #[must_use]
    pub fn with_service(mut self, service: Service) -> Self {
        self.provided_services.push(service);
        self
    }

    /// Set the group path.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Find an owned service by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ServiceNotFound`] if no service has that name.
    pub fn find_service(&self, name: &str) -> Result<&Service> {
        self.provided_services
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::ServiceNotFound {
                application: self.name.clone(),
                service: name.to_string(),
            })
    }

    /// All outgoing dependencies: the application's own, followed by those of
    /// each owned service, in declaration order.
    ///
    /// This flattened view is what validation and every analysis operate on.
    pub fn all_dependencies(&self) -> impl Iterator<Item = &Dependency> + '_ {
        self.dependencies.iter().chain(
            self.provided_services
                .iter()
                .flat_map(|service| service.dependencies.iter()),
        )
    }

    /// The flattened dependencies whose target application is `application_name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDependencyTo`] if none match.
    pub fn dependencies_to(&self, application_name: &str) -> Result<Vec<&Dependency>> {
        let matching: Vec<_> = self
            .all_dependencies()
            .filter(|d| d.application_name() == application_name)
            .collect();

        if matching.is_empty() {
            return Err(Error::NoDependencyTo {
                from: self.name.clone(),
                to: application_name.to_string(),
            });
        }
        Ok(matching)
    }

    /// The summary, falling back to the start of the description.
    #[must_use]
    pub fn summary(&self) -> Cow<'_, str> {
        if !self.summary.is_empty() {
            return Cow::Borrowed(&self.summary);
        }
        if self.description.chars().count() > SUMMARY_FALLBACK_LENGTH {
            let head: String = self
                .description
                .chars()
                .take(SUMMARY_FALLBACK_LENGTH)
                .collect();
            return Cow::Owned(format!("{head}..."));
        }
        Cow::Borrowed(&self.description)
    }

    /// First segment of the group path, or `""` if ungrouped.
    #[must_use]
    pub fn main_group(&self) -> &str {
        self.group.split('/').next().unwrap_or_default().trim()
    }

    /// Returns `true` if any provided service is an open host.
    #[must_use]
    pub fn is_open_host(&self) -> bool {
        self.provided_services.iter().any(|s| s.is_open_host)
    }

    /// Returns `true` if the application is not yet built.
    #[must_use]
    pub fn is_planned(&self) -> bool {
        self.status.is_planned()
    }

    /// Distinct target application names that do not exist in `project`,
    /// in first-seen order.
    #[must_use]
    pub fn missing_dependencies<'a>(&'a self, project: &Project) -> Vec<&'a str> {
        let mut missing: Vec<&str> = Vec::new();
        for dependency in self.all_dependencies() {
            let name = dependency.application_name();
            if !project.has_application(name) && !missing.contains(&name) {
                missing.push(name);
            }
        }
        missing
    }

    /// Resolvable dependencies bucketed by target application, in first-seen
    /// order. Renderers use this to draw one edge per application pair.
    #[must_use]
    pub fn dependencies_grouped<'p>(&'p self, project: &'p Project) -> Vec<DependenciesGrouped<'p>> {
        let mut grouped: Vec<DependenciesGrouped<'p>> = Vec::new();
        for dependency in self.all_dependencies() {
            let Ok(target) = dependency.application(project) else {
                continue;
            };
            match grouped.iter_mut().find(|g| g.application.name == target.name) {
                Some(bucket) => bucket.dependencies.push(dependency),
                None => grouped.push(DependenciesGrouped {
                    source_application: self,
                    application: target,
                    dependencies: vec![dependency],
                }),
            }
        }
        grouped
    }
}

/// Deserialize `null` as the type's default.
///
/// Definition files routinely leave list keys empty (`dependencies:`), which
/// YAML reads as null.
fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(applications: Vec<Application>) -> Project {
        Project::new("test", applications)
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(Status::from(""), Status::Active);
        assert_eq!(Status::from("Planned"), Status::Planned);
        assert_eq!(Status::from("deprecated"), Status::Deprecated);
        assert_eq!(
            Status::from("experimental"),
            Status::Other("experimental".to_string())
        );
        assert_eq!(Status::from("experimental").to_string(), "experimental");
    }

    #[test]
    fn test_find_service() {
        let app = Application::new("shop").with_service(Service::new("api"));

        assert_eq!(app.find_service("api").unwrap().name, "api");

        let err = app.find_service("gui").unwrap_err();
        assert_eq!(err.to_string(), "Application shop has no Service with name gui");
    }

    #[test]
    fn test_all_dependencies_order() {
        let app = Application::new("shop")
            .with_dependency("a")
            .with_service(Service::new("api").with_dependency("b").with_dependency("c"))
            .with_service(Service::new("gui").with_dependency("d"))
            .with_dependency("e");

        let refs: Vec<_> = app.all_dependencies().map(|d| d.reference.as_str()).collect();
        assert_eq!(refs, vec!["a", "e", "b", "c", "d"]);
    }

    #[test]
    fn test_dependencies_to() {
        let app = Application::new("shop")
            .with_dependency("payment")
            .with_service(Service::new("api").with_dependency("payment.refunds"))
            .with_dependency("stock");

        let deps = app.dependencies_to("payment").unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[1].service_name(), "refunds");

        assert!(matches!(
            app.dependencies_to("ledger"),
            Err(Error::NoDependencyTo { .. })
        ));
    }

    #[test]
    fn test_summary_fallback() {
        let mut app = Application::new("shop");
        app.description = "x".repeat(150);
        let summary = app.summary();
        assert_eq!(summary.len(), 103);
        assert!(summary.ends_with("..."));

        app.description = "short".to_string();
        assert_eq!(app.summary(), "short");

        app.summary = "explicit".to_string();
        assert_eq!(app.summary(), "explicit");
    }

    #[test]
    fn test_main_group() {
        assert_eq!(Application::new("a").with_group("core/payments").main_group(), "core");
        assert_eq!(Application::new("a").main_group(), "");
    }

    #[test]
    fn test_missing_dependencies_are_distinct() {
        let p = project(vec![
            Application::new("shop")
                .with_dependency("ghost")
                .with_dependency("stock")
                .with_dependency("ghost.api")
                .with_dependency("phantom"),
            Application::new("stock"),
        ]);

        assert_eq!(p.applications[0].missing_dependencies(&p), vec!["ghost", "phantom"]);
        assert!(p.applications[1].missing_dependencies(&p).is_empty());
    }

    #[test]
    fn test_dependencies_grouped() {
        let p = project(vec![
            Application::new("shop")
                .with_dependency("stock")
                .with_dependency("payment.api")
                .with_service(Service::new("web").with_dependency("stock.api"))
                .with_dependency("ghost"),
            Application::new("stock").with_service(Service::new("api")),
            Application::new("payment").with_service(Service::new("api")),
        ]);

        let grouped = p.applications[0].dependencies_grouped(&p);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].application.name, "stock");
        assert_eq!(grouped[0].dependencies.len(), 2);
        assert_eq!(grouped[1].application.name, "payment");
        assert_eq!(grouped[0].source_application.name, "shop");
    }

    #[test]
    fn test_deserialize_application_yaml() {
        let yaml = r"
name: shop
group: frontend/web
status: planned
provided-services:
  - name: api
    type: api
    isOpenHost: true
    dependencies:
dependencies:
  - reference: stock.api
    relationship: customer-supplier
    isBrowserBased: true
properties:
  owner: web-team
";
        let app: Application = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(app.name, "shop");
        assert!(app.is_planned());
        assert!(app.is_open_host());
        assert_eq!(app.provided_services[0].service_type, "api");
        assert!(app.provided_services[0].dependencies.is_empty());
        assert!(app.dependencies[0].is_browser_based);
        assert_eq!(app.dependencies[0].relationship, "customer-supplier");
        assert_eq!(app.properties["owner"], "web-team");
    }

    #[test]
    fn test_service_property() {
        let mut service = Service::new("api");
        service
            .properties
            .insert("protocol".to_string(), "grpc".to_string());

        assert!(service.has_property_with_value("protocol", "grpc"));
        assert!(!service.has_property_with_value("protocol", "rest"));
        assert!(!service.has_property_with_value("version", "grpc"));
    }
}
