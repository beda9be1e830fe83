//! Project configuration.
//!
//! A project configuration file names the project, lists where application
//! definitions live, and optionally declares sub-views and per-application
//! overrides:
//!
//! ```yaml
//! projectName: My Architecture
//! appDefinitionsPaths: [definitions]
//! subViews:
//!   - name: checkout
//!     included-applications: [shop, payment]
//! appOverrides:
//!   - name: payment
//!     group: core/payments
//! ```

use crate::error::{Error, Result};
use crate::strict;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use topograph_core::domain::REFERENCE_SEPARATOR;
use topograph_core::{Application, Dependency, Service};

/// Configuration file looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "topograph.yml";

/// Returns `true` if `path` has a `.yml` or `.yaml` extension.
pub(crate) fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yml") || e.eq_ignore_ascii_case("yaml"))
}

/// Top-level project configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    /// Name given to the loaded project
    pub project_name: String,

    /// Files or directories holding application definitions, relative to the
    /// configuration file
    pub app_definitions_paths: Vec<PathBuf>,

    /// Named subsets of applications
    pub sub_views: Vec<SubViewConfig>,

    /// Adjustments applied to loaded applications
    pub app_overrides: Vec<ApplicationOverride>,
}

/// A named subset of applications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SubViewConfig {
    /// Sub-view name
    pub name: String,

    /// Names of the applications in the sub-view
    pub included_applications: Vec<String>,
}

impl SubViewConfig {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.name.is_empty() {
            problems.push("sub-view with no name found".to_string());
        }
        if self.name.contains(REFERENCE_SEPARATOR) {
            problems.push(format!("sub-view name '{}' contains '.'", self.name));
        }
        problems
    }

    /// The members of `applications` included in this sub-view, in their
    /// original order.
    #[must_use]
    pub fn select(&self, applications: Vec<Application>) -> Vec<Application> {
        applications
            .into_iter()
            .filter(|a| self.included_applications.contains(&a.name))
            .collect()
    }
}

/// Adjustments to one loaded application, matched by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ApplicationOverride {
    /// Name of the application to adjust
    pub name: String,

    /// Replaces the title if non-empty
    pub title: String,

    /// Replaces the summary if non-empty
    pub summary: String,

    /// Replaces the description if non-empty
    pub description: String,

    /// Replaces the group if non-empty
    pub group: String,

    /// Replaces the technology if non-empty
    pub technology: String,

    /// Replaces the category if non-empty
    pub category: String,

    /// Replaces the team if non-empty
    pub team: String,

    /// Appended to the application's own dependencies
    pub add_dependencies: Vec<Dependency>,

    /// Appended to the application's services
    pub add_provided_services: Vec<Service>,

    /// Merged into the application's properties, replacing equal keys
    pub properties: BTreeMap<String, String>,
}

impl ApplicationOverride {
    /// Apply the override to `application` in place.
    pub fn apply(&self, application: &mut Application) {
        let scalars = [
            (&mut application.title, &self.title),
            (&mut application.summary, &self.summary),
            (&mut application.description, &self.description),
            (&mut application.group, &self.group),
            (&mut application.technology, &self.technology),
            (&mut application.category, &self.category),
            (&mut application.team, &self.team),
        ];
        for (field, value) in scalars {
            if !value.is_empty() {
                field.clone_from(value);
            }
        }

        application
            .dependencies
            .extend(self.add_dependencies.iter().cloned());
        application
            .provided_services
            .extend(self.add_provided_services.iter().cloned());
        application.properties.extend(
            self.properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
    }

    /// A copy of `application` with the override applied.
    #[must_use]
    pub fn adjusted(&self, application: &Application) -> Application {
        let mut adjusted = application.clone();
        self.apply(&mut adjusted);
        adjusted
    }
}

impl ProjectConfig {
    /// Parse a configuration document.
    ///
    /// `path` is used for error messages only. With `strict`, keys the
    /// configuration does not know are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] for malformed YAML and [`Error::Config`] for
    /// unknown keys in strict mode.
    pub fn from_yaml(path: &Path, content: &str, strict: bool) -> Result<Self> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| Error::yaml(path, e))?;

        if strict {
            let unknown = strict::unknown_config_keys(&value);
            if !unknown.is_empty() {
                return Err(Error::Config(unknown.join("; ")));
            }
        }

        if value.is_null() {
            return Ok(Self::default());
        }
        serde_yaml::from_value(value).map_err(|e| Error::yaml(path, e))
    }

    /// Load configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFileType`] if the file is not `.yml` or
    /// `.yaml`, [`Error::Io`] if it cannot be read, and the errors of
    /// [`ProjectConfig::from_yaml`].
    pub fn load(path: &Path, strict: bool) -> Result<Self> {
        if !is_yaml_file(path) {
            return Err(Error::UnsupportedFileType(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config = Self::from_yaml(path, &content, strict)?;
        tracing::debug!(
            path = %path.display(),
            definitions = config.app_definitions_paths.len(),
            sub_views = config.sub_views.len(),
            overrides = config.app_overrides.len(),
            "Loaded project config"
        );
        Ok(config)
    }

    /// Check the configuration for problems that parsing cannot catch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] listing every problem if any sub-view has an
    /// empty name or a name containing `.`.
    pub fn validate(&self) -> Result<()> {
        let problems: Vec<String> = self
            .sub_views
            .iter()
            .flat_map(SubViewConfig::problems)
            .collect();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Config(problems.join("; ")))
        }
    }

    /// Find a sub-view by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSubView`] if none has that name.
    pub fn find_sub_view(&self, name: &str) -> Result<&SubViewConfig> {
        self.sub_views
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::UnknownSubView(name.to_string()))
    }
}
