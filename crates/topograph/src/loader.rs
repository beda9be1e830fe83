//! Loading a [`Project`] from a configuration file and definition files.
//!
//! # Definition Files
//!
//! Each definition file describes one application:
//!
//! ```yaml
//! name: payment
//! group: core/payments
//! provided-services:
//!   - name: api
//! dependencies:
//!   - reference: ledger
//! ```
//!
//! The older list form (`applications: [...]`) is still read but logged as
//! deprecated.
//!
//! # Loading Order
//!
//! Paths from the configuration are loaded in the order given. Directories
//! are walked recursively with entries sorted by name, so a project loads the
//! same way on every platform.

use crate::config::{ProjectConfig, is_yaml_file};
use crate::error::{Error, Result};
use crate::strict;
use serde::Deserialize;
use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use topograph_core::{Application, Project};

/// Key of the deprecated multi-application document.
const APPLICATIONS_KEY: &str = "applications";

/// The two accepted shapes of a definition document.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedDefinition {
    /// One application per document.
    SingleApplication(Box<Application>),

    /// The deprecated `applications: [...]` form.
    ApplicationList(Vec<Application>),
}

#[derive(Deserialize)]
struct ApplicationList {
    #[serde(default)]
    applications: Option<Vec<Application>>,
}

impl ParsedDefinition {
    /// Parse a definition document.
    ///
    /// The shape is decided by the document's keys: a `name` makes it a
    /// single application, an `applications` list without a `name` makes it
    /// the list form. An empty document is an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Yaml`] if the document does not parse,
    /// [`Error::Definition`] if it has neither shape or, with `strict`,
    /// carries unknown keys.
    pub fn parse(path: &Path, content: &str, strict: bool) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| Error::yaml(path, e))?;

        if value.is_null() {
            return Ok(Self::ApplicationList(Vec::new()));
        }
        if !value.is_mapping() {
            return Err(Error::definition(path, "expected a mapping at the top level"));
        }

        let definition = if value.get("name").is_some() {
            if strict {
                reject_unknown(path, strict::unknown_application_keys(&value, "application"))?;
            }
            let application: Application =
                serde_yaml::from_value(value).map_err(|e| Error::yaml(path, e))?;
            Self::SingleApplication(Box::new(application))
        } else if value.get(APPLICATIONS_KEY).is_some() {
            if strict {
                reject_unknown(path, unknown_list_keys(&value))?;
            }
            let list: ApplicationList =
                serde_yaml::from_value(value).map_err(|e| Error::yaml(path, e))?;
            Self::ApplicationList(list.applications.unwrap_or_default())
        } else {
            return Err(Error::definition(
                path,
                "document has neither a 'name' nor an 'applications' list",
            ));
        };
        Ok(definition)
    }

    /// The applications the document declares.
    #[must_use]
    pub fn into_applications(self) -> Vec<Application> {
        match self {
            Self::SingleApplication(application) => vec![*application],
            Self::ApplicationList(applications) => applications,
        }
    }
}

fn unknown_list_keys(value: &Value) -> Vec<String> {
    let mut unknown: Vec<String> = value
        .as_mapping()
        .into_iter()
        .flat_map(|m| m.keys())
        .filter(|k| k.as_str() != Some(APPLICATIONS_KEY))
        .map(|k| format!("unknown field '{}'", k.as_str().unwrap_or("?")))
        .collect();
    if let Some(Value::Sequence(items)) = value.get(APPLICATIONS_KEY) {
        for (index, item) in items.iter().enumerate() {
            unknown.extend(strict::unknown_application_keys(
                item,
                &format!("{APPLICATIONS_KEY}[{index}]"),
            ));
        }
    }
    unknown
}

fn reject_unknown(path: &Path, unknown: Vec<String>) -> Result<()> {
    if unknown.is_empty() {
        Ok(())
    } else {
        Err(Error::definition(path, unknown.join("; ")))
    }
}

/// An application together with the file it came from.
#[derive(Debug, Clone)]
struct Loaded {
    source: PathBuf,
    application: Application,
}

/// Loads projects from disk.
///
/// In strict mode unknown keys in the configuration and definition files are
/// errors, and the configuration is validated before use.
#[derive(Debug, Clone)]
pub struct ProjectLoader {
    strict: bool,
}

impl Default for ProjectLoader {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl ProjectLoader {
    /// Create a loader.
    #[must_use]
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Returns `true` if the loader rejects unknown keys.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Load a project configuration file.
    ///
    /// # Errors
    ///
    /// See [`ProjectConfig::load`].
    pub fn load_config(&self, path: &Path) -> Result<ProjectConfig> {
        ProjectConfig::load(path, self.strict)
    }

    /// Load the configuration at `path` and the project it describes.
    ///
    /// Definition paths are resolved relative to the configuration file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns any error from loading the configuration or the project.
    pub fn load_project_from_config_file(
        &self,
        path: &Path,
        sub_view: Option<&str>,
    ) -> Result<Project> {
        let config = self.load_config(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        self.load_project(&config, base_dir, sub_view)
    }

    /// Build the project described by `config`.
    ///
    /// Applications are loaded from every definition path, overrides are
    /// applied, and the result is narrowed to `sub_view` if one is given.
    /// Ids are assigned last, so they are contiguous within the sub-view.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if strict validation of `config` fails,
    /// [`Error::DuplicateApplication`] if two definitions share a name,
    /// [`Error::UnknownSubView`] for an undefined sub-view, or any error from
    /// reading the definition files.
    pub fn load_project(
        &self,
        config: &ProjectConfig,
        base_dir: &Path,
        sub_view: Option<&str>,
    ) -> Result<Project> {
        if self.strict {
            config.validate()?;
        }

        let mut loaded = Vec::new();
        for definitions_path in &config.app_definitions_paths {
            self.load_path(&base_dir.join(definitions_path), &mut loaded)?;
        }
        let mut applications = unique_applications(loaded)?;

        for adjustment in &config.app_overrides {
            match applications.iter_mut().find(|a| a.name == adjustment.name) {
                Some(application) => adjustment.apply(application),
                None => tracing::warn!(
                    application = %adjustment.name,
                    "Override defined for an unknown application"
                ),
            }
        }

        let applications = match sub_view.filter(|name| !name.is_empty()) {
            Some(name) => config.find_sub_view(name)?.select(applications),
            None => applications,
        };

        let project = Project::new(config.project_name.clone(), applications);
        tracing::debug!(
            project = %project.name,
            applications = project.len(),
            sub_view = sub_view.unwrap_or_default(),
            "Loaded project"
        );
        Ok(project)
    }

    /// Load a definition file, or every definition file below a directory.
    fn load_path(&self, path: &Path, loaded: &mut Vec<Loaded>) -> Result<()> {
        let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
        if metadata.is_dir() {
            self.load_directory(path, loaded)
        } else if is_yaml_file(path) {
            self.load_file(path, loaded)
        } else {
            Err(Error::UnsupportedFileType(path.to_path_buf()))
        }
    }

    fn load_directory(&self, dir: &Path, loaded: &mut Vec<Loaded>) -> Result<()> {
        let mut entries: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(|e| Error::io(dir, e))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()
            .map_err(|e| Error::io(dir, e))?;
        entries.retain(|p| !file_name(p).starts_with('.'));
        entries.sort();

        if entries.is_empty() {
            return Err(Error::NoDefinitionFiles(dir.to_path_buf()));
        }

        for entry in entries {
            if entry.is_dir() {
                if file_name(&entry).contains(".git") {
                    tracing::trace!(path = %entry.display(), "Skipping repository metadata");
                    continue;
                }
                self.load_directory(&entry, loaded)?;
            } else if is_yaml_file(&entry) {
                self.load_file(&entry, loaded)?;
            }
        }
        Ok(())
    }

    fn load_file(&self, path: &Path, loaded: &mut Vec<Loaded>) -> Result<()> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let definition = ParsedDefinition::parse(path, &content, self.strict)?;

        if let ParsedDefinition::ApplicationList(applications) = &definition {
            tracing::warn!(
                path = %path.display(),
                applications = applications.len(),
                "Deprecated 'applications' list format, use one application per file"
            );
        }

        let applications = definition.into_applications();
        tracing::debug!(
            path = %path.display(),
            applications = applications.len(),
            "Loaded definition file"
        );
        loaded.extend(applications.into_iter().map(|application| Loaded {
            source: path.to_path_buf(),
            application,
        }));
        Ok(())
    }
}

fn file_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
}

/// Reject duplicated names, keeping loading order.
fn unique_applications(loaded: Vec<Loaded>) -> Result<Vec<Application>> {
    let mut sources: HashMap<String, PathBuf> = HashMap::with_capacity(loaded.len());
    let mut applications = Vec::with_capacity(loaded.len());

    for Loaded {
        source,
        application,
    } in loaded
    {
        if let Some(first) = sources.get(&application.name) {
            return Err(Error::DuplicateApplication {
                name: application.name,
                first: first.clone(),
                second: source,
            });
        }
        sources.insert(application.name.clone(), source);
        applications.push(application);
    }
    Ok(applications)
}
