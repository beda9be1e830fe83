//! Cyclic dependency detection.
//!
//! Every application is used as the root of its own depth-first walk over
//! the flattened dependencies. A walk stops at the first cycle it finds, so
//! each root yields at most one error, but a cycle is reported once for every
//! root that leads into it. Use [`distinct_cycles`] for a deduplicated view.

use super::graph::DependencyGraph;
use crate::domain::{Application, Project};
use std::collections::HashMap;
use thiserror::Error;

/// Maximum length of the walked path before a walk is aborted.
///
/// This is a safety valve against pathological graphs, not an architectural
/// limit.
pub const MAX_WALK_DEPTH: usize = 50;

/// A problem found while walking dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    /// The walk returned to an application already on the path.
    ///
    /// `path` ends with the repeated application.
    #[error("Cyclic dependency: {}", .path.join(" -> "))]
    Cycle {
        /// Applications on the walked path, closing with the repeated one
        path: Vec<String>,
    },

    /// The walk went deeper than [`MAX_WALK_DEPTH`].
    #[error("Dependency depth exceeded {limit} walking from '{root}': {}", .path.join(" -> "))]
    DepthExceeded {
        /// Application the walk started from
        root: String,
        /// The configured limit
        limit: usize,
        /// The path at the point the walk was aborted
        path: Vec<String>,
    },
}

impl CycleError {
    /// The applications on the reported path.
    #[must_use]
    pub fn path(&self) -> &[String] {
        match self {
            Self::Cycle { path } | Self::DepthExceeded { path, .. } => path,
        }
    }
}

/// Depth-first walker shared by all roots of one detection run.
struct Walker<'p> {
    project: &'p Project,
    /// Applications whose reachable subgraph was fully walked without error,
    /// with the deepest path length they were entered at.
    clean: HashMap<&'p str, usize>,
}

impl<'p> Walker<'p> {
    /// Walk from `application` with `path` leading up to it.
    ///
    /// The path is never mutated: each frame extends a copy, so sibling
    /// branches cannot observe each other's entries.
    fn walk(&mut self, application: &'p Application, path: &[&'p str]) -> Result<(), CycleError> {
        let name = application.name.as_str();

        if path.contains(&name) {
            return Err(CycleError::Cycle {
                path: owned_path(path, name),
            });
        }

        if path.len() >= MAX_WALK_DEPTH {
            return Err(CycleError::DepthExceeded {
                root: path.first().copied().unwrap_or(name).to_string(),
                limit: MAX_WALK_DEPTH,
                path: owned_path(path, name),
            });
        }

        // A clean subgraph entered at this depth or shallower cannot contain
        // a cycle back into the path nor exceed the depth limit.
        if self.clean.get(name).is_some_and(|&depth| path.len() <= depth) {
            return Ok(());
        }

        let mut next = path.to_vec();
        next.push(name);

        for dependency in application.all_dependencies() {
            let Ok(target) = dependency.application(self.project) else {
                continue;
            };
            self.walk(target, &next)?;
        }

        let depth = self.clean.entry(name).or_insert(path.len());
        *depth = (*depth).max(path.len());
        Ok(())
    }
}

fn owned_path(path: &[&str], last: &str) -> Vec<String> {
    path.iter()
        .copied()
        .chain(std::iter::once(last))
        .map(str::to_string)
        .collect()
}

/// Walk the dependencies from every application and report cycles.
///
/// Walks follow declaration order of applications, then of dependencies.
/// Dependencies whose target does not exist are skipped.
#[must_use]
pub fn detect_cycles(project: &Project) -> Vec<CycleError> {
    let mut walker = Walker {
        project,
        clean: HashMap::new(),
    };

    let errors: Vec<CycleError> = project
        .applications
        .iter()
        .filter_map(|application| walker.walk(application, &[]).err())
        .collect();

    tracing::debug!(
        project = %project.name,
        errors = errors.len(),
        "Walked dependencies for cycles"
    );
    errors
}

/// The distinct groups of applications that depend on each other cyclically.
///
/// Each group lists application names in declaration order. A single
/// application forms a group only if it depends on itself.
#[must_use]
pub fn distinct_cycles(project: &Project) -> Vec<Vec<String>> {
    DependencyGraph::build(project)
        .cyclic_components()
        .into_iter()
        .map(|component| component.into_iter().map(|a| a.name.clone()).collect())
        .collect()
}
