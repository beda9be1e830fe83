//! Impact ("blast radius") analysis.
//!
//! The impact of an application is the number of applications that would be
//! affected if it became unavailable: those referencing it directly, and
//! those referencing it directly or over any chain of other applications.

use super::graph::DependencyGraph;
use crate::domain::{Application, Project};
use serde::Serialize;
use std::cmp::Reverse;

/// Referrer counts for one application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Impact {
    /// Applications with a dependency on the application
    pub direct: usize,

    /// Applications reaching the application over one or more dependencies
    pub indirect: usize,
}

/// One row of the impact report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactRow {
    /// Direct referrer count
    pub direct: usize,

    /// Transitive referrer count
    pub indirect: usize,

    /// Application name
    pub application: String,
}

/// Answers impact questions for one project.
///
/// Resolves the project's dependencies once; every query after that walks
/// the resolved graph.
#[derive(Debug)]
pub struct ImpactAnalyzer<'p> {
    project: &'p Project,
    graph: DependencyGraph<'p>,
}

impl<'p> ImpactAnalyzer<'p> {
    /// Resolve `project` for impact queries.
    #[must_use]
    pub fn new(project: &'p Project) -> Self {
        Self {
            project,
            graph: DependencyGraph::build(project),
        }
    }

    /// Applications with at least one dependency on `application`, in
    /// declaration order.
    #[must_use]
    pub fn direct_referrers(&self, application: &Application) -> Vec<&'p Application> {
        self.graph.direct_referrers(&application.name)
    }

    /// Applications reaching `application` over any chain of dependencies,
    /// each listed once, in declaration order.
    #[must_use]
    pub fn indirect_referrers(&self, application: &Application) -> Vec<&'p Application> {
        self.graph.transitive_referrers(&application.name)
    }

    /// Direct and transitive referrer counts for `application`.
    #[must_use]
    pub fn impact_of(&self, application: &Application) -> Impact {
        Impact {
            direct: self.direct_referrers(application).len(),
            indirect: self.indirect_referrers(application).len(),
        }
    }

    /// One row per application, in declaration order.
    #[must_use]
    pub fn analyze(&self) -> Vec<ImpactRow> {
        self.project
            .applications
            .iter()
            .map(|application| {
                let Impact { direct, indirect } = self.impact_of(application);
                ImpactRow {
                    direct,
                    indirect,
                    application: application.name.clone(),
                }
            })
            .collect()
    }
}

/// Direct and transitive referrer counts for `application` in `project`.
#[must_use]
pub fn impact_of(project: &Project, application: &Application) -> Impact {
    ImpactAnalyzer::new(project).impact_of(application)
}

/// The impact report: one row per application, in declaration order.
#[must_use]
pub fn impact_analyze(project: &Project) -> Vec<ImpactRow> {
    let rows = ImpactAnalyzer::new(project).analyze();
    tracing::debug!(project = %project.name, rows = rows.len(), "Analyzed impact");
    rows
}

/// Rank rows so the most harmful failures come first.
///
/// Orders by transitive count, then direct count, both descending, then by
/// name.
pub fn sort_by_impact(rows: &mut [ImpactRow]) {
    rows.sort_by(|a, b| {
        (Reverse(a.indirect), Reverse(a.direct), &a.application).cmp(&(
            Reverse(b.indirect),
            Reverse(b.direct),
            &b.application,
        ))
    });
}
