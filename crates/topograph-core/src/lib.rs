//! Topograph core - the architecture dependency graph and its analyses.
//!
//! A [`Project`](domain::Project) is an ordered set of applications, the
//! services they expose, and by-name dependency edges between them. This crate
//! derives structural properties from that snapshot:
//!
//! - [`validate`]: every referenced application and service exists
//! - [`analysis::cycles`]: cyclic dependency detection
//! - [`analysis::impact`]: direct and transitive referrer counts
//! - [`groups`]: the group hierarchy used for clustered rendering
//!
//! Every analysis is a pure function over an immutable project. Nothing here
//! performs I/O.

#![forbid(unsafe_code)]

pub mod analysis;
pub mod domain;
pub mod error;
pub mod groups;
pub mod validate;

pub use analysis::cycles::{CycleError, MAX_WALK_DEPTH, detect_cycles, distinct_cycles};
pub use analysis::impact::{Impact, ImpactAnalyzer, ImpactRow, impact_analyze, impact_of};
pub use domain::{
    Application, DependenciesGrouped, Dependency, DisplaySettings, InfrastructureDependency,
    Project, Service, Status,
};
pub use error::{Error, Result};
pub use groups::{GroupNode, build_group_tree};
pub use validate::{ValidationError, validate};
