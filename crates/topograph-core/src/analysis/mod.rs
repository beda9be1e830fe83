//! Graph analyses over a project.
//!
//! - [`cycles`]: depth-first cyclic dependency walk
//! - [`impact`]: direct and transitive referrer counts
//!
//! Both treat a dependency whose target does not resolve as absent. Reporting
//! dangling references is the validator's job.

pub mod cycles;
mod graph;
pub mod impact;

pub use graph::DependencyGraph;
