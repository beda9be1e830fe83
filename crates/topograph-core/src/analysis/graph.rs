//! Resolved dependency graph using petgraph.
//!
//! The project stores edges by name. For reachability questions it is
//! cheaper to resolve every edge once into a `DiGraph` and walk indices.
//!
//! # Edge Direction
//!
//! Edges point from **dependent -> dependency**. Referrers of an application
//! are therefore found along `Direction::Incoming`.

use crate::domain::{Application, Project};
use petgraph::Direction;
use petgraph::algo;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet, VecDeque};

/// A project's dependencies resolved into a directed graph.
///
/// Parallel dependencies between the same two applications collapse into a
/// single edge. Dependencies whose target does not exist are dropped.
#[derive(Debug)]
pub struct DependencyGraph<'p> {
    graph: DiGraph<&'p Application, ()>,
    node_map: HashMap<&'p str, NodeIndex>,
}

impl<'p> DependencyGraph<'p> {
    /// Resolve every dependency of `project`.
    #[must_use]
    pub fn build(project: &'p Project) -> Self {
        let mut graph = DiGraph::with_capacity(project.len(), 0);
        let mut node_map = HashMap::with_capacity(project.len());

        for application in &project.applications {
            let node = graph.add_node(application);
            // First declaration wins if names are duplicated
            node_map.entry(application.name.as_str()).or_insert(node);
        }

        for application in &project.applications {
            let from = node_map[application.name.as_str()];
            for dependency in application.all_dependencies() {
                if let Some(&to) = node_map.get(dependency.application_name()) {
                    graph.update_edge(from, to, ());
                }
            }
        }

        Self { graph, node_map }
    }

    /// Applications with an edge to `name`, in declaration order.
    #[must_use]
    pub fn direct_referrers(&self, name: &str) -> Vec<&'p Application> {
        let Some(&node) = self.node_map.get(name) else {
            return Vec::new();
        };
        let mut referrers: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(node, Direction::Incoming)
            .collect();
        referrers.sort_unstable();
        referrers.into_iter().map(|n| self.graph[n]).collect()
    }

    /// Every application that reaches `name` over one or more edges, in
    /// declaration order.
    ///
    /// The visited set that deduplicates referrers reached over different
    /// paths also terminates the walk on cyclic graphs. An application on a
    /// cycle through `name` is its own transitive referrer.
    #[must_use]
    pub fn transitive_referrers(&self, name: &str) -> Vec<&'p Application> {
        let Some(&start) = self.node_map.get(name) else {
            return Vec::new();
        };

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            for referrer in self.graph.neighbors_directed(current, Direction::Incoming) {
                if visited.insert(referrer) {
                    queue.push_back(referrer);
                }
            }
        }

        let mut referrers: Vec<NodeIndex> = visited.into_iter().collect();
        referrers.sort_unstable();
        referrers.into_iter().map(|n| self.graph[n]).collect()
    }

    /// Groups of applications that depend on each other in a cycle.
    ///
    /// Each group is listed in declaration order; groups are ordered by their
    /// first member.
    #[must_use]
    pub fn cyclic_components(&self) -> Vec<Vec<&'p Application>> {
        let mut components: Vec<Vec<NodeIndex>> = algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| match component.as_slice() {
                [single] => self.graph.contains_edge(*single, *single),
                _ => true,
            })
            .map(|mut component| {
                component.sort_unstable();
                component
            })
            .collect();
        components.sort_unstable_by_key(|component| component[0]);

        components
            .into_iter()
            .map(|component| component.into_iter().map(|n| self.graph[n]).collect())
            .collect()
    }

    /// Returns `true` if any dependency path returns to its start.
    #[must_use]
    pub fn is_cyclic(&self) -> bool {
        algo::is_cyclic_directed(&self.graph)
    }
}
