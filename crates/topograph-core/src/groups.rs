//! Group hierarchy for clustered rendering.
//!
//! An application's `group` is a slash-delimited path such as
//! `core/payments`. The hierarchy turns those paths into a tree so renderers
//! can draw nested clusters without knowing the path syntax.

use crate::domain::{Application, Project};
use serde::{Serialize, Serializer};

/// Separator between group path segments.
pub const GROUP_SEPARATOR: char = '/';

/// A node in the group tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode<'p> {
    /// Last path segment; empty for the root
    pub group_name: String,

    /// Full path from the root, segments joined by `/`
    pub qualified_group_name: String,

    /// `true` only for the synthetic root
    pub is_root: bool,

    /// Applications whose group path ends at this node, in declaration order
    #[serde(serialize_with = "serialize_names")]
    pub applications: Vec<&'p Application>,

    /// Nested groups, in first-seen order
    pub sub_groups: Vec<GroupNode<'p>>,
}

impl<'p> GroupNode<'p> {
    /// Create the unnamed root.
    #[must_use]
    pub fn root() -> Self {
        Self {
            group_name: String::new(),
            qualified_group_name: String::new(),
            is_root: true,
            applications: Vec::new(),
            sub_groups: Vec::new(),
        }
    }

    fn child(parent: &Self, segment: &str) -> Self {
        let qualified_group_name = if parent.is_root {
            segment.to_string()
        } else {
            format!(
                "{}{}{}",
                parent.qualified_group_name, GROUP_SEPARATOR, segment
            )
        };
        Self {
            group_name: segment.to_string(),
            qualified_group_name,
            is_root: false,
            applications: Vec::new(),
            sub_groups: Vec::new(),
        }
    }

    /// The direct child named `segment`, created on first use.
    fn sub_group_mut(&mut self, segment: &str) -> &mut Self {
        let index = match self.sub_groups.iter().position(|g| g.group_name == segment) {
            Some(index) => index,
            None => {
                let child = Self::child(self, segment);
                self.sub_groups.push(child);
                self.sub_groups.len() - 1
            }
        };
        &mut self.sub_groups[index]
    }

    /// Place `application` at the node its group path ends at.
    pub fn insert(&mut self, application: &'p Application) {
        let mut node = self;
        for segment in path_segments(&application.group) {
            node = node.sub_group_mut(segment);
        }
        node.applications.push(application);
    }

    /// Find a node by its qualified name. The empty string names the root.
    #[must_use]
    pub fn find(&self, qualified_group_name: &str) -> Option<&Self> {
        path_segments(qualified_group_name).try_fold(self, |node, segment| {
            node.sub_groups.iter().find(|g| g.group_name == segment)
        })
    }

    /// Number of applications at this node and every node below it.
    #[must_use]
    pub fn application_count(&self) -> usize {
        self.applications.len()
            + self
                .sub_groups
                .iter()
                .map(GroupNode::application_count)
                .sum::<usize>()
    }

    /// This node and every node below it, depth first, parents before children.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Self> {
        let mut nodes = vec![self];
        for sub_group in &self.sub_groups {
            nodes.extend(sub_group.descendants());
        }
        nodes
    }
}

/// Segments of a group path. Surrounding whitespace is ignored and empty
/// segments are skipped, so `"core / payments"` and `"core//payments"` both
/// mean `core` then `payments`.
fn path_segments(group: &str) -> impl Iterator<Item = &str> {
    group
        .split(GROUP_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

fn serialize_names<S>(applications: &[&Application], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(applications.iter().map(|a| a.name.as_str()))
}

/// Build the group tree for `project`.
///
/// Applications with an empty group belong to the root itself.
#[must_use]
pub fn build_group_tree(project: &Project) -> GroupNode<'_> {
    let mut root = GroupNode::root();
    for application in &project.applications {
        root.insert(application);
    }
    root
}
