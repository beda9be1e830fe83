//! Group tree rendering for `topograph groups`.

use std::io::{self, Write};

use topograph_core::GroupNode;

use super::OutputConfig;
use super::color::{bold, dimmed, name};

/// Render the group tree with box-drawing connectors.
///
/// Renders a tree like:
/// ```text
/// shop (4 applications)
/// ├── portal
/// └── core/
///     ├── billing
///     └── payments/
///         └── payment
/// ```
///
/// Applications are listed before sub-groups at every level.
pub fn print_group_tree<W: Write>(
    w: &mut W,
    project_name: &str,
    root: &GroupNode<'_>,
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}",
        bold(project_name, config),
        dimmed(
            &format!("({} applications)", root.application_count()),
            config
        )
    )?;
    print_children(w, root, "", config)
}

fn print_children<W: Write>(
    w: &mut W,
    node: &GroupNode<'_>,
    prefix: &str,
    config: &OutputConfig,
) -> io::Result<()> {
    let total = node.applications.len() + node.sub_groups.len();

    for (i, application) in node.applications.iter().enumerate() {
        let connector = if i + 1 == total { "└── " } else { "├── " };
        writeln!(
            w,
            "{}{}{}",
            dimmed(prefix, config),
            dimmed(connector, config),
            name(&application.name, config)
        )?;
    }

    for (j, group) in node.sub_groups.iter().enumerate() {
        let is_last = node.applications.len() + j + 1 == total;
        let (connector, continuation) = if is_last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        writeln!(
            w,
            "{}{}{}",
            dimmed(prefix, config),
            dimmed(connector, config),
            bold(&format!("{}/", group.group_name), config)
        )?;
        print_children(w, group, &format!("{prefix}{continuation}"), config)?;
    }
    Ok(())
}
