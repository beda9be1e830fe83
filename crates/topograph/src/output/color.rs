//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Success:   green  (valid project, no cycles)
//!   - Error:     red    (validation and cycle errors)
//!   - Warning:   yellow (planned or deprecated applications, missing targets)
//!   - Reference: cyan   (application names)
//!   - Muted:     dimmed (field labels, tree connectors)
//!   - Emphasis:  bold   (headings)

use colored::Colorize;
use topograph_core::Status;

use super::OutputConfig;

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Apply semantic "error" color (red) to text.
pub fn error(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.red().to_string()
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Colorize an application name (cyan).
pub fn name(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.cyan().to_string()
}

/// Apply dimmed style to text (for labels and connectors).
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Apply bold style to text (for section headers).
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

/// Apply color to status text.
pub(crate) fn colorize_status(status: &Status, config: &OutputConfig) -> String {
    let text = status.to_string();
    if !config.use_colors {
        return text;
    }
    match status {
        Status::Active => text.green().to_string(),
        Status::Planned | Status::Deprecated => text.yellow().to_string(),
        Status::Other(_) => text,
    }
}
