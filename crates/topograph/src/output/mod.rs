//! Output formatting for CLI commands.
//!
//! Every command renders either human-readable text or JSON for programmatic
//! use. Text renderers write to any [`Write`] so they can be tested against a
//! buffer.
//!
//! Submodules:
//! - [`color`]: semantic color helpers
//! - [`tree`]: group tree rendering with box-drawing connectors

pub mod color;
pub mod tree;

use serde::Serialize;
use std::env;
use std::io::{self, Write};
use topograph_core::{Application, CycleError, ImpactRow, Project, ValidationError};

pub use tree::print_group_tree;

use color::{bold, colorize_status, dimmed, error, name, success, warning};

// ============================================================================
// Output Configuration
// ============================================================================

const DEFAULT_TERMINAL_WIDTH: u16 = 80;
const DEFAULT_MAX_CONTENT_WIDTH: usize = 100;

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Maximum content width for text wrapping.
    pub max_width: usize,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create a new `OutputConfig` with explicit values.
    #[must_use]
    pub fn new(max_width: usize, use_colors: bool) -> Self {
        Self {
            max_width,
            use_colors,
        }
    }

    /// Create an `OutputConfig` from the environment and terminal.
    ///
    /// Reads:
    /// - `TOPOGRAPH_MAX_WIDTH`: maximum content width (default: 100, capped
    ///   at the terminal width)
    /// - `NO_COLOR`: standard variable to disable colors (any value)
    /// - `TOPOGRAPH_COLOR`: set to "0" or "false" to disable colors
    #[must_use]
    pub fn from_env() -> Self {
        let max_width = match env::var("TOPOGRAPH_MAX_WIDTH") {
            Ok(s) if !s.is_empty() => s.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    env_var = "TOPOGRAPH_MAX_WIDTH",
                    value = %s,
                    default = DEFAULT_MAX_CONTENT_WIDTH,
                    "Invalid value, using default"
                );
                DEFAULT_MAX_CONTENT_WIDTH
            }),
            _ => DEFAULT_MAX_CONTENT_WIDTH,
        };

        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("TOPOGRAPH_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            max_width: max_width.min(terminal_width()),
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTENT_WIDTH, true)
    }
}

/// Get the current terminal width, falling back to default if detection fails.
fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map_or(usize::from(DEFAULT_TERMINAL_WIDTH), |(w, _)| usize::from(w.0))
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Print any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value)
}

/// Write any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write, T: Serialize>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(w, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

/// Print validation errors followed by the verdict.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_validation<W: Write>(
    w: &mut W,
    errors: &[ValidationError],
    config: &OutputConfig,
) -> io::Result<()> {
    for e in errors {
        writeln!(w, "{} {e}", error("error:", config))?;
    }
    if errors.is_empty() {
        writeln!(w, "{}", success("valid", config))
    } else {
        writeln!(
            w,
            "{}",
            error(&format!("Not valid: {} error(s)", errors.len()), config)
        )
    }
}

/// Print one line per application: id, name and title.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_application_list<W: Write>(
    w: &mut W,
    project: &Project,
    config: &OutputConfig,
) -> io::Result<()> {
    if project.is_empty() {
        return writeln!(w, "No applications found.");
    }
    for application in &project.applications {
        write!(w, "{:>4}  {}", application.id, name(&application.name, config))?;
        if !application.title.is_empty() {
            write!(w, "  {}", dimmed(&application.title, config))?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Print cycle detection results.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_cycles<W: Write>(
    w: &mut W,
    errors: &[CycleError],
    config: &OutputConfig,
) -> io::Result<()> {
    if errors.is_empty() {
        return writeln!(w, "{}", success("No cyclic dependencies detected.", config));
    }
    writeln!(
        w,
        "Found {} cyclic dependency error(s):",
        error(&errors.len().to_string(), config)
    )?;
    for e in errors {
        writeln!(w, "  {e}")?;
    }
    Ok(())
}

/// Print each distinct cycle once.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_distinct_cycles<W: Write>(
    w: &mut W,
    cycles: &[Vec<String>],
    config: &OutputConfig,
) -> io::Result<()> {
    if cycles.is_empty() {
        return writeln!(w, "{}", success("No cyclic dependencies detected.", config));
    }
    writeln!(
        w,
        "Found {} distinct cycle(s):",
        error(&cycles.len().to_string(), config)
    )?;
    for (i, members) in cycles.iter().enumerate() {
        let mut path = members.clone();
        if let Some(first) = members.first() {
            path.push(first.clone());
        }
        writeln!(
            w,
            "  {} {}: {}",
            warning("Cycle", config),
            i + 1,
            path.join(" -> ")
        )?;
    }
    Ok(())
}

/// Print the impact table.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_impact_table<W: Write>(
    w: &mut W,
    rows: &[ImpactRow],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "{}", bold("Direct  Indirect  Component", config))?;
    for row in rows {
        writeln!(
            w,
            "{:>6}  {:>8}  {}",
            row.direct,
            row.indirect,
            name(&row.application, config)
        )?;
    }
    Ok(())
}

/// Print the referrers of one application.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_referrers<W: Write>(
    w: &mut W,
    application: &Application,
    direct: &[&Application],
    indirect: &[&Application],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(w, "Impact of {}:", bold(&name(&application.name, config), config))?;
    writeln!(w)?;
    writeln!(w, "  {} ({}):", bold("Direct referrers", config), direct.len())?;
    print_name_list(w, direct, "(none)", config)?;
    writeln!(w)?;
    writeln!(
        w,
        "  {} ({}):",
        bold("Transitive referrers", config),
        indirect.len()
    )?;
    print_name_list(w, indirect, "(none)", config)
}

fn print_name_list<W: Write>(
    w: &mut W,
    applications: &[&Application],
    empty_message: &str,
    config: &OutputConfig,
) -> io::Result<()> {
    if applications.is_empty() {
        return writeln!(w, "    {}", dimmed(empty_message, config));
    }
    for application in applications {
        writeln!(
            w,
            "    {} {}",
            dimmed("•", config),
            name(&application.name, config)
        )?;
    }
    Ok(())
}

/// Print every detail of one application.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_application_details<W: Write>(
    w: &mut W,
    project: &Project,
    application: &Application,
    referrers: &[&Application],
    config: &OutputConfig,
) -> io::Result<()> {
    writeln!(
        w,
        "{} {}",
        bold(&name(&application.name, config), config),
        dimmed(&format!("#{}", application.id), config)
    )?;

    let fields = [
        ("Title", application.title.as_str()),
        ("Group", application.group.as_str()),
        ("Team", application.team.as_str()),
        ("Technology", application.technology.as_str()),
        ("Category", application.category.as_str()),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            writeln!(w, "  {} {value}", dimmed(&format!("{label}:"), config))?;
        }
    }
    writeln!(
        w,
        "  {} {}",
        dimmed("Status:", config),
        colorize_status(&application.status, config)
    )?;

    print_text_section(w, "Summary", &application.summary(), config)?;

    if !application.provided_services.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", bold("Services", config))?;
        for service in &application.provided_services {
            let mut tags = Vec::new();
            if service.is_open_host {
                tags.push("open-host");
            }
            if service.is_public {
                tags.push("public");
            }
            if service.is_planned() {
                tags.push("planned");
            }
            write!(w, "  {} {}", dimmed("•", config), service.name)?;
            if !tags.is_empty() {
                write!(w, " {}", dimmed(&format!("[{}]", tags.join(", ")), config))?;
            }
            writeln!(w)?;
        }
    }

    let grouped = application.dependencies_grouped(project);
    if !grouped.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", bold("Dependencies", config))?;
        for group in &grouped {
            writeln!(w, "  {}", name(&group.application.name, config))?;
            for dependency in &group.dependencies {
                let service = dependency.service_name();
                let target = if service.is_empty() { "(application)" } else { service };
                write!(w, "    {} {target}", dimmed("→", config))?;
                let relationship = dependency.effective_relationship(project);
                if !relationship.is_empty() {
                    write!(w, " {}", dimmed(&format!("({relationship})"), config))?;
                }
                writeln!(w)?;
            }
        }
    }

    let missing = application.missing_dependencies(project);
    if !missing.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", bold("Missing dependencies", config))?;
        for target in missing {
            writeln!(w, "  {} {}", dimmed("•", config), warning(target, config))?;
        }
    }

    writeln!(w)?;
    writeln!(w, "{} ({}):", bold("Referenced by", config), referrers.len())?;
    print_name_list(w, referrers, "(none)", config)
}

/// Print a text section with a bold title and wrapped, indented content.
fn print_text_section<W: Write>(
    w: &mut W,
    title: &str,
    content: &str,
    config: &OutputConfig,
) -> io::Result<()> {
    if content.is_empty() {
        return Ok(());
    }
    writeln!(w)?;
    writeln!(w, "{}:", bold(title, config))?;
    for line in wrap_text(content, config.max_width.saturating_sub(2)) {
        writeln!(w, "  {line}")?;
    }
    Ok(())
}

/// Wrap text to fit within a given width, preserving existing line breaks.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    text.lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_width.max(1))
                    .into_iter()
                    .map(std::borrow::Cow::into_owned)
                    .collect()
            }
        })
        .collect()
}
