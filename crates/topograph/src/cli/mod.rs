//! CLI argument parsing and command dispatch.
//!
//! # Commands
//!
//! - `validate`: Check that every dependency resolves
//! - `list`: List applications with their ids
//! - `analyze`: Validation, cycle detection and the impact table in one run
//! - `cycles`: Detect cyclic dependencies
//! - `impact`: Show how many applications depend on each application
//! - `groups`: Show the group hierarchy
//! - `show`: Show one application in detail
//!
//! # Global Flags
//!
//! - `-c, --config <FILE>`: Project configuration file
//! - `--subview <NAME>`: Restrict the project to a sub-view
//! - `--skip-validation`: Accept unknown keys and do not fail on validation errors
//! - `--json`: Output in JSON format
//! - `-v`: Verbose logging (repeatable)
//!
//! # Example
//!
//! ```bash
//! topograph --config architecture/topograph.yml analyze
//! topograph impact --sort
//! topograph --subview checkout show payment
//! ```

mod args;
mod execute;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::DEFAULT_CONFIG_FILE;
use crate::loader::ProjectLoader;
use crate::output::{OutputConfig, OutputMode};

pub use args::{CyclesArgs, ImpactArgs, ShowArgs};

/// Topograph - architecture dependency analysis
///
/// Loads application definitions described by a project configuration file
/// and reports on the dependencies between them.
#[derive(Parser, Debug)]
#[command(name = "topograph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Restrict the project to the applications of this sub-view
    #[arg(long, global = true)]
    pub subview: Option<String>,

    /// Accept unknown keys in definitions and do not fail on validation errors
    #[arg(long, global = true)]
    pub skip_validation: bool,

    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate the project
    ///
    /// Reports every dependency whose target application or service does not
    /// exist. Exits non-zero if any are found.
    Validate,

    /// List applications with their ids
    List,

    /// Run validation, cycle detection and impact analysis
    ///
    /// Exits non-zero if validation or cycle detection found errors.
    Analyze,

    /// Detect cyclic dependencies
    ///
    /// Exits non-zero if any cycle is found.
    Cycles(CyclesArgs),

    /// Show impact analysis
    ///
    /// Counts, for every application, how many applications depend on it
    /// directly and over any chain of dependencies.
    Impact(ImpactArgs),

    /// Show the group hierarchy
    Groups,

    /// Show details of one application
    ///
    /// Lists its services, dependencies grouped by target, dependencies on
    /// applications that do not exist, and the applications referencing it.
    Show(ShowArgs),
}

/// How a command run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command ran and found nothing wrong
    Success,
    /// The command ran and found problems in the project
    ProblemsFound,
}

impl Outcome {
    fn from_problems(found: bool) -> Self {
        if found { Self::ProblemsFound } else { Self::Success }
    }
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::ProblemsFound => ExitCode::FAILURE,
        }
    }
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log filter matching the `-v` count.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Load the project and execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be loaded, the named
    /// application does not exist, or writing output fails.
    pub fn execute(&self) -> Result<Outcome> {
        let output_mode = if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        let output_config = OutputConfig::from_env();

        let loader = ProjectLoader::new(!self.skip_validation);
        let project = loader
            .load_project_from_config_file(&self.config, self.subview.as_deref())
            .with_context(|| format!("Failed to load project from {}", self.config.display()))?;

        let ctx = execute::Context {
            project: &project,
            mode: output_mode,
            config: &output_config,
            skip_validation: self.skip_validation,
        };

        match &self.command {
            Commands::Validate => execute::execute_validate(&ctx),
            Commands::List => execute::execute_list(&ctx),
            Commands::Analyze => execute::execute_analyze(&ctx),
            Commands::Cycles(args) => execute::execute_cycles(&ctx, args),
            Commands::Impact(args) => execute::execute_impact(&ctx, args),
            Commands::Groups => execute::execute_groups(&ctx),
            Commands::Show(args) => execute::execute_show(&ctx, args),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // ========== CLI Parsing Tests ==========

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["topograph", "validate"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(cli.subview.is_none());
        assert!(!cli.skip_validation);
        assert!(!cli.json);
        assert_eq!(cli.log_filter(), "warn");
        assert!(matches!(cli.command, Commands::Validate));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "topograph",
            "list",
            "--config",
            "arch/project.yml",
            "--subview",
            "checkout",
            "--json",
            "--skip-validation",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("arch/project.yml"));
        assert_eq!(cli.subview.as_deref(), Some("checkout"));
        assert!(cli.json);
        assert!(cli.skip_validation);
    }

    #[rstest]
    #[case(&["topograph", "groups"], "warn")]
    #[case(&["topograph", "-v", "groups"], "info")]
    #[case(&["topograph", "-vv", "groups"], "debug")]
    #[case(&["topograph", "-vvvv", "groups"], "trace")]
    fn test_verbosity(#[case] args: &[&str], #[case] expected: &str) {
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.log_filter(), expected);
    }

    #[test]
    fn test_cycles_distinct() {
        let cli = Cli::try_parse_from(["topograph", "cycles", "--distinct"]).unwrap();
        match cli.command {
            Commands::Cycles(args) => assert!(args.distinct),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_impact_args() {
        let cli = Cli::try_parse_from(["topograph", "impact", "--sort"]).unwrap();
        match cli.command {
            Commands::Impact(args) => {
                assert!(args.sort);
                assert!(args.application.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }

        let cli = Cli::try_parse_from(["topograph", "impact", "payment"]).unwrap();
        match cli.command {
            Commands::Impact(args) => assert_eq!(args.application.as_deref(), Some("payment")),
            other => panic!("unexpected command {other:?}"),
        }

        assert!(Cli::try_parse_from(["topograph", "impact", "payment", "--sort"]).is_err());
    }

    #[test]
    fn test_show_requires_application() {
        assert!(Cli::try_parse_from(["topograph", "show"]).is_err());
        let cli = Cli::try_parse_from(["topograph", "show", "shop"]).unwrap();
        match cli.command {
            Commands::Show(args) => assert_eq!(args.application, "shop"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["topograph"]).is_err());
    }

    #[test]
    fn test_outcome_exit_code() {
        assert_eq!(
            format!("{:?}", ExitCode::from(Outcome::Success)),
            format!("{:?}", ExitCode::SUCCESS)
        );
        assert_eq!(Outcome::from_problems(true), Outcome::ProblemsFound);
    }
}
