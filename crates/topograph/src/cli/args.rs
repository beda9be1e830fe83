//! CLI argument structs for commands that take arguments.

use clap::Parser;

/// Arguments for the `cycles` command
#[derive(Parser, Debug, Clone, Default)]
pub struct CyclesArgs {
    /// Print each group of mutually dependent applications once
    ///
    /// Without this flag a cycle is reported once for every application
    /// whose dependency walk runs into it.
    #[arg(long)]
    pub distinct: bool,
}

/// Arguments for the `impact` command
#[derive(Parser, Debug, Clone, Default)]
pub struct ImpactArgs {
    /// Show the referrers of this application instead of the full table
    pub application: Option<String>,

    /// Rank the table by transitive, then direct impact
    #[arg(short, long, conflicts_with = "application")]
    pub sort: bool,
}

/// Arguments for the `show` command
#[derive(Parser, Debug, Clone)]
pub struct ShowArgs {
    /// Name of the application to display
    pub application: String,
}
