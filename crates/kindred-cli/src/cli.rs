//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use kindred_domain::traits::{SortDirection, SortField};
use std::path::PathBuf;

/// Kindred CLI - Import family members and explore their relations.
#[derive(Debug, Parser)]
#[command(name = "kindred")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "KINDRED_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file (overrides the configured one)
    #[arg(long, global = true, env = "KINDRED_DB")]
    pub db: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (codes only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import members from a CSV file and build their relations
    Import(ImportArgs),

    /// List members
    Members(MembersArgs),

    /// Show the relations of one member
    Relations(RelationsArgs),
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// CSV file to import
    pub file: PathBuf,
}

/// Arguments for the members command.
#[derive(Debug, Parser)]
pub struct MembersArgs {
    /// Filter on names, dates, contact, address and social network fields
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page number (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Members per page
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Sort field: code, firstName, lastName or birthDate
    #[arg(long, default_value = "code", value_parser = parse_sort_field)]
    pub sort: SortField,

    /// Sort in descending order
    #[arg(long)]
    pub desc: bool,
}

/// Arguments for the relations command.
#[derive(Debug, Parser)]
pub struct RelationsArgs {
    /// Genealogy code of the member
    pub code: String,
}

fn parse_sort_field(s: &str) -> Result<SortField, String> {
    SortField::parse(s).ok_or_else(|| {
        format!(
            "unknown sort field '{}' (expected code, firstName, lastName or birthDate)",
            s
        )
    })
}

impl MembersArgs {
    /// Sort direction requested by `--desc`
    pub fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
