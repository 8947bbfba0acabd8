//! CLI argument definitions for the assessment importer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use assess_cli::Entity;

#[derive(Parser)]
#[command(
    name = "assess-import",
    version,
    about = "Import district assessment exports into canonical records",
    long_about = "Parse CSV/XLSX assessment exports, detect the vendor format,\n\
                  normalize scores and subscores, and report a batch summary."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Explicit log level (overrides -v).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process an assessment file and print the batch summary.
    Import(ImportArgs),

    /// Preview the column mapping for a roster-style file.
    Map(MapArgs),
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Path to the CSV or XLSX export.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Zero-based header row index (skips heuristic detection).
    #[arg(long = "header-row", value_name = "ROW")]
    pub header_row: Option<usize>,

    /// Emit the full result as JSON on stdout instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct MapArgs {
    /// Path to the CSV or XLSX export.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Entity type whose target fields the columns map onto.
    #[arg(long = "entity", value_enum, default_value = "student")]
    pub entity: EntityArg,

    /// Minimum confidence for a mapping to count as matched.
    #[arg(long = "threshold", value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Zero-based header row index (skips heuristic detection).
    #[arg(long = "header-row", value_name = "ROW")]
    pub header_row: Option<usize>,

    /// Emit the mappings as JSON on stdout instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum EntityArg {
    Student,
    Staff,
    Classroom,
}

impl From<EntityArg> for Entity {
    fn from(value: EntityArg) -> Self {
        match value {
            EntityArg::Student => Entity::Student,
            EntityArg::Staff => Entity::Staff,
            EntityArg::Classroom => Entity::Classroom,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
