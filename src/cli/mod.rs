//! Command-line parsing for the adherence analytics tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the ingest/aggregation code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::DEFAULT_GROUP_COLUMN;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "adhx", version, about = "Session-based medication adherence analytics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest a CSV and print summary statistics plus the privacy display.
    Overview(DataArgs),
    /// Ask the hosted model which analyses fit the selected time window.
    Suggest(SuggestArgs),
    /// Ingest a CSV and write record/summary exports.
    Export(ExportArgs),
}

/// Common input/windowing options shared by every subcommand.
#[derive(Debug, Parser, Clone)]
pub struct DataArgs {
    /// CSV input file; use '-' to read from stdin.
    pub input: PathBuf,

    /// Column used for distinct-group counting.
    #[arg(long, default_value = DEFAULT_GROUP_COLUMN)]
    pub group_by: String,

    /// Window start (unix seconds, inclusive).
    #[arg(long)]
    pub start: Option<f64>,

    /// Window end (unix seconds, inclusive).
    #[arg(long)]
    pub end: Option<f64>,
}

/// Options for the suggestion call.
#[derive(Debug, Parser)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Additional context passed to the model alongside the data.
    #[arg(long, default_value = "Analyzing medication adherence for clinical research.")]
    pub context: String,
}

/// Options for exports.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Write the validated records to this CSV file.
    #[arg(long, value_name = "CSV")]
    pub records: Option<PathBuf>,

    /// Write the computed aggregates to this JSON file.
    #[arg(long, value_name = "JSON")]
    pub summary: Option<PathBuf>,
}
