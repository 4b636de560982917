//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the ingest/aggregation pipeline
//! - calls the hosted suggestion model when asked
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::ai::{SuggestClient, SuggestionRequest};
use crate::cli::{Command, DataArgs, ExportArgs, SuggestArgs};
use crate::domain::{RunConfig, TimeWindow};
use crate::error::AppError;
use crate::report::PrivacyReport;
use crate::session::Session;

pub mod pipeline;

/// Entry point for the `adhx` binary.
pub fn run() -> Result<(), AppError> {
    // We want `adhx data.csv` to behave like `adhx overview data.csv`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // keeping the common case short.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Overview(args) => handle_overview(args),
        Command::Suggest(args) => handle_suggest(args),
        Command::Export(args) => handle_export(args),
    }
}

fn handle_overview(args: DataArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let mut session = Session::new();
    let run = pipeline::run_summary(&config, &mut session)?;

    println!("{}", crate::report::format_overview(&run.summary, &config.group_by));
    println!("{}", crate::report::format_privacy_report(&PrivacyReport::SIMULATED));

    Ok(())
}

fn handle_suggest(args: SuggestArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.data);
    let mut session = Session::new();
    let run = pipeline::run_summary(&config, &mut session)?;

    // No window flags means "the full data range". The dataset is non-empty
    // here (ingestion requires at least one row), so bounds always exist.
    let window = match config.window() {
        Some(w) => w,
        None => {
            let (start, end) = crate::stats::timestamp_bounds(&run.dataset.records)
                .ok_or_else(|| AppError::EmptyDataset("No records to analyze.".to_string()))?;
            TimeWindow::new(start, end)
        }
    };

    let request = SuggestionRequest::from_records(&run.dataset.records, window, Some(args.context));
    let client = SuggestClient::from_env()?;
    let response = client.suggest(&request)?;

    println!("{}", crate::report::format_suggestions(&response.suggested_analyses));

    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.data);
    let mut session = Session::new();
    let run = pipeline::run_summary(&config, &mut session)?;

    if let Some(path) = &args.records {
        crate::io::export::write_records_csv(path, &run.dataset)?;
        log::info!("wrote {} records to {}", run.dataset.len(), path.display());
    }
    if let Some(path) = &args.summary {
        crate::io::export::write_summary_json(path, &run.summary)?;
        log::info!("wrote summary to {}", path.display());
    }

    Ok(())
}

fn run_config_from_args(args: &DataArgs) -> RunConfig {
    RunConfig {
        input: (args.input.as_os_str() != "-").then(|| args.input.clone()),
        group_by: args.group_by.clone(),
        start: args.start,
        end: args.end,
    }
}

/// Rewrite argv so `adhx <input>` defaults to `adhx overview <input>`.
///
/// Rules:
/// - `adhx data.csv`           -> `adhx overview data.csv`
/// - `adhx --start 5 data.csv` -> `adhx overview --start 5 data.csv`
/// - `adhx --help/--version`   -> unchanged (show top-level help/version)
fn rewrite_args(argv: Vec<String>) -> Vec<String> {
    let mut argv = argv;
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("overview".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "overview" | "suggest" | "export");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "overview".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_input_defaults_to_overview() {
        assert_eq!(
            rewrite_args(args(&["adhx", "data.csv"])),
            args(&["adhx", "overview", "data.csv"])
        );
        assert_eq!(
            rewrite_args(args(&["adhx", "--start", "5", "data.csv"])),
            args(&["adhx", "overview", "--start", "5", "data.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["adhx", "suggest", "data.csv"])),
            args(&["adhx", "suggest", "data.csv"])
        );
        assert_eq!(rewrite_args(args(&["adhx", "--help"])), args(&["adhx", "--help"]));
    }

    #[test]
    fn stdin_marker_maps_to_no_input_path() {
        let data = DataArgs {
            input: "-".into(),
            group_by: "patientId".to_string(),
            start: None,
            end: None,
        };
        assert!(run_config_from_args(&data).input.is_none());
    }
}
