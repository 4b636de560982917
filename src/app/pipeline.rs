//! Shared "ingest pipeline" logic used by every subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load text -> ingest/validate -> aggregate
//!
//! The subcommands can then focus on presentation (printing vs file exports).

use std::io::Read;

use crate::domain::{Dataset, DatasetSummary, RunConfig};
use crate::error::AppError;
use crate::session::Session;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub summary: DatasetSummary,
}

/// Load the raw CSV text from the configured origin (file or stdin).
///
/// Ingestion itself is origin-agnostic; this is the only place that touches
/// the filesystem or stdin.
pub fn load_input(config: &RunConfig) -> Result<String, AppError> {
    match &config.input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| AppError::Io(format!("Failed to read CSV '{}': {e}", path.display()))),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| AppError::Io(format!("Failed to read CSV from stdin: {e}")))?;
            Ok(buf)
        }
    }
}

/// Execute the full pipeline: load, ingest into the session, aggregate.
pub fn run_summary(config: &RunConfig, session: &mut Session) -> Result<RunOutput, AppError> {
    let text = load_input(config)?;
    let dataset = session.load(&text)?.clone();

    log::info!(
        "loaded {} records; aggregating with group_by='{}'",
        dataset.len(),
        config.group_by
    );

    let summary = crate::stats::summarize(&dataset.records, &config.group_by, config.window())?;

    Ok(RunOutput { dataset, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_GROUP_COLUMN;

    fn config_for(path: std::path::PathBuf) -> RunConfig {
        RunConfig {
            input: Some(path),
            group_by: DEFAULT_GROUP_COLUMN.to_string(),
            start: None,
            end: None,
        }
    }

    #[test]
    fn runs_end_to_end_from_a_file() {
        let path = std::env::temp_dir().join(format!("adhx-pipeline-{}.csv", std::process::id()));
        std::fs::write(&path, "timestamp,adherenceRate,patientId\n1,0.5,P001\n2,1.0,P002\n").unwrap();

        let mut session = Session::new();
        let run = run_summary(&config_for(path.clone()), &mut session).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(run.dataset.len(), 2);
        assert_eq!(run.summary.record_count, 2);
        assert_eq!(run.summary.unique_patient_count, 2);
        assert!((run.summary.mean_adherence - 0.75).abs() < 1e-12);
        assert!(session.dataset().is_some());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut session = Session::new();
        let err = run_summary(
            &config_for(std::path::PathBuf::from("/nonexistent/adhx.csv")),
            &mut session,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
