//! The single in-memory "current dataset" owned by a session.
//!
//! There is exactly one dataset live at a time. Re-ingesting replaces it
//! atomically; a failed ingestion clears it, so the session is guaranteed to
//! show "no data" rather than stale data alongside an error message. Nothing
//! here is global state: callers own the `Session` and pass it where needed.

use crate::domain::Dataset;
use crate::error::AppError;
use crate::io::ingest;

/// Exclusively-owned dataset cell. Empty at start, populated by successful
/// ingestion, cleared by failed ingestion or explicit reset, discarded with
/// the session.
#[derive(Debug, Default)]
pub struct Session {
    dataset: Option<Dataset>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest raw CSV text, replacing the current dataset.
    ///
    /// On failure the previous dataset is cleared, never left visible.
    pub fn load(&mut self, text: &str) -> Result<&Dataset, AppError> {
        match ingest::parse_records(text) {
            Ok(dataset) => Ok(self.dataset.insert(dataset)),
            Err(err) => {
                self.dataset = None;
                Err(err)
            }
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Explicit reset back to "no data".
    pub fn clear(&mut self) {
        self.dataset = None;
    }
}
