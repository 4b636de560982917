use thiserror::Error;

/// Crate-wide error type.
///
/// Exit codes follow the CLI convention:
/// - 2: input problems (unreadable input, bad CSV structure, bad schema)
/// - 3: nothing to aggregate (empty dataset or empty time window)
/// - 4: remote suggestion call failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    /// The input is structurally not a CSV we can read.
    #[error("{0}")]
    MalformedInput(String),

    /// A required header column is absent.
    #[error("CSV header is missing required column: {column}")]
    SchemaViolation { column: String },

    /// A required numeric field failed to parse on a specific data row.
    ///
    /// `line` is 1-based and counts the header as line 1, so the first data
    /// row reports line 2.
    #[error("Invalid number format in row {line}, column '{column}'.")]
    TypeMismatch { line: usize, column: String },

    /// Aggregation was requested over zero records.
    #[error("{0}")]
    EmptyDataset(String),

    /// Failed to load input or write an export.
    #[error("{0}")]
    Io(String),

    /// The remote analysis-suggestion call failed.
    #[error("Analysis suggestion failed: {0}")]
    Suggestion(String),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::MalformedInput(_)
            | AppError::SchemaViolation { .. }
            | AppError::TypeMismatch { .. }
            | AppError::Io(_) => 2,
            AppError::EmptyDataset(_) => 3,
            AppError::Suggestion(_) => 4,
        }
    }
}
