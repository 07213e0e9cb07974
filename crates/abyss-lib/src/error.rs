use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the abyss library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Coordinate is outside the grid or has no cell record.
    #[error("no survey cell at ({row}, {col})")]
    CellNotFound { row: usize, col: usize },

    /// Raised by callers that require a path when both endpoints were valid
    /// but no connecting route exists.
    #[error("no route found between {start} and {goal}")]
    RouteNotFound { start: String, goal: String },

    /// Mode string not accepted by the entry point that received it.
    #[error(
        "mode '{mode}' is not supported for {operation}{}",
        format_suggestions(.suggestions)
    )]
    UnsupportedMode {
        mode: String,
        operation: &'static str,
        suggestions: Vec<String>,
    },

    /// Dataset directory could not be located at the resolved path.
    #[error("dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the dataset location")]
    ProjectDirsUnavailable,

    /// A layer file lacks columns required to build its records.
    #[error("{file} is missing required columns: {}. Available: {}", .missing.join(", "), .available.join(", "))]
    MissingColumns {
        file: String,
        missing: Vec<String>,
        available: Vec<String>,
    },

    /// Malformed dataset content; initialization must abort.
    #[error("failed to load dataset from {path}: {message}")]
    DataLoad { path: PathBuf, message: String },

    /// Layers violate a structural invariant (duplicate or out-of-bounds cells).
    #[error("invalid dataset: {message}")]
    InvalidDataset { message: String },

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the caller can recover by asking for different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::CellNotFound { .. } | Error::RouteNotFound { .. } | Error::UnsupportedMode { .. }
        )
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
