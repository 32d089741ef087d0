//! I/O error types for infogain-io.

use std::path::PathBuf;

use infogain_split::GainError;

/// Errors from reading scenarios and writing gain reports.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the scenario file is not valid scenario JSON.
    #[error("invalid scenario JSON in {path}")]
    JsonParse {
        /// Path to the scenario file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when the scenario lists no candidate splits.
    #[error("scenario {path} has no candidate splits")]
    NoCandidates {
        /// Path to the scenario file.
        path: PathBuf,
    },

    /// Returned when prior weighting is requested but the scenario has no training counts.
    #[error("prior-weighted evaluation requires train_counts in the scenario")]
    MissingTrainCounts,

    /// Returned when the scenario's priors or counts are rejected by the criterion.
    #[error("invalid scenario: {0}")]
    InvalidScenario(#[from] GainError),

    /// Returned when a report cannot be serialized.
    #[error("failed to serialize report")]
    Serialize {
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Returned when a file write operation fails.
    #[error("failed to write {path}")]
    WriteFile {
        /// Path to the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
