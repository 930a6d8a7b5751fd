//! Error types for the import pipeline.

use std::path::PathBuf;

/// All errors that can occur while parsing, validating or submitting an
/// import.
///
/// Field-level validation failures are not errors: they are reported as
/// [`crate::import::ValidationError`] values inside a
/// [`crate::import::ValidationReport`].
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// HTTP transport failed.
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder if it could not be read.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The delimited-text parser rejected the file.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading the file from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The uploaded file does not carry a `.csv` extension.
    #[error("not a CSV file: {}", path.display())]
    NotCsv {
        /// Path that was rejected.
        path: PathBuf,
    },

    /// The header row lacks one or more required columns.
    #[error("missing required columns: {}", columns.join(", "))]
    MissingColumns {
        /// Missing column names, in schema order.
        columns: Vec<String>,
    },

    /// Submission was attempted while validation errors remain.
    #[error("{errors} validation errors must be fixed before import")]
    ValidationFailed {
        /// Number of outstanding validation errors.
        errors: usize,
    },

    /// An import session operation was called out of order.
    #[error("cannot {action} while the import is in the {stage} stage")]
    InvalidStage {
        /// Operation that was attempted.
        action: &'static str,
        /// Stage the session was in.
        stage: &'static str,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, ImportError>;
