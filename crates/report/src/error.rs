//! Error types for reports and the results store.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for report rendering
pub type Result<T> = std::result::Result<T, ReportError>;

/// Failures while rendering or writing a report or chart.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Wrong number of records (the "insufficient data" signal)
    #[error(transparent)]
    Records(#[from] virtbench_core::Error),

    /// The chart backend failed
    #[error("Chart rendering failed: {0}")]
    Chart(String),

    /// Writing an artifact failed
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        /// Artifact path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl ReportError {
    /// True when the input had the wrong number of records.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, ReportError::Records(e) if e.is_insufficient_data())
    }
}

/// Failures loading or saving the results document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No file at the path
    #[error("Results file {} not found", .0.display())]
    NotFound(PathBuf),

    /// The file is not a well-formed results document
    #[error("Invalid results document {}: {source}", .path.display())]
    Malformed {
        /// Results path
        path: PathBuf,
        /// Parse error
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Results path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The document could not be serialized
    #[error("Failed to serialize results: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_passes_through() {
        let err: ReportError = virtbench_core::Error::InsufficientData {
            required: 2,
            found: 0,
        }
        .into();
        assert!(err.is_insufficient_data());
        assert!(err.to_string().contains("Insufficient data"));
    }

    #[test]
    fn chart_error_is_not_insufficient_data() {
        let err = ReportError::Chart("backend".to_string());
        assert!(!err.is_insufficient_data());
    }

    #[test]
    fn not_found_mentions_path() {
        let err = StoreError::NotFound(PathBuf::from("results.json"));
        assert_eq!(err.to_string(), "Results file results.json not found");
    }
}
