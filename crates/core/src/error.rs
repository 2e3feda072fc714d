//! Error types for virtbench core
//!
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared by the harness and the report generators
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (config file reads and writes)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Fewer metric records than a comparison needs
    #[error("Insufficient data for comparison: need {required} metric records, found {found}")]
    InsufficientData {
        /// Records a comparison needs
        required: usize,
        /// Records supplied
        found: usize,
    },

    /// More metric records than the two-slot comparison accepts
    #[error("Unexpected number of metric records: need exactly {required}, found {found}")]
    TooManyRecords {
        /// Records a comparison needs
        required: usize,
        /// Records supplied
        found: usize,
    },

    /// Configuration could not be parsed or failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create an `InvalidConfig` error from anything printable.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }

    /// True for the record-count errors every report consumer checks.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            Error::InsufficientData { .. } | Error::TooManyRecords { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_insufficient_data() {
        let err = Error::InsufficientData {
            required: 2,
            found: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("Insufficient data"));
        assert!(msg.contains("found 1"));
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_error_display_too_many() {
        let err = Error::TooManyRecords {
            required: 2,
            found: 3,
        };
        assert!(err.to_string().contains("exactly 2"));
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::IoError(_)));
        assert!(!err.is_insufficient_data());
    }

    #[test]
    fn test_invalid_config_helper() {
        let err = Error::invalid_config("time_scale must be >= 0");
        assert!(err.to_string().contains("Invalid configuration"));
        assert!(err.to_string().contains("time_scale"));
    }
}
