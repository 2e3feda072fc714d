//! Error types for the harness.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Failures a session or the suite can hit.
///
/// Everything except `Interrupted` is local to one profile: the suite logs
/// it and moves on to the next profile.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The disk image tool ran and exited unsuccessfully
    #[error("Disk image tool '{tool}' failed for {}: {stderr}", .path.display())]
    ImageToolFailed {
        /// Tool that was invoked
        tool: String,
        /// Image path
        path: PathBuf,
        /// Captured stderr
        stderr: String,
    },

    /// The disk image tool exists but could not be started
    #[error("Could not run disk image tool '{tool}': {source}")]
    ImageToolSpawn {
        /// Tool that was invoked
        tool: String,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// Writing the fallback placeholder failed
    #[error("Failed to write placeholder image {}: {source}", .path.display())]
    ImageIo {
        /// Image path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },

    /// The CPU sampler thread could not be spawned
    #[error("Failed to start CPU sampler: {0}")]
    SamplerSpawn(#[source] io::Error),

    /// The run was cancelled (Ctrl-C)
    #[error("Interrupted by user")]
    Interrupted,
}

impl HarnessError {
    /// True when the whole suite must stop rather than skip a profile.
    pub fn is_interrupted(&self) -> bool {
        matches!(self, HarnessError::Interrupted)
    }
}
