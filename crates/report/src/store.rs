//! JSON persistence for the results document.
//!
//! The suite run saves `{ "timestamp": ..., "metrics": [...] }` and the
//! analyzer loads it back. Saving overwrites any previous document.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{error, info};
use virtbench_core::{MetricRecord, ResultsDocument};

use crate::error::StoreError;

/// Save `records` as a freshly timestamped document at `path`.
///
/// Returns the document that was written.
pub fn save_results(records: &[MetricRecord], path: &Path) -> Result<ResultsDocument, StoreError> {
    let document = ResultsDocument::new(records.to_vec());
    match write_document(&document, path) {
        Ok(()) => {
            info!(
                target: "virtbench::store",
                path = %path.display(),
                records = document.metrics.len(),
                "Results saved"
            );
            Ok(document)
        }
        Err(e) => {
            error!(target: "virtbench::store", path = %path.display(), error = %e, "Failed to save results");
            Err(e)
        }
    }
}

fn write_document(document: &ResultsDocument, path: &Path) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(document).map_err(StoreError::Serialize)?;
    fs::write(path, json).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a results document from `path`.
///
/// A missing file is [`StoreError::NotFound`]; anything that does not parse
/// as a results document is [`StoreError::Malformed`].
pub fn load_results(path: &Path) -> Result<ResultsDocument, StoreError> {
    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
        _ => StoreError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let document: ResultsDocument =
        serde_json::from_str(&contents).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    info!(
        target: "virtbench::store",
        path = %path.display(),
        records = document.metrics.len(),
        "Results loaded"
    );
    Ok(document)
}
