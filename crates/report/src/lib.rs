//! Reporting for virtbench
//!
//! Everything downstream of a suite run:
//! - [`store`]: the JSON results document (save and load)
//! - [`table`]: the fixed-width comparison table
//! - [`detailed`]: the five-section narrative analysis
//! - [`chart`]: the SVG comparison chart
//!
//! Every consumer reads records positionally, virtio in slot 0 and emulated
//! in slot 1, and refuses anything but exactly two records.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chart;
pub mod detailed;
pub mod error;
pub mod store;
pub mod table;

pub use chart::{open_in_viewer, ChartRenderer};
pub use detailed::{render_detailed_report, write_detailed_report};
pub use error::{ReportError, Result, StoreError};
pub use store::{load_results, save_results};
pub use table::{render_comparison_report, write_comparison_report};

use std::path::Path;

/// Write a rendered text artifact, replacing any previous contents.
pub fn write_artifact(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
