//! Core types for virtbench
//!
//! This crate defines the data shared by the harness and the reports:
//! - DeviceProfile: a disk bus + NIC pairing and its synthetic baselines
//! - MetricRecord / ResultsDocument: one profile's results and the persisted file
//! - Comparison / MetricKind: slot-0-vs-slot-1 improvement arithmetic
//! - BenchConfig: `virtbench.toml`
//! - Error: error type shared across crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod comparison;
pub mod config;
pub mod error;
pub mod metrics;
pub mod profile;

pub use comparison::{
    check_record_count, percent_improvement, ratio, Comparison, Direction, MetricKind,
    REQUIRED_RECORDS,
};
pub use config::{BenchConfig, DiskImageConfig, TimingConfig, CONFIG_FILE_NAME, MAX_SCALED_PHASE};
pub use error::{Error, Result};
pub use metrics::{iso_timestamp, MetricRecord, ResultsDocument};
pub use profile::{BootBaseline, DeviceProfile, DiskBus, NicModel, ThroughputBaseline};
