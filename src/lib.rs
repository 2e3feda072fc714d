//! virtbench - synthetic virtio vs emulated device benchmark
//!
//! Two profiles are compared: a paravirtualized one (virtio disk, virtio-net)
//! and an emulated one (IDE disk, e1000 NIC). A suite run fabricates boot
//! time, throughput and host CPU figures for each and saves them as JSON;
//! the analyzer turns the saved results into reports and a chart.
//!
//! # Quick Start
//!
//! ```ignore
//! use virtbench::{BenchConfig, CancellationToken, ComparisonSuite};
//! use virtbench::{render_comparison_report, save_results};
//!
//! let config = BenchConfig::default();
//! let records = ComparisonSuite::new(&config, CancellationToken::new()).run()?;
//! println!("{}", render_comparison_report(&records)?);
//! save_results(&records, &config.results_path)?;
//! ```
//!
//! # Architecture
//!
//! - `virtbench-core`: profiles, records, metric arithmetic, config
//! - `virtbench-harness`: sampler, sessions and the comparison suite
//! - `virtbench-report`: results store, comparison table, detailed report, chart
//!
//! Records are always positional: slot 0 is the subject (virtio) and slot 1
//! the baseline (emulated).

pub use virtbench_core::{
    check_record_count, iso_timestamp, percent_improvement, ratio, BenchConfig, BootBaseline,
    Comparison, DeviceProfile, Direction, DiskBus, DiskImageConfig, Error as CoreError,
    MetricKind, MetricRecord, NicModel, ResultsDocument, ThroughputBaseline, TimingConfig,
    CONFIG_FILE_NAME, MAX_SCALED_PHASE, REQUIRED_RECORDS,
};
pub use virtbench_harness::{
    boot_delay, mean_cpu_percent, remove_placeholder, sample_throughput, CancellationToken,
    ComparisonSuite, CpuSample, CpuSensor, DiskImageProvisioner, DiskOperation, HarnessError,
    ImageKind, PlaceholderImage, QemuImgProvisioner, SamplerHandle, SensorFactory, SessionRunner,
    SysinfoCpuSensor,
};
pub use virtbench_report::{
    load_results, open_in_viewer, render_comparison_report, render_detailed_report,
    save_results, write_artifact, write_comparison_report, write_detailed_report, ChartRenderer,
    ReportError, StoreError,
};
