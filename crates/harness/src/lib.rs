//! Synthetic benchmark harness for virtbench
//!
//! - [`MetricsSampler`](sampler): background host CPU sampling per session
//! - [`synthetic`]: boot delay and baseline-plus-variance throughput model
//! - [`disk_image`]: placeholder image provisioning and cleanup
//! - [`SessionRunner`]: one simulated VM lifecycle
//! - [`ComparisonSuite`]: virtio then emulated, with cleanup between profiles
//!
//! No real hypervisor or I/O is involved; the delays and the variance model
//! are the whole benchmark.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod disk_image;
pub mod error;
pub mod sampler;
pub mod session;
pub mod suite;
pub mod synthetic;

pub use cancel::CancellationToken;
pub use disk_image::{
    remove_placeholder, DiskImageProvisioner, ImageKind, PlaceholderImage, QemuImgProvisioner,
};
pub use error::{HarnessError, Result};
pub use sampler::{mean_cpu_percent, CpuSample, CpuSensor, SamplerHandle, SysinfoCpuSensor};
pub use session::{SensorFactory, SessionRunner};
pub use suite::ComparisonSuite;
pub use synthetic::{boot_delay, sample_throughput, DiskOperation};
