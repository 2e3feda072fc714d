//! One simulated VM lifecycle.
//!
//! A session boots (sleeps), runs the disk and network sub-benchmarks
//! (sleep, then draw a synthetic figure), lets CPU samples settle, and
//! returns a [`MetricRecord`]. The CPU sampler belongs to the session and is
//! stopped on every exit path, including early returns on interruption.

use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use virtbench_core::{iso_timestamp, DeviceProfile, MetricRecord, TimingConfig};

use crate::cancel::CancellationToken;
use crate::error::Result;
use crate::sampler::{mean_cpu_percent, CpuSensor, SamplerHandle, SysinfoCpuSensor};
use crate::synthetic::{boot_delay, round_to, sample_throughput, DiskOperation};

/// Builds a fresh CPU sensor for each session.
pub type SensorFactory = Arc<dyn Fn() -> Box<dyn CpuSensor> + Send + Sync>;

/// Runs sessions with a fixed set of timings.
#[derive(Clone)]
pub struct SessionRunner {
    timings: TimingConfig,
    sensor_factory: SensorFactory,
    cancel: CancellationToken,
}

impl SessionRunner {
    /// Runner sampling the real host CPU.
    pub fn new(timings: TimingConfig, cancel: CancellationToken) -> Self {
        Self {
            timings,
            sensor_factory: Arc::new(|| Box::new(SysinfoCpuSensor::new()) as Box<dyn CpuSensor>),
            cancel,
        }
    }

    /// Replace the CPU sensor source.
    pub fn with_sensor<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn CpuSensor> + Send + Sync + 'static,
    {
        self.sensor_factory = Arc::new(factory);
        self
    }

    /// Run one session with the thread-local RNG.
    pub fn run_session(&self, profile: &DeviceProfile) -> Result<MetricRecord> {
        self.run_session_with_rng(profile, &mut rand::thread_rng())
    }

    /// Run one session drawing variance from `rng`.
    pub fn run_session_with_rng<R: Rng>(
        &self,
        profile: &DeviceProfile,
        rng: &mut R,
    ) -> Result<MetricRecord> {
        info!(
            target: "virtbench::session",
            profile = %profile.name,
            disk = %profile.disk_type,
            network = %profile.network_type,
            memory = %profile.memory,
            cpus = profile.cpu_count,
            "Starting session"
        );

        let mut record = MetricRecord::for_profile(profile, iso_timestamp());

        let sampler = SamplerHandle::start(
            (self.sensor_factory)(),
            self.timings.sample_interval(),
            self.timings.sampler_join_timeout(),
        )?;

        info!(target: "virtbench::session", "[1/5] Booting VM");
        let delay = self.timings.scaled(boot_delay(profile));
        let started = Instant::now();
        self.cancel.pause(delay)?;
        record.boot_time = round_to(started.elapsed().as_secs_f64(), 3);
        info!(target: "virtbench::session", boot_time = record.boot_time, "Boot complete");

        info!(target: "virtbench::session", "[2/5] Disk benchmark");
        record.disk_read_speed = self.disk_benchmark(profile, DiskOperation::Read, rng)?;
        record.disk_write_speed = self.disk_benchmark(profile, DiskOperation::Write, rng)?;

        info!(target: "virtbench::session", "[3/5] Network benchmark");
        record.network_throughput = self.timed_sample(self.timings.network_phase(), || {
            sample_throughput(&profile.network_baseline(), rng)
        })?;
        info!(target: "virtbench::session", mbps = record.network_throughput, "Network throughput");

        info!(target: "virtbench::session", "[4/5] Measuring CPU overhead");
        self.cancel.pause(self.timings.settle())?;

        let samples = sampler.stop();
        record.cpu_overhead = round_to(mean_cpu_percent(&samples), 2);

        info!(
            target: "virtbench::session",
            samples = samples.len(),
            cpu_overhead = record.cpu_overhead,
            "[5/5] Session complete"
        );
        Ok(record)
    }

    fn disk_benchmark<R: Rng>(
        &self,
        profile: &DeviceProfile,
        op: DiskOperation,
        rng: &mut R,
    ) -> Result<f64> {
        let speed = self.timed_sample(self.timings.disk_phase(), || {
            sample_throughput(&op.baseline(profile), rng)
        })?;
        info!(target: "virtbench::session", op = op.as_str(), mb_per_s = speed, "Disk throughput");
        Ok(speed)
    }

    fn timed_sample(&self, phase: Duration, draw: impl FnOnce() -> f64) -> Result<f64> {
        self.cancel.pause(phase)?;
        Ok(draw())
    }
}
