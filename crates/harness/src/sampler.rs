//! Background host CPU sampler.
//!
//! One sampler runs per session on its own thread. The thread owns the
//! sample buffer outright; [`SamplerHandle::stop`] signals it over a channel
//! and receives the finished buffer back, so the buffer is never shared and
//! never outlives the session that created it.

use chrono::{DateTime, Utc};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;
use sysinfo::System;
use tracing::{debug, warn};

use crate::error::{HarnessError, Result};

/// Source of host CPU utilization readings.
pub trait CpuSensor: Send + 'static {
    /// Current host-wide CPU utilization in percent.
    fn cpu_percent(&mut self) -> f32;
}

impl<F> CpuSensor for F
where
    F: FnMut() -> f32 + Send + 'static,
{
    fn cpu_percent(&mut self) -> f32 {
        self()
    }
}

/// Host CPU sensor backed by `sysinfo`.
pub struct SysinfoCpuSensor {
    system: System,
}

impl SysinfoCpuSensor {
    /// Create a sensor and take the baseline reading the first delta needs.
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu();
        Self { system }
    }
}

impl Default for SysinfoCpuSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSensor for SysinfoCpuSensor {
    fn cpu_percent(&mut self) -> f32 {
        self.system.refresh_cpu();
        self.system.global_cpu_info().cpu_usage()
    }
}

/// One timestamped reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuSample {
    /// When the reading was taken
    pub timestamp: DateTime<Utc>,
    /// Host CPU utilization in percent
    pub cpu_percent: f32,
}

/// Arithmetic mean of the readings, `0.0` when there are none.
pub fn mean_cpu_percent(samples: &[CpuSample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let total: f64 = samples.iter().map(|s| f64::from(s.cpu_percent)).sum();
    total / samples.len() as f64
}

/// A running sampler. Dropping the handle stops the sampler.
pub struct SamplerHandle {
    stop_tx: Option<Sender<()>>,
    done_rx: Receiver<Vec<CpuSample>>,
    thread: Option<JoinHandle<()>>,
    join_timeout: Duration,
}

impl SamplerHandle {
    /// Spawn the sampler thread.
    ///
    /// `interval` is the gap between readings; `join_timeout` bounds how long
    /// [`stop`](Self::stop) waits for the buffer.
    pub fn start(
        sensor: Box<dyn CpuSensor>,
        interval: Duration,
        join_timeout: Duration,
    ) -> Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (done_tx, done_rx) = mpsc::channel::<Vec<CpuSample>>();

        let thread = std::thread::Builder::new()
            .name("virtbench-sampler".to_string())
            .spawn(move || {
                let samples = sample_loop(sensor, interval, &stop_rx);
                // Receiver may have given up waiting
                let _ = done_tx.send(samples);
            })
            .map_err(HarnessError::SamplerSpawn)?;

        debug!(target: "virtbench::sampler", interval_ms = interval.as_millis() as u64, "CPU sampler started");

        Ok(Self {
            stop_tx: Some(stop_tx),
            done_rx,
            thread: Some(thread),
            join_timeout,
        })
    }

    /// Stop sampling and take the buffer.
    ///
    /// Returns an empty buffer if the thread does not hand it back within the
    /// join timeout; the thread is then left to finish on its own.
    pub fn stop(mut self) -> Vec<CpuSample> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Vec<CpuSample> {
        let Some(stop_tx) = self.stop_tx.take() else {
            return Vec::new();
        };
        let _ = stop_tx.send(());

        match self.done_rx.recv_timeout(self.join_timeout) {
            Ok(samples) => {
                if let Some(thread) = self.thread.take() {
                    let _ = thread.join();
                }
                debug!(target: "virtbench::sampler", samples = samples.len(), "CPU sampler stopped");
                samples
            }
            Err(_) => {
                warn!(
                    target: "virtbench::sampler",
                    timeout_ms = self.join_timeout.as_millis() as u64,
                    "CPU sampler did not stop in time, discarding its samples"
                );
                self.thread.take();
                Vec::new()
            }
        }
    }
}

impl Drop for SamplerHandle {
    fn drop(&mut self) {
        if self.stop_tx.is_some() {
            let discarded = self.shutdown();
            debug!(target: "virtbench::sampler", discarded = discarded.len(), "CPU sampler dropped");
        }
    }
}

fn sample_loop(
    mut sensor: Box<dyn CpuSensor>,
    interval: Duration,
    stop_rx: &Receiver<()>,
) -> Vec<CpuSample> {
    let mut samples = Vec::new();
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => samples.push(CpuSample {
                timestamp: Utc::now(),
                cpu_percent: sensor.cpu_percent(),
            }),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    samples
}
