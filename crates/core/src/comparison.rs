//! Two-slot comparison arithmetic.
//!
//! Every consumer (table report, detailed report, chart) compares slot 0
//! (the subject, virtio) against slot 1 (the baseline, emulated). The
//! arithmetic itself is keyed by [`MetricKind`], so each metric carries its
//! own direction instead of each consumer repeating the formula.
//!
//! Improvement is positive when the subject is favorable:
//! - higher-is-better: `(subject - baseline) / baseline * 100`
//! - lower-is-better:  `(baseline - subject) / baseline * 100`
//!
//! A zero baseline yields `0.0`.

use crate::error::{Error, Result};
use crate::metrics::MetricRecord;

/// Number of records a comparison consumes.
pub const REQUIRED_RECORDS: usize = 2;

/// Which way a metric improves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Throughput-like metrics
    HigherIsBetter,
    /// Latency and overhead metrics
    LowerIsBetter,
}

/// The five compared metrics, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// `boot_time`
    BootTime,
    /// `disk_read_speed`
    DiskRead,
    /// `disk_write_speed`
    DiskWrite,
    /// `network_throughput`
    NetworkThroughput,
    /// `cpu_overhead`
    CpuOverhead,
}

impl MetricKind {
    /// All metrics in report order.
    pub const ALL: [MetricKind; 5] = [
        MetricKind::BootTime,
        MetricKind::DiskRead,
        MetricKind::DiskWrite,
        MetricKind::NetworkThroughput,
        MetricKind::CpuOverhead,
    ];

    /// Direction of improvement.
    pub fn direction(self) -> Direction {
        match self {
            MetricKind::BootTime | MetricKind::CpuOverhead => Direction::LowerIsBetter,
            MetricKind::DiskRead | MetricKind::DiskWrite | MetricKind::NetworkThroughput => {
                Direction::HigherIsBetter
            }
        }
    }

    /// Field name in the results document.
    pub fn field_name(self) -> &'static str {
        match self {
            MetricKind::BootTime => "boot_time",
            MetricKind::DiskRead => "disk_read_speed",
            MetricKind::DiskWrite => "disk_write_speed",
            MetricKind::NetworkThroughput => "network_throughput",
            MetricKind::CpuOverhead => "cpu_overhead",
        }
    }

    /// Table row label, unit included.
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::BootTime => "Boot time (s)",
            MetricKind::DiskRead => "Disk read (MB/s)",
            MetricKind::DiskWrite => "Disk write (MB/s)",
            MetricKind::NetworkThroughput => "Network throughput (Mbps)",
            MetricKind::CpuOverhead => "CPU overhead (%)",
        }
    }

    /// One-word label for compact charts.
    pub fn short_label(self) -> &'static str {
        match self {
            MetricKind::BootTime => "Boot",
            MetricKind::DiskRead => "Read",
            MetricKind::DiskWrite => "Write",
            MetricKind::NetworkThroughput => "Network",
            MetricKind::CpuOverhead => "CPU",
        }
    }

    /// Unit of the raw value.
    pub fn unit(self) -> &'static str {
        match self {
            MetricKind::BootTime => "s",
            MetricKind::DiskRead | MetricKind::DiskWrite => "MB/s",
            MetricKind::NetworkThroughput => "Mbps",
            MetricKind::CpuOverhead => "%",
        }
    }
}

/// Signed percent improvement of `subject` over `baseline`.
pub fn percent_improvement(direction: Direction, subject: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        return 0.0;
    }
    match direction {
        Direction::HigherIsBetter => (subject - baseline) / baseline * 100.0,
        Direction::LowerIsBetter => (baseline - subject) / baseline * 100.0,
    }
}

/// `subject / baseline`, or `0.0` for a zero baseline.
pub fn ratio(subject: f64, baseline: f64) -> f64 {
    if baseline == 0.0 {
        0.0
    } else {
        subject / baseline
    }
}

/// Check that exactly [`REQUIRED_RECORDS`] records are present.
pub fn check_record_count(found: usize) -> Result<()> {
    if found < REQUIRED_RECORDS {
        Err(Error::InsufficientData {
            required: REQUIRED_RECORDS,
            found,
        })
    } else if found > REQUIRED_RECORDS {
        Err(Error::TooManyRecords {
            required: REQUIRED_RECORDS,
            found,
        })
    } else {
        Ok(())
    }
}

/// Subject (slot 0) against baseline (slot 1).
#[derive(Debug, Clone, Copy)]
pub struct Comparison<'a> {
    subject: &'a MetricRecord,
    baseline: &'a MetricRecord,
}

impl<'a> Comparison<'a> {
    /// Build from a two-element record list.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientData` for fewer than two records and
    /// `TooManyRecords` for more.
    pub fn from_records(records: &'a [MetricRecord]) -> Result<Self> {
        check_record_count(records.len())?;
        Ok(Self {
            subject: &records[0],
            baseline: &records[1],
        })
    }

    /// `(subject, baseline)` values of one metric.
    pub fn values(&self, kind: MetricKind) -> (f64, f64) {
        (self.subject.value(kind), self.baseline.value(kind))
    }

    /// Signed improvement of the subject for one metric.
    pub fn improvement(&self, kind: MetricKind) -> f64 {
        let (subject, baseline) = self.values(kind);
        percent_improvement(kind.direction(), subject, baseline)
    }

    /// Improvements for every metric in report order.
    pub fn improvements(&self) -> [(MetricKind, f64); 5] {
        MetricKind::ALL.map(|kind| (kind, self.improvement(kind)))
    }

    /// `subject / baseline` for one metric.
    pub fn ratio(&self, kind: MetricKind) -> f64 {
        let (subject, baseline) = self.values(kind);
        ratio(subject, baseline)
    }

    /// Mean of the read and write improvements.
    pub fn average_disk_improvement(&self) -> f64 {
        (self.improvement(MetricKind::DiskRead) + self.improvement(MetricKind::DiskWrite)) / 2.0
    }
}
