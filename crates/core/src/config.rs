//! Harness configuration via `virtbench.toml`
//!
//! Every field has a default, so an empty or missing file yields the stock
//! configuration. Command-line flags override what the file says.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::profile::DiskBus;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "virtbench.toml";

/// Longest single simulated delay a config may ask for.
pub const MAX_SCALED_PHASE: Duration = Duration::from_secs(24 * 60 * 60);

/// Placeholder disk image settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiskImageConfig {
    /// External image tool invoked first
    #[serde(default = "default_tool")]
    pub tool: String,
    /// Size argument handed to the tool (e.g. "2G")
    #[serde(default = "default_image_size")]
    pub size: String,
    /// Size of the zero-filled fallback written when the tool is missing
    #[serde(default = "default_fallback_bytes")]
    pub fallback_bytes: u64,
}

fn default_tool() -> String {
    "qemu-img".to_string()
}

fn default_image_size() -> String {
    "2G".to_string()
}

fn default_fallback_bytes() -> u64 {
    100 * 1024 * 1024
}

impl Default for DiskImageConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            size: default_image_size(),
            fallback_bytes: default_fallback_bytes(),
        }
    }
}

/// Phase durations of a simulated session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingConfig {
    /// Multiplier applied to every simulated delay (1.0 = real time)
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Host CPU sampling interval
    #[serde(default = "default_sample_interval_ms")]
    pub sample_interval_ms: u64,
    /// Delay before each disk throughput figure
    #[serde(default = "default_disk_phase_ms")]
    pub disk_phase_ms: u64,
    /// Delay before the network throughput figure
    #[serde(default = "default_network_phase_ms")]
    pub network_phase_ms: u64,
    /// Extra time for CPU samples to accumulate
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Pause between profiles
    #[serde(default = "default_inter_profile_pause_ms")]
    pub inter_profile_pause_ms: u64,
    /// Longest wait for the sampler to hand back its buffer
    #[serde(default = "default_sampler_join_timeout_ms")]
    pub sampler_join_timeout_ms: u64,
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_sample_interval_ms() -> u64 {
    500
}

fn default_disk_phase_ms() -> u64 {
    1500
}

fn default_network_phase_ms() -> u64 {
    1000
}

fn default_settle_ms() -> u64 {
    2000
}

fn default_inter_profile_pause_ms() -> u64 {
    1000
}

fn default_sampler_join_timeout_ms() -> u64 {
    1000
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            sample_interval_ms: default_sample_interval_ms(),
            disk_phase_ms: default_disk_phase_ms(),
            network_phase_ms: default_network_phase_ms(),
            settle_ms: default_settle_ms(),
            inter_profile_pause_ms: default_inter_profile_pause_ms(),
            sampler_join_timeout_ms: default_sampler_join_timeout_ms(),
        }
    }
}

impl TimingConfig {
    /// No simulated delays at all; sampling still runs.
    pub fn instant() -> Self {
        Self {
            time_scale: 0.0,
            sample_interval_ms: 10,
            ..Self::default()
        }
    }

    /// Apply `time_scale` to a duration, saturating at `Duration::MAX`.
    pub fn scaled(&self, d: Duration) -> Duration {
        Duration::try_from_secs_f64(d.as_secs_f64() * self.time_scale).unwrap_or(Duration::MAX)
    }

    /// Longest unscaled delay a session or suite can sleep for.
    fn longest_phase(&self) -> Duration {
        let boot = [DiskBus::Virtio, DiskBus::Ide]
            .iter()
            .map(|bus| {
                let b = bus.boot_baseline();
                Duration::from_secs_f64(b.base_secs + b.max_jitter_secs)
            })
            .max()
            .unwrap_or_default();
        [
            self.disk_phase_ms,
            self.network_phase_ms,
            self.settle_ms,
            self.inter_profile_pause_ms,
        ]
        .into_iter()
        .map(Duration::from_millis)
        .fold(boot, Duration::max)
    }

    /// Scaled disk phase.
    pub fn disk_phase(&self) -> Duration {
        self.scaled(Duration::from_millis(self.disk_phase_ms))
    }

    /// Scaled network phase.
    pub fn network_phase(&self) -> Duration {
        self.scaled(Duration::from_millis(self.network_phase_ms))
    }

    /// Scaled settle phase.
    pub fn settle(&self) -> Duration {
        self.scaled(Duration::from_millis(self.settle_ms))
    }

    /// Scaled pause between profiles.
    pub fn inter_profile_pause(&self) -> Duration {
        self.scaled(Duration::from_millis(self.inter_profile_pause_ms))
    }

    /// Sampling interval (never scaled).
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    /// Sampler hand-off timeout (never scaled).
    pub fn sampler_join_timeout(&self) -> Duration {
        Duration::from_millis(self.sampler_join_timeout_ms)
    }

    /// Reject values that would make sleeps panic or sampling spin.
    pub fn validate(&self) -> Result<()> {
        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(Error::invalid_config(format!(
                "time_scale must be a finite number >= 0, got {}",
                self.time_scale
            )));
        }
        if self.sample_interval_ms == 0 {
            return Err(Error::invalid_config("sample_interval_ms must be > 0"));
        }
        let longest = self.scaled(self.longest_phase());
        if longest > MAX_SCALED_PHASE {
            return Err(Error::invalid_config(format!(
                "time_scale {} stretches a phase to {:.0}s, limit is {}s",
                self.time_scale,
                longest.as_secs_f64(),
                MAX_SCALED_PHASE.as_secs()
            )));
        }
        Ok(())
    }
}

/// Configuration loaded from `virtbench.toml`.
///
/// # Example
///
/// ```toml
/// results_path = "results.json"
///
/// [timings]
/// time_scale = 0.1
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BenchConfig {
    /// Results document written by `run` and read by `analyze`
    #[serde(default = "default_results_path")]
    pub results_path: PathBuf,
    /// Comparison table written by `run`
    #[serde(default = "default_report_path")]
    pub report_path: PathBuf,
    /// Narrative report written by `analyze`
    #[serde(default = "default_detailed_report_path")]
    pub detailed_report_path: PathBuf,
    /// Chart written by `analyze`
    #[serde(default = "default_chart_path")]
    pub chart_path: PathBuf,
    /// Directory holding placeholder disk images
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    /// Placeholder disk image settings
    #[serde(default)]
    pub disk_image: DiskImageConfig,
    /// Session phase durations
    #[serde(default)]
    pub timings: TimingConfig,
}

fn default_results_path() -> PathBuf {
    PathBuf::from("results.json")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("comparison_report.txt")
}

fn default_detailed_report_path() -> PathBuf {
    PathBuf::from("detailed_analysis.txt")
}

fn default_chart_path() -> PathBuf {
    PathBuf::from("virtualization_comparison.svg")
}

fn default_work_dir() -> PathBuf {
    std::env::temp_dir()
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            results_path: default_results_path(),
            report_path: default_report_path(),
            detailed_report_path: default_detailed_report_path(),
            chart_path: default_chart_path(),
            work_dir: default_work_dir(),
            disk_image: DiskImageConfig::default(),
            timings: TimingConfig::default(),
        }
    }
}

impl BenchConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# virtbench configuration
#
# Output artifacts (overwritten on every run)
results_path = "results.json"
report_path = "comparison_report.txt"
detailed_report_path = "detailed_analysis.txt"
chart_path = "virtualization_comparison.svg"

# Directory for placeholder disk images (default: system temp dir)
# work_dir = "/tmp"

[disk_image]
# Tried first; when it is not installed a zero-filled file is written instead.
tool = "qemu-img"
size = "2G"
fallback_bytes = 104857600

[timings]
# Multiplier for every simulated delay. 1.0 = real time, 0.1 = quick run.
time_scale = 1.0
sample_interval_ms = 500
disk_phase_ms = 1500
network_phase_ms = 1000
settle_ms = 2000
inter_profile_pause_ms = 1000
sampler_join_timeout_ms = 1000
"#
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.timings.validate()
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BenchConfig = toml::from_str(&content).map_err(|e| {
            Error::invalid_config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(true)` when a file was created.
    pub fn write_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        std::fs::write(path, Self::default_toml())?;
        Ok(true)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::invalid_config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
