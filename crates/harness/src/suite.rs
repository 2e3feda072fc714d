//! Two-profile comparison suite.
//!
//! Profiles run strictly one after another. A profile whose disk image or
//! session fails is logged and skipped; only an interruption stops the
//! suite. Each profile's placeholder image is removed before the next
//! profile starts, whatever happened to the session.

use tracing::{error, info, warn};
use virtbench_core::{BenchConfig, DeviceProfile, MetricRecord, TimingConfig};

use crate::cancel::CancellationToken;
use crate::disk_image::{DiskImageProvisioner, PlaceholderImage, QemuImgProvisioner};
use crate::error::{HarnessError, Result};
use crate::session::SessionRunner;

/// Runs a session per profile and collects the records in profile order.
pub struct ComparisonSuite {
    profiles: Vec<DeviceProfile>,
    runner: SessionRunner,
    provisioner: Box<dyn DiskImageProvisioner>,
    timings: TimingConfig,
    cancel: CancellationToken,
}

impl ComparisonSuite {
    /// The standard virtio/emulated suite described by `config`.
    pub fn new(config: &BenchConfig, cancel: CancellationToken) -> Self {
        Self {
            profiles: DeviceProfile::standard_pair(&config.work_dir).to_vec(),
            runner: SessionRunner::new(config.timings.clone(), cancel.clone()),
            provisioner: Box::new(QemuImgProvisioner::new(&config.disk_image)),
            timings: config.timings.clone(),
            cancel,
        }
    }

    /// Replace the disk image provisioner.
    pub fn with_provisioner(mut self, provisioner: impl DiskImageProvisioner + 'static) -> Self {
        self.provisioner = Box::new(provisioner);
        self
    }

    /// Replace the session runner.
    pub fn with_runner(mut self, runner: SessionRunner) -> Self {
        self.runner = runner;
        self
    }

    /// Profiles in run order.
    pub fn profiles(&self) -> &[DeviceProfile] {
        &self.profiles
    }

    /// Run every profile.
    ///
    /// Returns between zero and `profiles().len()` records, in profile order.
    ///
    /// # Errors
    ///
    /// Only [`HarnessError::Interrupted`]; per-profile failures are skipped.
    pub fn run(&self) -> Result<Vec<MetricRecord>> {
        let mut records = Vec::with_capacity(self.profiles.len());

        for (i, profile) in self.profiles.iter().enumerate() {
            self.cancel.check()?;

            if let Some(record) = self.run_profile(profile)? {
                records.push(record);
            }

            if i + 1 < self.profiles.len() {
                self.cancel.pause(self.timings.inter_profile_pause())?;
            }
        }

        info!(
            target: "virtbench::suite",
            completed = records.len(),
            profiles = self.profiles.len(),
            "Suite finished"
        );
        Ok(records)
    }

    /// `Ok(None)` when the profile was skipped.
    fn run_profile(&self, profile: &DeviceProfile) -> Result<Option<MetricRecord>> {
        let image = match PlaceholderImage::provision(self.provisioner.as_ref(), &profile.disk_path)
        {
            Ok(image) => image,
            Err(e) => {
                error!(
                    target: "virtbench::suite",
                    profile = %profile.name,
                    error = %e,
                    "Could not create disk image, skipping profile"
                );
                return Ok(None);
            }
        };

        let outcome = self.runner.run_session(profile);
        // Placeholder goes before the next profile's is created
        drop(image);

        match outcome {
            Ok(record) => Ok(Some(record)),
            Err(HarnessError::Interrupted) => {
                warn!(target: "virtbench::suite", profile = %profile.name, "Session interrupted");
                Err(HarnessError::Interrupted)
            }
            Err(e) => {
                error!(
                    target: "virtbench::suite",
                    profile = %profile.name,
                    error = %e,
                    "Session failed, skipping profile"
                );
                Ok(None)
            }
        }
    }
}
