//! Device profiles and their synthetic baselines.
//!
//! A profile pairs a disk bus with a NIC model. The baselines below are the
//! design contract for the synthetic benchmark, not measured hardware:
//! disk and boot figures follow the disk bus, network figures follow the NIC.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Memory size shown for every profile.
pub const DEFAULT_MEMORY: &str = "1024M";
/// vCPU count shown for every profile.
pub const DEFAULT_CPU_COUNT: u32 = 2;

/// Disk controller presented to the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiskBus {
    /// Paravirtualized virtio-blk
    Virtio,
    /// Fully emulated IDE controller
    Ide,
}

/// Network card presented to the guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NicModel {
    /// Paravirtualized virtio-net
    Virtio,
    /// Emulated Intel e1000
    E1000,
}

/// Nominal throughput and the symmetric variance band around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThroughputBaseline {
    /// Nominal value (MB/s for disk, Mbps for network)
    pub nominal: f64,
    /// Relative variance, e.g. `0.15` for ±15 %
    pub variance: f64,
}

impl ThroughputBaseline {
    /// Create a baseline.
    pub const fn new(nominal: f64, variance: f64) -> Self {
        Self { nominal, variance }
    }

    /// Smallest value the synthetic model may produce.
    pub fn lower_bound(&self) -> f64 {
        self.nominal * (1.0 - self.variance)
    }

    /// Largest value the synthetic model may produce.
    pub fn upper_bound(&self) -> f64 {
        self.nominal * (1.0 + self.variance)
    }
}

/// Boot delay: a fixed base plus a name-derived jitter of at most `max_jitter_secs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootBaseline {
    /// Base delay in seconds
    pub base_secs: f64,
    /// Upper bound of the jitter in seconds
    pub max_jitter_secs: f64,
}

impl DiskBus {
    /// Wire name, as stored in the results document.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiskBus::Virtio => "virtio",
            DiskBus::Ide => "ide",
        }
    }

    /// Boot delay baseline for guests using this bus.
    pub fn boot_baseline(&self) -> BootBaseline {
        match self {
            DiskBus::Virtio => BootBaseline {
                base_secs: 2.5,
                max_jitter_secs: 0.3,
            },
            DiskBus::Ide => BootBaseline {
                base_secs: 4.2,
                max_jitter_secs: 0.5,
            },
        }
    }

    /// Sequential read baseline.
    pub fn read_baseline(&self) -> ThroughputBaseline {
        match self {
            DiskBus::Virtio => ThroughputBaseline::new(450.0, 0.15),
            DiskBus::Ide => ThroughputBaseline::new(180.0, 0.25),
        }
    }

    /// Sequential write baseline.
    pub fn write_baseline(&self) -> ThroughputBaseline {
        match self {
            DiskBus::Virtio => ThroughputBaseline::new(380.0, 0.15),
            DiskBus::Ide => ThroughputBaseline::new(140.0, 0.25),
        }
    }
}

impl NicModel {
    /// Wire name, as stored in the results document.
    pub fn as_str(&self) -> &'static str {
        match self {
            NicModel::Virtio => "virtio",
            NicModel::E1000 => "e1000",
        }
    }

    /// Network throughput baseline.
    pub fn throughput_baseline(&self) -> ThroughputBaseline {
        match self {
            NicModel::Virtio => ThroughputBaseline::new(9400.0, 0.10),
            NicModel::E1000 => ThroughputBaseline::new(920.0, 0.20),
        }
    }
}

impl fmt::Display for DiskBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for NicModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One VM configuration under test.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProfile {
    /// Profile identifier, also the source of the boot jitter
    pub name: String,
    /// Disk controller
    pub disk_type: DiskBus,
    /// Network card
    pub network_type: NicModel,
    /// Guest memory (display only)
    pub memory: String,
    /// Guest vCPUs (display only)
    pub cpu_count: u32,
    /// Location of this profile's placeholder disk image
    pub disk_path: PathBuf,
}

impl DeviceProfile {
    /// Name of the paravirtualized profile.
    pub const VIRTIO: &'static str = "virtio";
    /// Name of the emulated profile.
    pub const EMULATED: &'static str = "emulated";

    /// Create a profile whose placeholder image lives in `work_dir`.
    pub fn new(
        name: impl Into<String>,
        disk_type: DiskBus,
        network_type: NicModel,
        work_dir: &Path,
    ) -> Self {
        let name = name.into();
        let disk_path = work_dir.join(format!("{}_disk.img", name));
        Self {
            name,
            disk_type,
            network_type,
            memory: DEFAULT_MEMORY.to_string(),
            cpu_count: DEFAULT_CPU_COUNT,
            disk_path,
        }
    }

    /// virtio disk + virtio-net.
    pub fn virtio(work_dir: &Path) -> Self {
        Self::new(Self::VIRTIO, DiskBus::Virtio, NicModel::Virtio, work_dir)
    }

    /// IDE disk + e1000.
    pub fn emulated(work_dir: &Path) -> Self {
        Self::new(Self::EMULATED, DiskBus::Ide, NicModel::E1000, work_dir)
    }

    /// The two profiles a comparison runs, in report order.
    pub fn standard_pair(work_dir: &Path) -> [DeviceProfile; 2] {
        [Self::virtio(work_dir), Self::emulated(work_dir)]
    }

    /// Boot delay baseline (follows the disk bus).
    pub fn boot_baseline(&self) -> BootBaseline {
        self.disk_type.boot_baseline()
    }

    /// Disk read baseline.
    pub fn read_baseline(&self) -> ThroughputBaseline {
        self.disk_type.read_baseline()
    }

    /// Disk write baseline.
    pub fn write_baseline(&self) -> ThroughputBaseline {
        self.disk_type.write_baseline()
    }

    /// Network baseline (follows the NIC model).
    pub fn network_baseline(&self) -> ThroughputBaseline {
        self.network_type.throughput_baseline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pair_is_virtio_then_emulated() {
        let dir = Path::new("/tmp/vb");
        let [virtio, emulated] = DeviceProfile::standard_pair(dir);
        assert_eq!(virtio.name, "virtio");
        assert_eq!(virtio.disk_type, DiskBus::Virtio);
        assert_eq!(virtio.network_type, NicModel::Virtio);
        assert_eq!(emulated.name, "emulated");
        assert_eq!(emulated.disk_type, DiskBus::Ide);
        assert_eq!(emulated.network_type, NicModel::E1000);
    }

    #[test]
    fn disk_paths_are_unique_per_profile() {
        let dir = Path::new("/tmp/vb");
        let [virtio, emulated] = DeviceProfile::standard_pair(dir);
        assert_ne!(virtio.disk_path, emulated.disk_path);
        assert_eq!(virtio.disk_path, dir.join("virtio_disk.img"));
    }

    #[test]
    fn baselines_match_contract() {
        let dir = Path::new(".");
        let virtio = DeviceProfile::virtio(dir);
        let emulated = DeviceProfile::emulated(dir);

        assert_eq!(virtio.read_baseline(), ThroughputBaseline::new(450.0, 0.15));
        assert_eq!(virtio.write_baseline(), ThroughputBaseline::new(380.0, 0.15));
        assert_eq!(virtio.network_baseline(), ThroughputBaseline::new(9400.0, 0.10));
        assert_eq!(emulated.read_baseline(), ThroughputBaseline::new(180.0, 0.25));
        assert_eq!(emulated.write_baseline(), ThroughputBaseline::new(140.0, 0.25));
        assert_eq!(emulated.network_baseline(), ThroughputBaseline::new(920.0, 0.20));

        assert_eq!(virtio.boot_baseline().base_secs, 2.5);
        assert_eq!(emulated.boot_baseline().max_jitter_secs, 0.5);
    }

    #[test]
    fn bounds_bracket_nominal() {
        let b = ThroughputBaseline::new(450.0, 0.15);
        assert!((b.lower_bound() - 382.5).abs() < 1e-9);
        assert!((b.upper_bound() - 517.5).abs() < 1e-9);
    }

    #[test]
    fn wire_names() {
        assert_eq!(DiskBus::Ide.to_string(), "ide");
        assert_eq!(NicModel::E1000.to_string(), "e1000");
        assert_eq!(serde_json::to_string(&NicModel::E1000).unwrap(), "\"e1000\"");
        let bus: DiskBus = serde_json::from_str("\"virtio\"").unwrap();
        assert_eq!(bus, DiskBus::Virtio);
    }
}
