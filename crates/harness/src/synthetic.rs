//! Synthetic performance model.
//!
//! Boot delay is reproducible per profile name: the jitter bucket comes from
//! a stable hash of the name. Disk and network figures draw fresh uniform
//! variance on every call.

use rand::Rng;
use std::time::Duration;
use virtbench_core::{DeviceProfile, ThroughputBaseline};
use xxhash_rust::xxh3::xxh3_64;

/// Number of jitter buckets a name hashes into.
pub const JITTER_BUCKETS: u64 = 10;

/// Disk benchmark direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskOperation {
    /// Sequential read
    Read,
    /// Sequential write
    Write,
}

impl DiskOperation {
    /// Baseline for this operation on the profile's disk bus.
    pub fn baseline(self, profile: &DeviceProfile) -> ThroughputBaseline {
        match self {
            DiskOperation::Read => profile.read_baseline(),
            DiskOperation::Write => profile.write_baseline(),
        }
    }

    /// Lowercase name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            DiskOperation::Read => "read",
            DiskOperation::Write => "write",
        }
    }
}

/// Round to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Jitter bucket in `0..JITTER_BUCKETS` for a profile name.
pub fn jitter_bucket(name: &str) -> u64 {
    xxh3_64(name.as_bytes()) % JITTER_BUCKETS
}

/// Unscaled boot delay for a profile.
pub fn boot_delay(profile: &DeviceProfile) -> Duration {
    let baseline = profile.boot_baseline();
    let jitter =
        baseline.max_jitter_secs * jitter_bucket(&profile.name) as f64 / JITTER_BUCKETS as f64;
    Duration::from_secs_f64(baseline.base_secs + jitter)
}

/// `nominal * (1 + uniform[-variance, +variance])`, rounded to 2 decimals.
pub fn sample_throughput<R: Rng>(baseline: &ThroughputBaseline, rng: &mut R) -> f64 {
    let offset = if baseline.variance > 0.0 {
        rng.gen_range(-baseline.variance..=baseline.variance)
    } else {
        0.0
    };
    round_to(baseline.nominal * (1.0 + offset), 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::Path;

    const EPS: f64 = 1e-9;

    fn assert_within(baseline: &ThroughputBaseline, rng: &mut StdRng) {
        for _ in 0..1000 {
            let v = sample_throughput(baseline, rng);
            assert!(
                v >= baseline.lower_bound() - EPS && v <= baseline.upper_bound() + EPS,
                "{} outside [{}, {}]",
                v,
                baseline.lower_bound(),
                baseline.upper_bound()
            );
        }
    }

    #[test]
    fn disk_and_network_samples_stay_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        for profile in DeviceProfile::standard_pair(Path::new(".")) {
            assert_within(&DiskOperation::Read.baseline(&profile), &mut rng);
            assert_within(&DiskOperation::Write.baseline(&profile), &mut rng);
            assert_within(&profile.network_baseline(), &mut rng);
        }
    }

    #[test]
    fn samples_actually_vary() {
        let mut rng = StdRng::seed_from_u64(1);
        let baseline = ThroughputBaseline::new(450.0, 0.15);
        let first = sample_throughput(&baseline, &mut rng);
        assert!((0..50).any(|_| sample_throughput(&baseline, &mut rng) != first));
    }

    #[test]
    fn zero_variance_is_nominal() {
        let mut rng = StdRng::seed_from_u64(3);
        let baseline = ThroughputBaseline::new(123.456, 0.0);
        assert_eq!(sample_throughput(&baseline, &mut rng), 123.46);
    }

    #[test]
    fn boot_delay_is_stable_per_name() {
        let dir = Path::new(".");
        let a = boot_delay(&DeviceProfile::virtio(dir));
        let b = boot_delay(&DeviceProfile::virtio(Path::new("/elsewhere")));
        assert_eq!(a, b);
    }

    #[test]
    fn boot_delay_within_jitter_range() {
        let dir = Path::new(".");
        let virtio = boot_delay(&DeviceProfile::virtio(dir)).as_secs_f64();
        let emulated = boot_delay(&DeviceProfile::emulated(dir)).as_secs_f64();
        assert!((2.5..2.8 + EPS).contains(&virtio), "{}", virtio);
        assert!((4.2..4.7 + EPS).contains(&emulated), "{}", emulated);
    }

    #[test]
    fn jitter_bucket_in_range() {
        for name in ["virtio", "emulated", "", "vm_virtio", "a-much-longer-profile-name"] {
            assert!(jitter_bucket(name) < JITTER_BUCKETS);
        }
    }

    #[test]
    fn rounding() {
        assert_eq!(round_to(2.61849, 3), 2.618);
        assert_eq!(round_to(451.255001, 2), 451.26);
    }
}
