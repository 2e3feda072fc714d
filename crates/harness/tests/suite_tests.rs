//! Integration tests for the comparison suite
//!
//! These tests drive the public harness API end to end:
//! - profile ordering and skipping on disk image failure
//! - placeholder cleanup whatever happened to a profile
//! - session-scoped CPU sample buffers

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use virtbench_core::{BenchConfig, DiskBus, TimingConfig};
use virtbench_harness::{
    CancellationToken, ComparisonSuite, CpuSensor, DiskImageProvisioner, HarnessError, ImageKind,
    Result, SessionRunner,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Writes a small file, but fails for paths containing `fail_on`.
struct SelectiveProvisioner {
    fail_on: Option<&'static str>,
}

impl DiskImageProvisioner for SelectiveProvisioner {
    fn provision(&self, path: &Path) -> Result<ImageKind> {
        std::fs::write(path, vec![0u8; 256]).unwrap();
        match self.fail_on {
            Some(name) if path.to_string_lossy().contains(name) => {
                Err(HarnessError::ImageToolFailed {
                    tool: "qemu-img".to_string(),
                    path: path.to_path_buf(),
                    stderr: "simulated failure".to_string(),
                })
            }
            _ => Ok(ImageKind::Qcow2),
        }
    }
}

fn quick_config(dir: &TempDir) -> BenchConfig {
    BenchConfig {
        work_dir: dir.path().to_path_buf(),
        timings: TimingConfig {
            time_scale: 0.02,
            sample_interval_ms: 2,
            ..TimingConfig::default()
        },
        ..BenchConfig::default()
    }
}

fn build_suite(dir: &TempDir, fail_on: Option<&'static str>) -> ComparisonSuite {
    let config = quick_config(dir);
    let cancel = CancellationToken::new();

    let sessions = Arc::new(AtomicUsize::new(0));
    let runner = SessionRunner::new(config.timings.clone(), cancel.clone()).with_sensor(move || {
        // 30% for the first session, 70% for the second
        let reading = 30.0 + 40.0 * sessions.fetch_add(1, Ordering::SeqCst) as f32;
        Box::new(move || reading) as Box<dyn CpuSensor>
    });

    ComparisonSuite::new(&config, cancel)
        .with_provisioner(SelectiveProvisioner { fail_on })
        .with_runner(runner)
}

fn leftover_files(dir: &TempDir) -> usize {
    std::fs::read_dir(dir.path()).unwrap().count()
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_records_in_virtio_emulated_order() {
    let dir = TempDir::new().unwrap();
    let records = build_suite(&dir, None).run().unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].disk_type, DiskBus::Virtio);
    assert_eq!(records[1].disk_type, DiskBus::Ide);
    assert_eq!(records[1].network_type.as_str(), "e1000");
}

#[test]
fn test_emulated_is_slower_to_boot() {
    let dir = TempDir::new().unwrap();
    let records = build_suite(&dir, None).run().unwrap();
    assert!(records[0].boot_time < records[1].boot_time);
    assert!(records[0].disk_read_speed > records[1].disk_read_speed);
    assert!(records[0].network_throughput > records[1].network_throughput);
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_failed_disk_image_skips_profile() {
    let dir = TempDir::new().unwrap();
    let records = build_suite(&dir, Some("virtio")).run().unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].config_name, "emulated");
}

#[test]
fn test_all_profiles_failing_yields_empty_list() {
    let dir = TempDir::new().unwrap();
    let records = build_suite(&dir, Some("_disk.img")).run().unwrap();
    assert!(records.is_empty());
}

// ============================================================================
// Cleanup invariant
// ============================================================================

#[test]
fn test_no_placeholders_after_successful_run() {
    let dir = TempDir::new().unwrap();
    build_suite(&dir, None).run().unwrap();
    assert_eq!(leftover_files(&dir), 0);
}

#[test]
fn test_no_placeholders_after_partial_failure() {
    let dir = TempDir::new().unwrap();
    build_suite(&dir, Some("emulated")).run().unwrap();
    assert_eq!(leftover_files(&dir), 0);
}

#[test]
fn test_no_placeholders_after_total_failure() {
    let dir = TempDir::new().unwrap();
    build_suite(&dir, Some("_disk.img")).run().unwrap();
    assert_eq!(leftover_files(&dir), 0);
}

// ============================================================================
// Sampler lifecycle
// ============================================================================

#[test]
fn test_cpu_overhead_not_carried_between_sessions() {
    let dir = TempDir::new().unwrap();
    let records = build_suite(&dir, None).run().unwrap();

    assert_eq!(records[0].cpu_overhead, 30.0);
    assert_eq!(records[1].cpu_overhead, 70.0);
}
