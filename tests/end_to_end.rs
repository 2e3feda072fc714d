//! End-to-end tests: suite run, persistence, and every report consumer
//!
//! Runs the real suite with no simulated delays and a fake disk image tool,
//! then feeds the saved document through the table, detailed report and
//! chart the way `virtbench run` followed by `virtbench analyze` would.

use std::path::Path;

use tempfile::TempDir;
use virtbench::{
    load_results, render_comparison_report, render_detailed_report, save_results,
    write_comparison_report, write_detailed_report, BenchConfig, CancellationToken, ChartRenderer,
    ComparisonSuite, CpuSensor, DeviceProfile, DiskBus, DiskImageProvisioner, HarnessError,
    ImageKind, MetricKind, MetricRecord, SessionRunner, TimingConfig,
};

// ============================================================================
// Helper Functions
// ============================================================================

struct TouchProvisioner;

impl DiskImageProvisioner for TouchProvisioner {
    fn provision(&self, path: &Path) -> Result<ImageKind, HarnessError> {
        std::fs::write(path, b"placeholder").map_err(|source| HarnessError::ImageIo {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(ImageKind::ZeroFilled)
    }
}

fn instant_config(dir: &TempDir) -> BenchConfig {
    let work_dir = dir.path().join("images");
    std::fs::create_dir(&work_dir).unwrap();
    BenchConfig {
        results_path: dir.path().join("results.json"),
        report_path: dir.path().join("comparison_report.txt"),
        detailed_report_path: dir.path().join("detailed_analysis.txt"),
        chart_path: dir.path().join("virtualization_comparison.svg"),
        work_dir,
        timings: TimingConfig::instant(),
        ..BenchConfig::default()
    }
}

fn run_suite(config: &BenchConfig) -> Vec<MetricRecord> {
    let cancel = CancellationToken::new();
    let runner = SessionRunner::new(config.timings.clone(), cancel.clone())
        .with_sensor(|| Box::new(|| 12.5f32) as Box<dyn CpuSensor>);
    ComparisonSuite::new(config, cancel)
        .with_provisioner(TouchProvisioner)
        .with_runner(runner)
        .run()
        .unwrap()
}

fn fixed_pair() -> Vec<MetricRecord> {
    let dir = Path::new("/tmp");
    let mut virtio = MetricRecord::for_profile(&DeviceProfile::virtio(dir), "t0");
    virtio.boot_time = 2.6;
    virtio.disk_read_speed = 450.0;
    virtio.disk_write_speed = 380.0;
    virtio.network_throughput = 9400.0;
    virtio.cpu_overhead = 10.0;

    let mut emulated = MetricRecord::for_profile(&DeviceProfile::emulated(dir), "t1");
    emulated.boot_time = 4.3;
    emulated.disk_read_speed = 180.0;
    emulated.disk_write_speed = 140.0;
    emulated.network_throughput = 920.0;
    emulated.cpu_overhead = 20.0;

    vec![virtio, emulated]
}

// ============================================================================
// Run then analyze
// ============================================================================

#[test]
fn test_run_save_load_analyze() {
    let dir = TempDir::new().unwrap();
    let config = instant_config(&dir);

    let records = run_suite(&config);
    assert_eq!(records.len(), 2);

    write_comparison_report(&records, &config.report_path).unwrap();
    save_results(&records, &config.results_path).unwrap();

    let document = load_results(&config.results_path).unwrap();
    assert_eq!(document.metrics, records);
    assert!(document.is_conventionally_ordered());
    assert_eq!(
        document.record_for(DiskBus::Ide).unwrap().config_name,
        "emulated"
    );

    write_detailed_report(&document.metrics, &config.detailed_report_path).unwrap();
    ChartRenderer::new()
        .render(&document.metrics, &config.chart_path)
        .unwrap();

    assert!(config.report_path.exists());
    assert!(config.detailed_report_path.exists());
    assert!(config.chart_path.exists());
    assert_eq!(std::fs::read_dir(&config.work_dir).unwrap().count(), 0);
}

#[test]
fn test_synthetic_figures_favor_virtio() {
    let dir = TempDir::new().unwrap();
    let records = run_suite(&instant_config(&dir));

    assert!(records[0].disk_read_speed > records[1].disk_read_speed);
    assert!(records[0].disk_write_speed > records[1].disk_write_speed);
    assert!(records[0].network_throughput > records[1].network_throughput);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_round_trip_preserves_values_and_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results.json");

    let mut records = fixed_pair();
    records.swap(0, 1);
    save_results(&records, &path).unwrap();

    let loaded = load_results(&path).unwrap();
    assert_eq!(loaded.metrics, records);
    assert!(!loaded.is_conventionally_ordered());
}

// ============================================================================
// Insufficient data
// ============================================================================

#[test]
fn test_every_consumer_rejects_short_input() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("table.txt");
    let detailed = dir.path().join("detailed.txt");
    let chart = dir.path().join("chart.svg");

    for n in 0..2 {
        let records = &fixed_pair()[..n];
        assert!(render_comparison_report(records)
            .unwrap_err()
            .is_insufficient_data());
        assert!(write_comparison_report(records, &table)
            .unwrap_err()
            .is_insufficient_data());
        assert!(write_detailed_report(records, &detailed)
            .unwrap_err()
            .is_insufficient_data());
        assert!(ChartRenderer::new()
            .render(records, &chart)
            .unwrap_err()
            .is_insufficient_data());
    }

    assert!(!table.exists());
    assert!(!detailed.exists());
    assert!(!chart.exists());
}

// ============================================================================
// Order swap
// ============================================================================

#[test]
fn test_swapped_records_flip_report_signs() {
    let mut swapped = fixed_pair();
    swapped.swap(0, 1);

    let report = render_comparison_report(&swapped).unwrap();
    let read = report
        .lines()
        .find(|l| l.starts_with(MetricKind::DiskRead.label()))
        .unwrap();
    assert!(read.ends_with("-60.0%"));

    let detailed = render_detailed_report(&swapped).unwrap();
    assert!(detailed.contains("• Improvement: -60.0%"));
}

#[test]
fn test_literal_table_values() {
    let report = render_comparison_report(&fixed_pair()).unwrap();
    assert!(report.contains("39.5%"));
    assert!(report.contains("150.0%"));
}
