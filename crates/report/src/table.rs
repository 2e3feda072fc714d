//! Fixed-width comparison table printed after a suite run.

use std::fmt::Write as _;
use std::path::Path;
use virtbench_core::{Comparison, MetricKind, MetricRecord};

use crate::error::Result;
use crate::write_artifact;

/// Width of the banner and rules.
pub const TABLE_WIDTH: usize = 70;

/// Render the comparison table for `[virtio, emulated]` records.
///
/// # Errors
///
/// Returns the insufficient-data error unless exactly two records are given.
pub fn render_comparison_report(records: &[MetricRecord]) -> Result<String> {
    let cmp = Comparison::from_records(records)?;
    let rule = "=".repeat(TABLE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "COMPARISON REPORT: I/O VIRTUALIZATION");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<30} {:>15} {:>15} {:>10}",
        "Metric", "Virtio", "Emulated", "Improvement"
    );
    let _ = writeln!(out, "{}", "-".repeat(TABLE_WIDTH));

    for kind in MetricKind::ALL {
        let _ = writeln!(out, "{}", table_row(&cmp, kind));
    }

    let _ = writeln!(out, "{}", "-".repeat(TABLE_WIDTH));
    let _ = writeln!(out);
    let _ = writeln!(out, "CONCLUSIONS:");
    let _ = writeln!(
        out,
        "• Virtio reduces boot time by ~{:.1}%",
        cmp.improvement(MetricKind::BootTime)
    );
    let _ = writeln!(
        out,
        "• Improves disk performance by ~{:.1}%",
        cmp.average_disk_improvement()
    );
    let _ = writeln!(
        out,
        "• Increases network throughput by ~{:.1}%",
        cmp.improvement(MetricKind::NetworkThroughput)
    );
    let _ = writeln!(
        out,
        "• Reduces CPU overhead by ~{:.1}%",
        cmp.improvement(MetricKind::CpuOverhead)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", rule);

    Ok(out)
}

/// Render and write the table to `path`, returning the text.
pub fn write_comparison_report(records: &[MetricRecord], path: &Path) -> Result<String> {
    let text = render_comparison_report(records)?;
    write_artifact(path, &text)?;
    Ok(text)
}

fn table_row(cmp: &Comparison<'_>, kind: MetricKind) -> String {
    let (virtio, emulated) = cmp.values(kind);
    let improvement = cmp.improvement(kind);
    match kind {
        MetricKind::BootTime => format!(
            "{:<30} {:>15.3} {:>15.3} {:>9.1}%",
            kind.label(),
            virtio,
            emulated,
            improvement
        ),
        _ => format!(
            "{:<30} {:>15.2} {:>15.2} {:>9.1}%",
            kind.label(),
            virtio,
            emulated,
            improvement
        ),
    }
}
