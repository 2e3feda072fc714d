//! Comparison chart.
//!
//! A 2x3 grid: one bar panel per metric (virtio vs emulated), and a sixth
//! panel with the improvement of each metric as diverging horizontal bars.
//! Rendered to SVG so no system fonts are needed.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use std::error::Error as StdError;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::info;
use virtbench_core::{Comparison, MetricKind, MetricRecord};

use crate::error::{ReportError, Result};

/// Bar color for the virtio profile.
pub const VIRTIO_COLOR: RGBColor = RGBColor(0x2e, 0xcc, 0x71);
/// Bar color for the emulated profile.
pub const EMULATED_COLOR: RGBColor = RGBColor(0xe7, 0x4c, 0x3c);
/// Improvement bar color when virtio wins.
pub const GAIN_COLOR: RGBColor = RGBColor(0x27, 0xae, 0x60);
/// Improvement bar color when virtio loses.
pub const LOSS_COLOR: RGBColor = RGBColor(0xe6, 0x7e, 0x22);

const FONT: &str = "sans-serif";

type DrawResult<T> = std::result::Result<T, Box<dyn StdError>>;

/// Renders the comparison chart to an SVG file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderer {
    /// 1500x1000 canvas.
    pub fn new() -> Self {
        Self {
            width: 1500,
            height: 1000,
        }
    }

    /// Custom canvas size in pixels.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Render `[virtio, emulated]` records to `path`.
    ///
    /// The record count is checked before anything touches the filesystem,
    /// so insufficient data leaves no file behind.
    pub fn render(&self, records: &[MetricRecord], path: &Path) -> Result<()> {
        let cmp = Comparison::from_records(records)?;
        self.draw(&cmp, path)
            .map_err(|e| ReportError::Chart(e.to_string()))?;
        info!(target: "virtbench::chart", path = %path.display(), "Chart written");
        Ok(())
    }

    fn draw(&self, cmp: &Comparison<'_>, path: &Path) -> DrawResult<()> {
        let root = SVGBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE)?;
        let root = root.titled(
            "Virtio vs Emulated Devices: Performance Comparison",
            (FONT, 32).into_font().style(FontStyle::Bold),
        )?;

        let panels = root.split_evenly((2, 3));
        for (kind, area) in MetricKind::ALL.iter().zip(panels.iter()) {
            draw_bar_panel(area, cmp, *kind)?;
        }
        if let Some(area) = panels.get(MetricKind::ALL.len()) {
            draw_improvement_panel(area, cmp)?;
        }

        root.present()?;
        Ok(())
    }
}

fn panel_title(kind: MetricKind) -> &'static str {
    match kind {
        MetricKind::BootTime => "Boot Time",
        MetricKind::DiskRead => "Disk Read Speed",
        MetricKind::DiskWrite => "Disk Write Speed",
        MetricKind::NetworkThroughput => "Network Throughput",
        MetricKind::CpuOverhead => "CPU Overhead",
    }
}

fn value_label(kind: MetricKind, value: f64) -> String {
    match kind {
        MetricKind::BootTime => format!("{:.2}s", value),
        MetricKind::DiskRead | MetricKind::DiskWrite => format!("{:.1}", value),
        MetricKind::NetworkThroughput => format!("{:.0}", value),
        MetricKind::CpuOverhead => format!("{:.1}%", value),
    }
}

fn draw_bar_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    cmp: &Comparison<'_>,
    kind: MetricKind,
) -> DrawResult<()>
where
    DB::ErrorType: 'static,
{
    let (virtio, emulated) = cmp.values(kind);
    let top = virtio.max(emulated);
    let y_max = if top > 0.0 { top * 1.2 } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .caption(panel_title(kind), (FONT, 22).into_font().style(FontStyle::Bold))
        .margin(15)
        .x_label_area_size(10)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..2f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_: &f64| String::new())
        .y_desc(kind.unit())
        .draw()?;

    let bars = [
        ("Virtio", virtio, VIRTIO_COLOR, 0.0),
        ("Emulated", emulated, EMULATED_COLOR, 1.0),
    ];
    for (name, value, color, offset) in bars {
        chart.draw_series(std::iter::once(Rectangle::new(
            [(offset + 0.2, 0.0), (offset + 0.8, value)],
            color.filled(),
        )))?;
        let style = (FONT, 16)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(std::iter::once(Text::new(
            format!("{}: {}", name, value_label(kind, value)),
            (offset + 0.5, value + y_max * 0.01),
            style,
        )))?;
    }
    Ok(())
}

fn draw_improvement_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    cmp: &Comparison<'_>,
) -> DrawResult<()>
where
    DB::ErrorType: 'static,
{
    let improvements = cmp.improvements();
    let low = improvements.iter().map(|(_, v)| *v).fold(0.0f64, f64::min);
    let high = improvements.iter().map(|(_, v)| *v).fold(0.0f64, f64::max);
    // room on both sides for the labels
    let span = (high - low).max(10.0);
    let x_min = low - span * 0.45;
    let x_max = high + span * 0.45;
    let rows = improvements.len() as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(
            "Virtio Improvement (%)",
            (FONT, 22).into_font().style(FontStyle::Bold),
        )
        .margin(15)
        .x_label_area_size(30)
        .y_label_area_size(10)
        .build_cartesian_2d(x_min..x_max, 0f64..rows)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_label_formatter(&|_: &f64| String::new())
        .x_label_formatter(&|v: &f64| format!("{:.0}%", v))
        .draw()?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0), (0.0, rows)],
        BLACK.stroke_width(1),
    )))?;

    // first metric at the top
    for (i, (kind, improvement)) in improvements.iter().enumerate() {
        let row = rows - 1.0 - i as f64;
        let color = if *improvement >= 0.0 {
            GAIN_COLOR
        } else {
            LOSS_COLOR
        };
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, row + 0.2), (*improvement, row + 0.8)],
            color.filled(),
        )))?;

        let anchor = if *improvement >= 0.0 {
            HPos::Left
        } else {
            HPos::Right
        };
        let style = (FONT, 15)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(anchor, VPos::Center));
        chart.draw_series(std::iter::once(Text::new(
            format!("{} {:+.1}%", kind.short_label(), improvement),
            (*improvement, row + 0.5),
            style,
        )))?;
    }
    Ok(())
}

/// Open `path` with the platform's default viewer without waiting for it.
pub fn open_in_viewer(path: &Path) -> io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else {
        Command::new("xdg-open")
    };
    command
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}
