//! Free-space trend charts, one SVG per volume.
//!
//! Charts are disposable output: regenerated in full from the history log on
//! every run and overwritten in place. Rendering is best-effort; the
//! pipeline downgrades any failure here to a warning.

use crate::error::{Error, Result};
use crate::models::volume::Sample;
use crate::util::slug::volume_slug;
use chrono::{DateTime, Duration, Local};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const GB: f64 = 1_073_741_824.0;

pub fn chart_path(data_dir: &Path, volume_path: &str) -> PathBuf {
    data_dir.join(format!("{}.svg", volume_slug(volume_path)))
}

/// Render the trend chart for one volume, overwriting any previous chart.
/// With fewer than two samples there is no trend to plot and nothing is
/// written; that's the expected state on a first run, not an error.
pub fn render(volume_path: &str, samples: &[Sample], data_dir: &Path) -> Result<()> {
    if samples.len() < 2 {
        return Ok(());
    }

    let mut points: Vec<(DateTime<Local>, f64)> = samples
        .iter()
        .map(|s| (s.timestamp, s.free_bytes as f64 / GB))
        .collect();
    points.sort_by_key(|(t, _)| *t);

    let mut x_min = points[0].0;
    let mut x_max = points[points.len() - 1].0;
    if x_min == x_max {
        // All samples share a timestamp; widen the span so the axis stays valid.
        x_min = x_min - Duration::minutes(1);
        x_max = x_max + Duration::minutes(1);
    }
    let y_max = points
        .iter()
        .map(|(_, gb)| *gb)
        .fold(0.0_f64, f64::max)
        .max(0.001)
        * 1.05;

    std::fs::create_dir_all(data_dir)?;
    let out = chart_path(data_dir, volume_path);

    let root = SVGBackend::new(&out, (1200, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Free Disk Space Over Time — {volume_path}"),
            ("sans-serif", 28),
        )
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(70)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|t: &DateTime<Local>| t.format("%Y-%m-%d %H:%M").to_string())
        .y_label_formatter(&|gb: &f64| format!("{gb:.1} GB"))
        .x_desc("Time")
        .y_desc("Free Space (GB)")
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(chart_err)?;
    chart
        .draw_series(points.iter().map(|p| Circle::new(*p, 3, BLUE.filled())))
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn chart_err(e: impl std::fmt::Display) -> Error {
    Error::Chart(e.to_string())
}
