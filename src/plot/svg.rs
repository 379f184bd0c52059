//! Per-channel bowtie figures rendered with Plotters' SVG backend.
//!
//! Each figure shows every folded curve on log-log axes (colored from the
//! steepest to the shallowest index), the residual spread at the effective
//! energy as a vertical bar, and the bowtie point itself.

use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::domain::BowtiePlot;
use crate::error::AppError;

/// Default figure size in pixels.
pub const FIGURE_SIZE: (u32, u32) = (800, 600);

/// File name used for a channel's figure, e.g. `boxcar1_bowtie.svg`.
pub fn figure_file_name(channel: &str) -> String {
    let safe: String = channel
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{safe}_bowtie.svg")
}

/// Write `plot` as `<dir>/<channel>_bowtie.svg` and return the path.
pub fn save_bowtie_figure(dir: &Path, plot: &BowtiePlot) -> Result<PathBuf, AppError> {
    let path = dir.join(figure_file_name(&plot.channel));
    write_bowtie_svg(&path, plot, FIGURE_SIZE)?;
    Ok(path)
}

/// Figure title: channel, mode and the trial index span.
pub fn figure_caption(plot: &BowtiePlot) -> String {
    let mut caption = format!("{} bowtie ({})", plot.channel, plot.mode.display_name());
    if let (Some(first), Some(last)) = (plot.indices.first(), plot.indices.last()) {
        caption.push_str(&format!(", gamma {first} to {last} ({} curves)", plot.indices.len()));
    }
    caption
}

pub fn write_bowtie_svg(path: &Path, plot: &BowtiePlot, size: (u32, u32)) -> Result<(), AppError> {
    let draw_err = |e: &dyn std::fmt::Display| {
        AppError::new(4, format!("Failed to draw bowtie figure '{}': {e}", path.display()))
    };

    let points: Vec<Vec<(f64, f64)>> = plot
        .curves
        .iter()
        .map(|curve| {
            plot.energies
                .iter()
                .zip(curve)
                .filter(|&(&e, &g)| e > 0.0 && g > 0.0 && g.is_finite())
                .map(|(&e, &g)| (e, g))
                .collect()
        })
        .collect();

    let Some((x0, x1, y0, y1)) = log_bounds(&points) else {
        return Err(AppError::new(
            4,
            format!("Channel '{}' has no positive curve values to plot.", plot.channel),
        ));
    };

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(&e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(figure_caption(plot), ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((x0..x1).log_scale(), (y0..y1).log_scale())
        .map_err(|e| draw_err(&e))?;

    chart
        .configure_mesh()
        .x_desc("Energy")
        .y_desc("Geometric factor")
        .x_label_formatter(&|v| format!("{v:.1e}"))
        .y_label_formatter(&|v| format!("{v:.1e}"))
        .draw()
        .map_err(|e| draw_err(&e))?;

    let n = points.len().max(2) - 1;
    for (i, curve) in points.iter().enumerate() {
        // Blue (steepest) through red (shallowest).
        let color = HSLColor(0.66 * (1.0 - i as f64 / n as f64), 0.8, 0.45);
        chart
            .draw_series(LineSeries::new(curve.iter().copied(), &color))
            .map_err(|e| draw_err(&e))?;
    }

    let e = plot.effective_energy;
    let gf = plot.geometric_factor;
    let upper = gf + plot.errors.gf_upper;
    let lower = (gf - plot.errors.gf_lower).max(y0);
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(e, lower), (e, upper)],
            BLACK.stroke_width(3),
        )))
        .map_err(|e| draw_err(&e))?;
    chart
        .draw_series(std::iter::once(Circle::new((e, gf), 5, BLACK.filled())))
        .map_err(|e| draw_err(&e))?;

    root.present().map_err(|e| draw_err(&e))?;
    Ok(())
}

fn log_bounds(points: &[Vec<(f64, f64)>]) -> Option<(f64, f64, f64, f64)> {
    let mut x = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y = (f64::INFINITY, f64::NEG_INFINITY);
    for &(e, g) in points.iter().flatten() {
        x = (x.0.min(e), x.1.max(e));
        y = (y.0.min(g), y.1.max(g));
    }
    if !(x.0.is_finite() && y.0.is_finite() && x.1 > x.0) {
        return None;
    }
    // Keep a visible span even when every curve is flat.
    if y.1 <= y.0 {
        y = (y.0 * 0.5, y.1 * 2.0);
    }
    Some((x.0, x.1, y.0, y.1))
}
