//! ASCII rendering of a bowtie diagram for terminal output.
//!
//! Both axes are logarithmic, so power-law curves are straight lines and the
//! family pinches into the characteristic bowtie around the effective energy.
//!
//! Plot elements:
//! - folded curves: `-`
//! - residual spread at the effective energy: `|`
//! - bowtie point: `X`

use crate::domain::BowtiePlot;

/// Render `plot` into a `width × height` character grid with a one-line header.
pub fn render_bowtie_ascii(plot: &BowtiePlot, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let curves = log_curves(plot);
    let (x_min, x_max) = x_range(&curves).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = y_range(&curves).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for curve in &curves {
        draw_curve(&mut grid, curve, x_min, x_max, y_min, y_max);
    }

    let gf = plot.geometric_factor;
    if plot.effective_energy > 0.0 && gf > 0.0 {
        let x = map_x(plot.effective_energy.ln(), x_min, x_max, width);
        let upper = gf + plot.errors.gf_upper;
        let lower = gf - plot.errors.gf_lower;
        let top = map_y(upper.ln(), y_min, y_max, height);
        let bottom = if lower > 0.0 {
            map_y(lower.ln(), y_min, y_max, height)
        } else {
            height - 1
        };
        for row in grid.iter_mut().take(bottom + 1).skip(top) {
            row[x] = '|';
        }
        grid[map_y(gf.ln(), y_min, y_max, height)][x] = 'X';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Bowtie {} ({}): E=[{:.3e}, {:.3e}] | E*={:.4e} GF={:.4e} (+{:.2e} / -{:.2e})\n",
        plot.channel,
        plot.mode.display_name(),
        x_min.exp(),
        x_max.exp(),
        plot.effective_energy,
        gf,
        plot.errors.gf_upper,
        plot.errors.gf_lower,
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// `(ln E, ln G)` pairs of each curve, keeping only finite positive values.
fn log_curves(plot: &BowtiePlot) -> Vec<Vec<(f64, f64)>> {
    plot.curves
        .iter()
        .map(|curve| {
            plot.energies
                .iter()
                .zip(curve)
                .filter(|&(&e, &g)| e > 0.0 && g > 0.0 && g.is_finite())
                .map(|(&e, &g)| (e.ln(), g.ln()))
                .collect()
        })
        .collect()
}

fn x_range(curves: &[Vec<(f64, f64)>]) -> Option<(f64, f64)> {
    bounds(curves.iter().flatten().map(|&(x, _)| x))
}

fn y_range(curves: &[Vec<(f64, f64)>]) -> Option<(f64, f64)> {
    bounds(curves.iter().flatten().map(|&(_, y)| y))
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top of the plot.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, '-'),
            None => grid[row][col] = '-',
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let (mut x0, mut y0) = (x0 as isize, y0 as isize);
    let (x1, y1) = (x1 as isize, y1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if let Some(cell) = grid.get_mut(y0 as usize).and_then(|row| row.get_mut(x0 as usize)) {
            if *cell == ' ' {
                *cell = ch;
            }
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
