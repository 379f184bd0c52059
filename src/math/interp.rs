//! Grid construction and interpolation on a logarithmic energy axis.

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
///
/// A single step yields `[min]`.
pub fn lin_space(min: f64, max: f64, steps: usize) -> Vec<f64> {
    match steps {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (steps as f64 - 1.0);
            let mut out: Vec<f64> = (0..steps).map(|i| min + step * i as f64).collect();
            // Pin the endpoint so `max` is reproduced exactly.
            out[steps - 1] = max;
            out
        }
    }
}

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
///
/// Callers guarantee `0 < min < max` and `steps >= 2`.
pub fn log_space(min: f64, max: f64, steps: usize) -> Vec<f64> {
    let mut out: Vec<f64> = lin_space(min.ln(), max.ln(), steps)
        .into_iter()
        .map(f64::exp)
        .collect();
    if let Some(first) = out.first_mut() {
        *first = min;
    }
    if let Some(last) = out.last_mut() {
        *last = max;
    }
    out
}

/// Linearly interpolate `y(x)` in `ln x` at each of `x_new`.
///
/// Points outside `[x[0], x[n-1]]` are clamped to the end values.
pub fn interp_log_x(x: &[f64], y: &[f64], x_new: &[f64]) -> Vec<f64> {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    x_new
        .iter()
        .map(|&xq| {
            if n == 0 {
                return f64::NAN;
            }
            if xq <= x[0] {
                return y[0];
            }
            if xq >= x[n - 1] {
                return y[n - 1];
            }
            // First index with x[hi] >= xq; 1 <= hi <= n-1 here.
            let hi = x.partition_point(|&v| v < xq);
            let lo = hi - 1;
            let (l0, l1) = (x[lo].ln(), x[hi].ln());
            let u = (xq.ln() - l0) / (l1 - l0);
            y[lo] + u * (y[hi] - y[lo])
        })
        .collect()
}
