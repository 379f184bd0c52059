//! Cross-spectrum statistics.
//!
//! The folded-curve family is stored as a `DMatrix` with one row per spectral
//! index and one column per energy, so "the spread across γ at fixed E" is a
//! column statistic.

use nalgebra::DMatrix;

/// Summary of one column of a curve family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Coefficient of variation (`std / mean`).
    ///
    /// `None` when the mean is not strictly positive.
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        if self.mean > 0.0 {
            Some(self.std / self.mean)
        } else {
            None
        }
    }
}

/// Statistics of column `col`, or `None` if the column is empty or holds a
/// non-finite value.
pub fn column_stats(m: &DMatrix<f64>, col: usize) -> Option<ColumnStats> {
    let column = m.column(col);
    let n = column.len();
    if n == 0 || column.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mean = column.iter().sum::<f64>() / n as f64;
    let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    let (min, max) = column
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    Some(ColumnStats {
        mean,
        std: var.sqrt(),
        min,
        max,
    })
}
