//! Trial spectral-index grids.
//!
//! The bowtie search evaluates a deterministic, evenly spaced grid of power-law
//! indices `γ` (flux ∝ E^γ, so steeper spectra are more negative).

use crate::error::BowtieError;
use crate::math::lin_space;

/// `steps` evenly spaced indices in `[gamma_min, gamma_max]`, inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralIndexRange {
    gamma_min: f64,
    gamma_max: f64,
    steps: usize,
}

impl SpectralIndexRange {
    pub fn new(gamma_min: f64, gamma_max: f64, steps: usize) -> Result<Self, BowtieError> {
        if !(gamma_min.is_finite() && gamma_max.is_finite()) {
            return Err(BowtieError::invalid_range(format!(
                "gamma bounds must be finite, got [{gamma_min}, {gamma_max}]"
            )));
        }
        if gamma_min > gamma_max {
            return Err(BowtieError::invalid_range(format!(
                "gamma_min ({gamma_min}) must not exceed gamma_max ({gamma_max})"
            )));
        }
        if steps < 1 {
            return Err(BowtieError::invalid_range("gamma steps must be >= 1"));
        }
        Ok(Self {
            gamma_min,
            gamma_max,
            steps,
        })
    }

    pub fn gamma_min(&self) -> f64 {
        self.gamma_min
    }

    pub fn gamma_max(&self) -> f64 {
        self.gamma_max
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The trial indices, most negative first.
    pub fn indices(&self) -> Vec<f64> {
        lin_space(self.gamma_min, self.gamma_max, self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_cover_the_closed_range() {
        let r = SpectralIndexRange::new(-3.5, -1.5, 5).unwrap();
        assert_eq!(r.indices(), vec![-3.5, -3.0, -2.5, -2.0, -1.5]);
    }

    #[test]
    fn single_step_is_allowed_here() {
        // One index is a valid range; the bowtie search rejects it later.
        let r = SpectralIndexRange::new(-2.0, -2.0, 1).unwrap();
        assert_eq!(r.indices(), vec![-2.0]);
    }

    #[test]
    fn malformed_ranges_fail() {
        assert!(matches!(
            SpectralIndexRange::new(-1.0, -2.0, 10),
            Err(BowtieError::InvalidRange { .. })
        ));
        assert!(matches!(
            SpectralIndexRange::new(-3.0, -2.0, 0),
            Err(BowtieError::InvalidRange { .. })
        ));
        assert!(matches!(
            SpectralIndexRange::new(f64::NAN, -2.0, 3),
            Err(BowtieError::InvalidRange { .. })
        ));
    }
}
