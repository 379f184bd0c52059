//! Synthetic "boxcar" response tables.
//!
//! A boxcar channel responds with a constant height inside `[lower, upper]` and
//! not at all outside it. For such a channel the bowtie point is known in closed
//! form (effective energy inside the box, geometric factor ≈ `height × width`),
//! which makes these tables handy for demos and sanity checks.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::response::ResponseTable;
use crate::error::BowtieError;
use crate::math::log_space;

/// One rectangular channel.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxcarChannel {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
    pub height: f64,
}

impl BoxcarChannel {
    pub fn new(name: impl Into<String>, lower: f64, upper: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            height,
        }
    }

    pub fn response_at(&self, energy: f64) -> f64 {
        if (self.lower..=self.upper).contains(&energy) {
            self.height
        } else {
            0.0
        }
    }

    /// Closed-form geometric factor for a narrow box.
    pub fn nominal_geometric_factor(&self) -> f64 {
        self.height * (self.upper - self.lower)
    }
}

/// Multiplicative Gaussian noise applied to every non-zero response value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseNoise {
    /// Standard deviation relative to the noiseless value.
    pub relative: f64,
    pub seed: u64,
}

/// The four-channel demo instrument.
pub fn default_boxcars() -> Vec<BoxcarChannel> {
    vec![
        BoxcarChannel::new("boxcar1", 0.07, 0.095, 1.0),
        BoxcarChannel::new("boxcar2", 0.3, 0.6, 1.0),
        BoxcarChannel::new("boxcar3", 1.5, 4.0, 1.0),
        BoxcarChannel::new("boxcar4", 8.0, 14.0, 0.65),
    ]
}

/// Tabulate `channels` on `points` log-spaced energies in `[energy_min, energy_max]`.
pub fn boxcar_table(
    channels: &[BoxcarChannel],
    energy_min: f64,
    energy_max: f64,
    points: usize,
    noise: Option<ResponseNoise>,
) -> Result<ResponseTable, BowtieError> {
    if !(energy_min.is_finite() && energy_max.is_finite() && energy_min > 0.0 && energy_max > energy_min) {
        return Err(BowtieError::invalid_range(format!(
            "synthetic energy range must be finite, > 0 and increasing, got [{energy_min}, {energy_max}]"
        )));
    }
    if points < 2 {
        return Err(BowtieError::invalid_range(format!(
            "synthetic table needs at least 2 energies, got {points}"
        )));
    }
    for ch in channels {
        if !(ch.lower.is_finite() && ch.upper.is_finite() && ch.upper > ch.lower) {
            return Err(BowtieError::invalid_range(format!(
                "boxcar '{}' has invalid bounds [{}, {}]",
                ch.name, ch.lower, ch.upper
            )));
        }
        if !(ch.height.is_finite() && ch.height >= 0.0) {
            return Err(BowtieError::invalid_data(format!(
                "boxcar '{}' has invalid height {}",
                ch.name, ch.height
            )));
        }
    }

    let energies = log_space(energy_min, energy_max, points);

    let mut sampler = match noise {
        Some(n) => {
            let normal = Normal::new(0.0, n.relative)
                .map_err(|e| BowtieError::invalid_range(format!("noise distribution error: {e}")))?;
            Some((StdRng::seed_from_u64(n.seed), normal))
        }
        None => None,
    };

    let columns = channels
        .iter()
        .map(|ch| {
            let values = energies
                .iter()
                .map(|&e| {
                    let clean = ch.response_at(e);
                    match sampler.as_mut() {
                        Some((rng, normal)) if clean > 0.0 => (clean * (1.0 + normal.sample(rng))).max(0.0),
                        _ => clean,
                    }
                })
                .collect();
            (ch.name.clone(), values)
        })
        .collect();

    ResponseTable::new(energies, columns)
}
