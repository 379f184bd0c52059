//! Shared domain types.
//!
//! These are kept small and serializable so the same values can be:
//!
//! - passed between the spectra generator and the bowtie engine
//! - exported to CSV/JSON
//! - reloaded later for reporting

use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::BowtieError;

/// Strictly increasing, positive energies shared by a response table and every
/// spectrum or folded curve derived from it.
///
/// Cloning is cheap (reference counted), and two grids are "the same grid" only
/// if they share storage. See [`EnergyGrid::same_grid`].
#[derive(Debug, Clone)]
pub struct EnergyGrid(Arc<[f64]>);

impl EnergyGrid {
    pub fn new(energies: Vec<f64>) -> Result<Self, BowtieError> {
        if energies.len() < 2 {
            return Err(BowtieError::invalid_data(format!(
                "energy grid needs at least 2 points, got {}",
                energies.len()
            )));
        }
        for (idx, &e) in energies.iter().enumerate() {
            if !(e.is_finite() && e > 0.0) {
                return Err(BowtieError::invalid_data(format!(
                    "energy at row {idx} must be finite and > 0, got {e}"
                )));
            }
        }
        for (idx, pair) in energies.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(BowtieError::invalid_data(format!(
                    "energies must be strictly increasing, row {} has {} after {}",
                    idx + 1,
                    pair[1],
                    pair[0]
                )));
            }
        }
        Ok(Self(energies.into()))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn first(&self) -> f64 {
        self.0[0]
    }

    pub fn last(&self) -> f64 {
        self.0[self.0.len() - 1]
    }

    /// True when both handles point at the same underlying grid.
    pub fn same_grid(&self, other: &EnergyGrid) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Half-open index span `[lo, hi)` of the energies inside `range` (inclusive bounds).
    pub fn span(&self, range: Option<EnergyRange>) -> (usize, usize) {
        match range {
            None => (0, self.0.len()),
            Some(r) => {
                let lo = self.0.partition_point(|&e| e < r.min);
                let hi = self.0.partition_point(|&e| e <= r.max);
                (lo, hi.max(lo))
            }
        }
    }
}

impl Deref for EnergyGrid {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Inclusive energy window used to restrict a channel before analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyRange {
    pub min: f64,
    pub max: f64,
}

impl EnergyRange {
    pub fn new(min: f64, max: f64) -> Result<Self, BowtieError> {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && max >= min) {
            return Err(BowtieError::invalid_range(format!(
                "energy range must be finite, > 0 and ordered, got [{min}, {max}]"
            )));
        }
        Ok(Self { min, max })
    }
}

/// How the folded count rate is turned into a local geometric factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BowtieMode {
    /// `G(E) = C / S(E)`: differential channel.
    Differential,
    /// `G(E) = C / ∫_E S(E') dE'`: integral (threshold) channel.
    Integral,
}

impl BowtieMode {
    pub fn display_name(self) -> &'static str {
        match self {
            BowtieMode::Differential => "differential",
            BowtieMode::Integral => "integral",
        }
    }
}

/// Asymmetric spread of the curve family at the effective energy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GfErrors {
    /// `max_γ G(E*) - geometric_factor`.
    pub gf_upper: f64,
    /// `geometric_factor - min_γ G(E*)`.
    pub gf_lower: f64,
}

impl GfErrors {
    pub fn width(&self) -> f64 {
        self.gf_upper + self.gf_lower
    }
}

/// Everything needed to draw a bowtie diagram for one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct BowtiePlot {
    pub channel: String,
    pub mode: BowtieMode,
    pub energies: Vec<f64>,
    pub indices: Vec<f64>,
    /// One curve per spectral index, aligned with `energies`.
    pub curves: Vec<Vec<f64>>,
    pub effective_energy: f64,
    pub geometric_factor: f64,
    pub errors: GfErrors,
}

/// Bowtie point of one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowtieResult {
    pub channel: String,
    pub geometric_factor: f64,
    pub geometric_factor_errors: GfErrors,
    pub effective_energy: f64,
    #[serde(skip)]
    pub plot: Option<BowtiePlot>,
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags (plus defaults) and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct BowtieConfig {
    pub responses: PathBuf,
    pub energy_column: String,

    pub energy_min: f64,
    pub energy_max: f64,

    pub gamma_min: f64,
    pub gamma_max: f64,
    pub gamma_steps: usize,

    pub mode: BowtieMode,
    /// Resample the response table onto this many log-spaced energies.
    pub resample: Option<usize>,
    /// Analyze only this channel (all channels when `None`).
    pub channel: Option<String>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    pub save_figures: bool,
}

/// Configuration echo stored alongside exported results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub energy_min: f64,
    pub energy_max: f64,
    pub gamma_min: f64,
    pub gamma_max: f64,
    pub gamma_steps: usize,
    pub mode: BowtieMode,
    pub resample: Option<usize>,
}

impl From<&BowtieConfig> for RunSettings {
    fn from(config: &BowtieConfig) -> Self {
        Self {
            energy_min: config.energy_min,
            energy_max: config.energy_max,
            gamma_min: config.gamma_min,
            gamma_max: config.gamma_max,
            gamma_steps: config.gamma_steps,
            mode: config.mode,
            resample: config.resample,
        }
    }
}

/// A saved results file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsFile {
    pub tool: String,
    pub source: String,
    pub settings: RunSettings,
    pub results: Vec<BowtieResult>,
}
