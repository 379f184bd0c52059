//! Power-law trial spectra and folding.
//!
//! A [`SpectrumFamily`] is an immutable `γ × E` table of `E^γ`, evaluated on the
//! response table's own `EnergyGrid`. [`Spectra`] is the stateful generator
//! around it: reconfiguring the index range drops the produced family, so stale
//! spectra can never reach an analysis.
//!
//! Folding a channel through a family gives, for every `γ`, the local
//! geometric-factor curve
//!
//! ```text
//! C_γ    = ∫ R(E) S_γ(E) dE                 (folded count rate)
//! G_γ(E) = C_γ / S_γ(E)                     (differential)
//! G_γ(E) = C_γ / ∫_E S_γ(E') dE'            (integral)
//! ```
//!
//! Any normalization of `S_γ` cancels in these ratios, so none is applied.

use log::debug;
use nalgebra::DMatrix;

use crate::data::{ChannelView, ResponseTable};
use crate::domain::{BowtieMode, EnergyGrid};
use crate::error::BowtieError;
use crate::math::{tail_integrals, trapezoid};
use crate::spectra::index_grid::SpectralIndexRange;

/// Anything that can hand out a produced spectrum family.
pub trait SpectraSource {
    fn family(&self) -> Result<&SpectrumFamily, BowtieError>;
}

/// Power-law spectra for every trial index, on one shared energy grid.
#[derive(Debug, Clone)]
pub struct SpectrumFamily {
    grid: EnergyGrid,
    range: SpectralIndexRange,
    indices: Vec<f64>,
    /// Row `i` is `E^indices[i]` over the full grid.
    flux: DMatrix<f64>,
}

/// Folded curves of one channel: one row per index, one column per retained energy.
#[derive(Debug, Clone)]
pub struct FoldedFamily {
    pub energies: Vec<f64>,
    pub counts: Vec<f64>,
    pub curves: DMatrix<f64>,
}

impl SpectrumFamily {
    pub fn produce(table: &ResponseTable, range: &SpectralIndexRange) -> Self {
        let grid = table.energy_grid().clone();
        let indices = range.indices();
        let flux = DMatrix::from_fn(indices.len(), grid.len(), |i, j| grid[j].powf(indices[i]));

        debug!(
            "produced {} power-law spectra (gamma {}..{}) on {} energies",
            indices.len(),
            range.gamma_min(),
            range.gamma_max(),
            grid.len()
        );

        Self {
            grid,
            range: *range,
            indices,
            flux,
        }
    }

    pub fn grid(&self) -> &EnergyGrid {
        &self.grid
    }

    pub fn range(&self) -> &SpectralIndexRange {
        &self.range
    }

    pub fn indices(&self) -> &[f64] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// `E^γ` for spectrum `i` over the full grid.
    pub fn spectrum(&self, i: usize) -> Vec<f64> {
        self.flux.row(i).iter().copied().collect()
    }

    /// Fold `view` through every spectrum.
    ///
    /// `view` must come from a table that shares this family's grid.
    pub fn fold(&self, view: &ChannelView<'_>, mode: BowtieMode) -> FoldedFamily {
        let n_spec = self.indices.len();
        let n_e = view.len();
        let energies = view.energies;

        let mut counts = Vec::with_capacity(n_spec);
        let mut curves = DMatrix::zeros(n_spec, n_e);

        for i in 0..n_spec {
            let spectrum: Vec<f64> = (0..n_e).map(|j| self.flux[(i, view.offset + j)]).collect();
            let folded: Vec<f64> = view.response.iter().zip(&spectrum).map(|(r, s)| r * s).collect();
            let c = trapezoid(energies, &folded);
            counts.push(c);

            match mode {
                BowtieMode::Differential => {
                    for j in 0..n_e {
                        curves[(i, j)] = c / spectrum[j];
                    }
                }
                BowtieMode::Integral => {
                    let tail = tail_integrals(energies, &spectrum);
                    for j in 0..n_e {
                        // The last tail is empty: non-finite, never a candidate.
                        curves[(i, j)] = if tail[j] > 0.0 { c / tail[j] } else { f64::NAN };
                    }
                }
            }
        }

        FoldedFamily {
            energies: energies.to_vec(),
            counts,
            curves,
        }
    }
}

impl SpectraSource for SpectrumFamily {
    fn family(&self) -> Result<&SpectrumFamily, BowtieError> {
        Ok(self)
    }
}

/// Stateful spectra generator.
///
/// ```text
/// let mut spectra = Spectra::new(-5.5, -2.5, 100)?;
/// spectra.produce_power_law_spectra(&table);
/// bowtie.bowtie_analysis("boxcar1", &spectra, false)?;
///
/// spectra.set_spectral_indices(-3.5, -1.5, 100)?; // drops the old family
/// spectra.produce_power_law_spectra(&table);
/// ```
#[derive(Debug, Clone)]
pub struct Spectra {
    range: SpectralIndexRange,
    family: Option<SpectrumFamily>,
}

impl Spectra {
    pub fn new(gamma_min: f64, gamma_max: f64, gamma_steps: usize) -> Result<Self, BowtieError> {
        Ok(Self::from_range(SpectralIndexRange::new(gamma_min, gamma_max, gamma_steps)?))
    }

    pub fn from_range(range: SpectralIndexRange) -> Self {
        Self { range, family: None }
    }

    pub fn range(&self) -> &SpectralIndexRange {
        &self.range
    }

    /// Replace the trial index range and invalidate any produced spectra.
    ///
    /// On error the previous configuration (and family) is kept.
    pub fn set_spectral_indices(
        &mut self,
        gamma_min: f64,
        gamma_max: f64,
        gamma_steps: usize,
    ) -> Result<(), BowtieError> {
        self.range = SpectralIndexRange::new(gamma_min, gamma_max, gamma_steps)?;
        self.family = None;
        Ok(())
    }

    /// Evaluate every trial power law on `table`'s energy grid.
    pub fn produce_power_law_spectra(&mut self, table: &ResponseTable) -> &SpectrumFamily {
        self.family.insert(SpectrumFamily::produce(table, &self.range))
    }

    pub fn is_produced(&self) -> bool {
        self.family.is_some()
    }
}

impl SpectraSource for Spectra {
    fn family(&self) -> Result<&SpectrumFamily, BowtieError> {
        self.family.as_ref().ok_or(BowtieError::SpectraNotProduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ResponseTable {
        ResponseTable::new(
            vec![1.0, 2.0, 4.0],
            vec![("flat".to_string(), vec![1.0, 1.0, 1.0])],
        )
        .unwrap()
    }

    #[test]
    fn family_shares_the_table_grid() {
        let t = table();
        let range = SpectralIndexRange::new(-3.0, -1.0, 3).unwrap();
        let family = SpectrumFamily::produce(&t, &range);
        assert!(family.grid().same_grid(t.energy_grid()));
        assert_eq!(family.len(), 3);
        assert_eq!(family.spectrum(2), vec![1.0, 0.5, 0.25]);
    }

    #[test]
    fn differential_fold_divides_counts_by_flux() {
        let t = table();
        let range = SpectralIndexRange::new(0.0, 0.0, 1).unwrap();
        let family = SpectrumFamily::produce(&t, &range);
        let view = t.channel("flat", None).unwrap();
        let folded = family.fold(&view, BowtieMode::Differential);
        // S = 1, R = 1: C = ∫_1^4 dE = 3 and G(E) = 3 everywhere.
        assert_eq!(folded.counts, vec![3.0]);
        assert!(folded.curves.iter().all(|g| (*g - 3.0).abs() < 1e-12));
    }

    #[test]
    fn integral_fold_leaves_last_energy_undefined() {
        let t = table();
        let range = SpectralIndexRange::new(0.0, 0.0, 1).unwrap();
        let family = SpectrumFamily::produce(&t, &range);
        let view = t.channel("flat", None).unwrap();
        let folded = family.fold(&view, BowtieMode::Integral);
        assert!((folded.curves[(0, 0)] - 1.0).abs() < 1e-12);
        assert!((folded.curves[(0, 1)] - 1.5).abs() < 1e-12);
        assert!(folded.curves[(0, 2)].is_nan());
    }

    #[test]
    fn reconfiguring_drops_produced_spectra() {
        let t = table();
        let mut spectra = Spectra::new(-3.0, -1.0, 3).unwrap();
        assert_eq!(spectra.family().unwrap_err(), BowtieError::SpectraNotProduced);

        spectra.produce_power_law_spectra(&t);
        assert!(spectra.is_produced());

        spectra.set_spectral_indices(-2.0, -1.0, 2).unwrap();
        assert!(!spectra.is_produced());
        assert!(matches!(spectra.family(), Err(BowtieError::SpectraNotProduced)));
    }

    #[test]
    fn invalid_reconfiguration_keeps_previous_state() {
        let t = table();
        let mut spectra = Spectra::new(-3.0, -1.0, 3).unwrap();
        spectra.produce_power_law_spectra(&t);
        assert!(spectra.set_spectral_indices(-1.0, -3.0, 3).is_err());
        assert!(spectra.is_produced());
        assert_eq!(spectra.range().steps(), 3);
    }
}
