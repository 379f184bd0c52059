//! Bowtie-point search for a single channel.
//!
//! Given the folded curves `G_γ(E)` of one channel, the effective energy `E*` is
//! the grid energy where the curves agree best across `γ`, i.e. where the
//! coefficient of variation `std_γ G(E) / mean_γ G(E)` is smallest. Ties go to
//! the lowest energy.
//!
//! At `E*`:
//! - geometric factor = `mean_γ G(E*)`
//! - `gf_upper` = `max_γ G(E*) - mean`, `gf_lower` = `mean - min_γ G(E*)`
//!
//! Energies where any curve is non-finite, or the mean is not positive, are
//! never candidates.

use log::debug;

use crate::data::ResponseTable;
use crate::domain::{BowtieMode, BowtiePlot, BowtieResult, EnergyRange, GfErrors};
use crate::error::BowtieError;
use crate::math::{ColumnStats, column_stats};
use crate::spectra::{FoldedFamily, SpectraSource};

/// Bowtie analysis over one response table.
#[derive(Debug, Clone)]
pub struct Bowtie {
    table: ResponseTable,
    energy_range: Option<EnergyRange>,
    mode: BowtieMode,
}

/// Location of the minimum-dispersion energy within a folded family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BowtiePoint {
    /// Column index into the folded family.
    pub index: usize,
    pub effective_energy: f64,
    pub dispersion: f64,
    pub stats: ColumnStats,
}

impl BowtiePoint {
    pub fn errors(&self) -> GfErrors {
        GfErrors {
            gf_upper: self.stats.max - self.stats.mean,
            gf_lower: self.stats.mean - self.stats.min,
        }
    }
}

impl Bowtie {
    /// Differential-mode analysis restricted to `energy_range` (whole grid when `None`).
    pub fn new(table: ResponseTable, energy_range: Option<EnergyRange>) -> Self {
        Self {
            table,
            energy_range,
            mode: BowtieMode::Differential,
        }
    }

    pub fn with_mode(mut self, mode: BowtieMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn table(&self) -> &ResponseTable {
        &self.table
    }

    pub fn energy_range(&self) -> Option<EnergyRange> {
        self.energy_range
    }

    pub fn mode(&self) -> BowtieMode {
        self.mode
    }

    /// Locate the bowtie point of `channel` for the spectra in `spectra`.
    ///
    /// With `plot`, the result also carries the full curve family for rendering.
    pub fn bowtie_analysis<S>(&self, channel: &str, spectra: &S, plot: bool) -> Result<BowtieResult, BowtieError>
    where
        S: SpectraSource + ?Sized,
    {
        let family = spectra.family()?;
        if !family.grid().same_grid(self.table.energy_grid()) {
            return Err(BowtieError::GridMismatch);
        }

        let view = self.table.channel(channel, self.energy_range)?;

        // Repeated copies of one index are still a single curve.
        let range = family.range();
        let distinct = if range.gamma_min() == range.gamma_max() { 1 } else { family.len() };
        if distinct < 2 {
            return Err(BowtieError::degenerate(
                channel,
                format!("need at least 2 distinct trial spectral indices, got {distinct}"),
            ));
        }
        if view.len() < 2 {
            return Err(BowtieError::degenerate(
                channel,
                format!("need at least 2 energies in range, got {}", view.len()),
            ));
        }

        let folded = family.fold(&view, self.mode);
        if folded.counts.iter().all(|c| *c <= 0.0) {
            return Err(BowtieError::degenerate(channel, "response is zero over the whole energy range"));
        }

        let point = locate_bowtie(channel, &folded)?;
        debug!(
            "{channel}: bowtie at grid column {} of {} (E*={}, cv={:.3e})",
            point.index,
            folded.energies.len(),
            point.effective_energy,
            point.dispersion
        );

        let errors = point.errors();
        let plot = plot.then(|| BowtiePlot {
            channel: channel.to_string(),
            mode: self.mode,
            energies: folded.energies.clone(),
            indices: family.indices().to_vec(),
            curves: folded
                .curves
                .row_iter()
                .map(|row| row.iter().copied().collect())
                .collect(),
            effective_energy: point.effective_energy,
            geometric_factor: point.stats.mean,
            errors,
        });

        Ok(BowtieResult {
            channel: channel.to_string(),
            geometric_factor: point.stats.mean,
            geometric_factor_errors: errors,
            effective_energy: point.effective_energy,
            plot,
        })
    }
}

/// Find the minimum-dispersion column of `folded`.
pub fn locate_bowtie(channel: &str, folded: &FoldedFamily) -> Result<BowtiePoint, BowtieError> {
    let mut best: Option<BowtiePoint> = None;

    for (index, &energy) in folded.energies.iter().enumerate() {
        let Some(stats) = column_stats(&folded.curves, index) else {
            continue;
        };
        let Some(dispersion) = stats.coefficient_of_variation() else {
            continue;
        };

        // Strict comparison keeps the lowest energy on ties.
        if best.is_none_or(|b| dispersion < b.dispersion) {
            best = Some(BowtiePoint {
                index,
                effective_energy: energy,
                dispersion,
                stats,
            });
        }
    }

    best.ok_or_else(|| BowtieError::degenerate(channel, "no energy with a finite, positive geometric factor"))
}

#[cfg(test)]
mod tests {
    use nalgebra::DMatrix;

    use super::*;
    use crate::data::{BoxcarChannel, boxcar_table, default_boxcars};
    use crate::spectra::{Spectra, SpectralIndexRange, SpectrumFamily};

    fn demo_table() -> ResponseTable {
        boxcar_table(&default_boxcars(), 0.01, 100.0, 2000, None).unwrap()
    }

    fn analyze(table: &ResponseTable, channel: &str, gamma_min: f64, gamma_max: f64, steps: usize) -> BowtieResult {
        let range = SpectralIndexRange::new(gamma_min, gamma_max, steps).unwrap();
        let family = SpectrumFamily::produce(table, &range);
        let bowtie = Bowtie::new(table.clone(), Some(EnergyRange::new(0.01, 50.0).unwrap()));
        bowtie.bowtie_analysis(channel, &family, false).unwrap()
    }

    #[test]
    fn locate_picks_the_tightest_column() {
        let folded = FoldedFamily {
            energies: vec![1.0, 2.0, 3.0],
            counts: vec![1.0, 1.0],
            curves: DMatrix::from_row_slice(2, 3, &[1.0, 1.9, 1.0, 3.0, 2.1, 5.0]),
        };
        let point = locate_bowtie("x", &folded).unwrap();
        assert_eq!(point.index, 1);
        assert_eq!(point.effective_energy, 2.0);
        assert!((point.stats.mean - 2.0).abs() < 1e-12);
    }

    #[test]
    fn locate_breaks_ties_by_lowest_energy() {
        let folded = FoldedFamily {
            energies: vec![1.0, 2.0, 3.0],
            counts: vec![1.0, 1.0],
            curves: DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 2.0, 3.0, 2.0, 2.0]),
        };
        assert_eq!(locate_bowtie("x", &folded).unwrap().index, 1);
    }

    #[test]
    fn locate_skips_non_finite_columns() {
        let folded = FoldedFamily {
            energies: vec![1.0, 2.0],
            counts: vec![1.0, 1.0],
            curves: DMatrix::from_row_slice(2, 2, &[1.0, f64::NAN, 1.5, 1.0]),
        };
        assert_eq!(locate_bowtie("x", &folded).unwrap().index, 0);
    }

    #[test]
    fn boxcar_bowtie_lands_inside_the_box() {
        let table = demo_table();
        let result = analyze(&table, "boxcar1", -5.5, -2.5, 100);
        let boxcar = &default_boxcars()[0];

        assert!(result.effective_energy >= boxcar.lower && result.effective_energy <= boxcar.upper);
        let rel = (result.geometric_factor - boxcar.nominal_geometric_factor()).abs() / boxcar.nominal_geometric_factor();
        assert!(rel < 0.1, "gf={} rel={rel}", result.geometric_factor);
        assert!(result.geometric_factor_errors.gf_upper >= 0.0);
        assert!(result.geometric_factor_errors.gf_lower >= 0.0);
        assert!(result.geometric_factor_errors.width() < 0.1 * result.geometric_factor);
        // max - mean and mean - min differ for a skewed family.
        let GfErrors { gf_upper, gf_lower } = result.geometric_factor_errors;
        assert!((gf_upper - gf_lower).abs() > 1e-9, "+{gf_upper} / -{gf_lower}");
    }

    #[test]
    fn shifting_the_index_range_keeps_the_crossing_close() {
        let table = demo_table();
        let steep = analyze(&table, "boxcar1", -5.5, -2.5, 100);
        let shallow = analyze(&table, "boxcar1", -3.5, -1.5, 100);

        let energy_shift = (steep.effective_energy - shallow.effective_energy).abs() / steep.effective_energy;
        let gf_shift = (steep.geometric_factor - shallow.geometric_factor).abs() / steep.geometric_factor;
        assert!(energy_shift < 0.2, "energy shift {energy_shift}");
        assert!(gf_shift < 0.1, "gf shift {gf_shift}");
    }

    #[test]
    fn analysis_is_deterministic() {
        let table = demo_table();
        let a = analyze(&table, "boxcar3", -4.0, -2.0, 50);
        let b = analyze(&table, "boxcar3", -4.0, -2.0, 50);
        assert_eq!(a.geometric_factor.to_bits(), b.geometric_factor.to_bits());
        assert_eq!(a.effective_energy.to_bits(), b.effective_energy.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn widening_the_index_range_does_not_tighten_the_band() {
        let table = demo_table();
        // Same density: 21 steps per unit of gamma.
        let narrow = analyze(&table, "boxcar2", -3.0, -2.0, 21);
        let wide = analyze(&table, "boxcar2", -6.0, -1.0, 101);
        assert!(wide.geometric_factor_errors.width() >= narrow.geometric_factor_errors.width());
    }

    #[test]
    fn single_index_is_degenerate() {
        let table = demo_table();
        let family = SpectrumFamily::produce(&table, &SpectralIndexRange::new(-3.0, -3.0, 1).unwrap());
        let err = Bowtie::new(table, None).bowtie_analysis("boxcar1", &family, false).unwrap_err();
        assert!(matches!(err, BowtieError::DegenerateSpectra { .. }));
    }

    #[test]
    fn repeated_single_index_is_degenerate() {
        let table = ResponseTable::new(vec![1.0, 2.0, 3.0], vec![("flat".to_string(), vec![1.0, 1.0, 1.0])]).unwrap();
        let family = SpectrumFamily::produce(&table, &SpectralIndexRange::new(-2.0, -2.0, 5).unwrap());
        assert_eq!(family.len(), 5);
        let err = Bowtie::new(table, None).bowtie_analysis("flat", &family, false).unwrap_err();
        assert!(matches!(err, BowtieError::DegenerateSpectra { .. }), "{err:?}");
    }

    #[test]
    fn all_zero_response_is_degenerate() {
        let table = boxcar_table(&[BoxcarChannel::new("dead", 1.0, 2.0, 0.0)], 0.1, 10.0, 50, None).unwrap();
        let family = SpectrumFamily::produce(&table, &SpectralIndexRange::new(-3.0, -2.0, 5).unwrap());
        let err = Bowtie::new(table, None).bowtie_analysis("dead", &family, false).unwrap_err();
        assert!(matches!(err, BowtieError::DegenerateSpectra { .. }));
    }

    #[test]
    fn empty_energy_window_is_reported() {
        let table = demo_table();
        let family = SpectrumFamily::produce(&table, &SpectralIndexRange::new(-3.0, -2.0, 5).unwrap());
        let bowtie = Bowtie::new(table, Some(EnergyRange::new(500.0, 600.0).unwrap()));
        let err = bowtie.bowtie_analysis("boxcar1", &family, false).unwrap_err();
        assert!(matches!(err, BowtieError::EmptyChannelData { .. }));
    }

    #[test]
    fn spectra_from_another_table_are_rejected() {
        let table = demo_table();
        let other = demo_table();
        let family = SpectrumFamily::produce(&other, &SpectralIndexRange::new(-3.0, -2.0, 5).unwrap());
        let err = Bowtie::new(table, None).bowtie_analysis("boxcar1", &family, false).unwrap_err();
        assert_eq!(err, BowtieError::GridMismatch);
    }

    #[test]
    fn unproduced_spectra_are_rejected() {
        let spectra = Spectra::new(-3.0, -2.0, 5).unwrap();
        let err = Bowtie::new(demo_table(), None)
            .bowtie_analysis("boxcar1", &spectra, false)
            .unwrap_err();
        assert_eq!(err, BowtieError::SpectraNotProduced);
    }

    #[test]
    fn reconfiguration_matches_fresh_generators() {
        let table = demo_table();
        let bowtie = Bowtie::new(table.clone(), Some(EnergyRange::new(0.01, 50.0).unwrap()));

        let mut reused = Spectra::new(-5.5, -2.5, 100).unwrap();
        reused.produce_power_law_spectra(&table);
        let first = bowtie.bowtie_analysis("boxcar1", &reused, false).unwrap();
        reused.set_spectral_indices(-3.5, -1.5, 100).unwrap();
        reused.produce_power_law_spectra(&table);
        let second = bowtie.bowtie_analysis("boxcar1", &reused, false).unwrap();

        let mut fresh_a = Spectra::new(-5.5, -2.5, 100).unwrap();
        fresh_a.produce_power_law_spectra(&table);
        let mut fresh_b = Spectra::new(-3.5, -1.5, 100).unwrap();
        fresh_b.produce_power_law_spectra(&table);

        assert_eq!(first, bowtie.bowtie_analysis("boxcar1", &fresh_a, false).unwrap());
        assert_eq!(second, bowtie.bowtie_analysis("boxcar1", &fresh_b, false).unwrap());
    }

    #[test]
    fn plot_artifact_only_when_requested() {
        let table = demo_table();
        let family = SpectrumFamily::produce(&table, &SpectralIndexRange::new(-4.0, -2.0, 7).unwrap());
        let bowtie = Bowtie::new(table, Some(EnergyRange::new(0.01, 50.0).unwrap()));

        let without = bowtie.bowtie_analysis("boxcar4", &family, false).unwrap();
        assert!(without.plot.is_none());

        let with = bowtie.bowtie_analysis("boxcar4", &family, true).unwrap();
        let plot = with.plot.as_ref().unwrap();
        assert_eq!(plot.curves.len(), 7);
        assert!(plot.curves.iter().all(|c| c.len() == plot.energies.len()));
        assert_eq!(plot.effective_energy, with.effective_energy);
        assert_eq!(plot.geometric_factor, with.geometric_factor);
        assert!(plot.energies.iter().all(|e| *e <= 50.0));
    }

    #[test]
    fn integral_mode_finds_a_threshold_below_the_box() {
        let table = demo_table();
        let family = SpectrumFamily::produce(&table, &SpectralIndexRange::new(-4.0, -2.0, 41).unwrap());
        let bowtie = Bowtie::new(table, None).with_mode(BowtieMode::Integral);
        let result = bowtie.bowtie_analysis("boxcar3", &family, false).unwrap();
        assert!(result.effective_energy.is_finite());
        assert!(result.effective_energy <= 4.0);
        assert!(result.geometric_factor > 0.0);
    }
}
