//! Shared analysis pipeline used by `bowtie analyze` and the integration tests.
//!
//! response CSV -> (optional resample) -> trial spectra -> bowtie per channel
//!
//! The CLI only has to print and export what comes back.

use log::info;

use crate::bowtie::Bowtie;
use crate::data::ResponseTable;
use crate::domain::{BowtieConfig, BowtieResult, EnergyRange};
use crate::error::AppError;
use crate::io::load_response_table;
use crate::spectra::{SpectralIndexRange, Spectra};

/// All computed outputs of a single `bowtie analyze` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub bowtie: Bowtie,
    pub results: Vec<BowtieResult>,
}

impl RunOutput {
    /// The (possibly resampled) table the analysis ran on.
    pub fn table(&self) -> &ResponseTable {
        self.bowtie.table()
    }
}

/// Load the configured response CSV and analyze it.
pub fn run_analysis(config: &BowtieConfig) -> Result<RunOutput, AppError> {
    let table = load_response_table(&config.responses, &config.energy_column)?;
    run_analysis_with_table(config, table)
}

/// Analyze an already-loaded table.
pub fn run_analysis_with_table(config: &BowtieConfig, table: ResponseTable) -> Result<RunOutput, AppError> {
    // Settings are validated before any numerical work.
    let energy_range = EnergyRange::new(config.energy_min, config.energy_max)?;
    let index_range = SpectralIndexRange::new(config.gamma_min, config.gamma_max, config.gamma_steps)?;

    let table = match config.resample {
        Some(points) => {
            let resampled = table.resampled(points)?;
            info!("resampled response table onto {points} log-spaced energies");
            resampled
        }
        None => table,
    };

    let mut spectra = Spectra::from_range(index_range);
    spectra.produce_power_law_spectra(&table);

    let bowtie = Bowtie::new(table, Some(energy_range)).with_mode(config.mode);
    let want_plot = config.plot || config.save_figures;
    if let Some(window) = bowtie.energy_range() {
        info!(
            "{} analysis over E in [{}, {}]",
            bowtie.mode().display_name(),
            window.min,
            window.max
        );
    }

    let results = match &config.channel {
        Some(channel) => vec![bowtie.bowtie_analysis(channel, &spectra, want_plot)?],
        None => bowtie.bowtie_analysis_full_stack(&spectra, want_plot)?,
    };

    for r in &results {
        info!(
            "{}: E*={:.6e} GF={:.6e} (+{:.3e} / -{:.3e})",
            r.channel,
            r.effective_energy,
            r.geometric_factor,
            r.geometric_factor_errors.gf_upper,
            r.geometric_factor_errors.gf_lower
        );
    }

    Ok(RunOutput { bowtie, results })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::data::{boxcar_table, default_boxcars};
    use crate::domain::BowtieMode;
    use crate::io::DEFAULT_ENERGY_COLUMN;

    fn config() -> BowtieConfig {
        BowtieConfig {
            responses: PathBuf::from("unused.csv"),
            energy_column: DEFAULT_ENERGY_COLUMN.to_string(),
            energy_min: 0.01,
            energy_max: 50.0,
            gamma_min: -3.5,
            gamma_max: -1.5,
            gamma_steps: 40,
            mode: BowtieMode::Differential,
            resample: None,
            channel: None,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_results: None,
            export_json: None,
            save_figures: false,
        }
    }

    fn table() -> ResponseTable {
        boxcar_table(&default_boxcars(), 0.01, 100.0, 400, None).unwrap()
    }

    #[test]
    fn analyzes_every_channel_in_order() {
        let run = run_analysis_with_table(&config(), table()).unwrap();
        let names: Vec<&str> = run.results.iter().map(|r| r.channel.as_str()).collect();
        assert_eq!(names, ["boxcar1", "boxcar2", "boxcar3", "boxcar4"]);
        assert!(run.results.iter().all(|r| r.plot.is_none()));
    }

    #[test]
    fn single_channel_with_plot_data() {
        let mut cfg = config();
        cfg.channel = Some("boxcar3".to_string());
        cfg.plot = true;
        let run = run_analysis_with_table(&cfg, table()).unwrap();
        assert_eq!(run.results.len(), 1);
        let r = &run.results[0];
        assert!(r.effective_energy >= 1.5 && r.effective_energy <= 4.0);
        assert_eq!(r.plot.as_ref().unwrap().curves.len(), 40);
    }

    #[test]
    fn resampling_changes_the_grid() {
        let mut cfg = config();
        cfg.resample = Some(150);
        let run = run_analysis_with_table(&cfg, table()).unwrap();
        assert_eq!(run.table().energy_grid().len(), 150);
        assert_eq!(run.bowtie.energy_range(), Some(EnergyRange::new(0.01, 50.0).unwrap()));
        assert_eq!(run.bowtie.mode(), BowtieMode::Differential);
    }

    #[test]
    fn invalid_settings_fail_before_analysis() {
        let mut cfg = config();
        cfg.gamma_steps = 0;
        assert_eq!(run_analysis_with_table(&cfg, table()).unwrap_err().exit_code(), 2);

        let mut cfg = config();
        cfg.channel = Some("missing".to_string());
        assert_eq!(run_analysis_with_table(&cfg, table()).unwrap_err().exit_code(), 2);
    }
}
