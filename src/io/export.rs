//! CSV exports.
//!
//! - bowtie results: one row per channel, in analysis order, easy to consume
//!   in spreadsheets or downstream scripts
//! - response tables (used by `bowtie synth`), in the layout `ingest` reads back

use std::fs::File;
use std::path::{Path, PathBuf};

use log::warn;

use crate::data::ResponseTable;
use crate::domain::BowtieResult;
use crate::error::AppError;
use crate::plot::save_bowtie_figure;

/// Column header of the results CSV.
pub const RESULTS_HEADER: [&str; 5] = ["channel", "geometric_factor", "gf_upper", "gf_lower", "effective_energy"];

/// Write per-channel results to `path`.
///
/// With `save_figures`, a `<channel>_bowtie.svg` is also written next to the
/// CSV for every result that carries plot data. Returns the figure paths.
pub fn save_results(path: &Path, results: &[BowtieResult], save_figures: bool) -> Result<Vec<PathBuf>, AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create results CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(RESULTS_HEADER)
        .map_err(|e| AppError::new(4, format!("Failed to write results CSV header: {e}")))?;

    for r in results {
        // `{}` keeps the shortest round-trip representation of each f64.
        writer
            .write_record([
                r.channel.clone(),
                r.geometric_factor.to_string(),
                r.geometric_factor_errors.gf_upper.to_string(),
                r.geometric_factor_errors.gf_lower.to_string(),
                r.effective_energy.to_string(),
            ])
            .map_err(|e| AppError::new(4, format!("Failed to write results CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush results CSV: {e}")))?;

    if !save_figures {
        return Ok(Vec::new());
    }

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut figures = Vec::new();
    for r in results {
        match &r.plot {
            Some(plot) => figures.push(save_bowtie_figure(dir, plot)?),
            None => warn!("no plot data for channel '{}'; figure skipped", r.channel),
        }
    }
    Ok(figures)
}

/// Write a response table as CSV (energy column first, then channels in order).
pub fn write_response_csv(path: &Path, table: &ResponseTable, energy_column: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create response CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    let mut header = vec![energy_column.to_string()];
    header.extend(table.channel_names().iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(4, format!("Failed to write response CSV header: {e}")))?;

    let columns = table
        .channel_names()
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<Vec<_>, _>>()?;

    for (row, energy) in table.energy_grid().iter().enumerate() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(energy.to_string());
        record.extend(columns.iter().map(|col| col[row].to_string()));
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(4, format!("Failed to write response CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush response CSV: {e}")))?;
    Ok(())
}
