//! Read/write results JSON files.
//!
//! Results JSON is the portable representation of a run:
//! - the settings the analysis ran with (energy window, index range, mode)
//! - the per-channel bowtie points, in channel order
//!
//! Plot data is not persisted. The schema is defined by `domain::ResultsFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{BowtieConfig, BowtieResult, ResultsFile, RunSettings};
use crate::error::AppError;

/// Assemble the file contents for a finished run.
pub fn results_file(config: &BowtieConfig, results: &[BowtieResult]) -> ResultsFile {
    ResultsFile {
        tool: "bowtie".to_string(),
        source: config.responses.display().to_string(),
        settings: RunSettings::from(config),
        results: results.to_vec(),
    }
}

/// Write a results JSON file.
pub fn write_results_json(path: &Path, file: &ResultsFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create results JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::new(4, format!("Failed to write results JSON: {e}")))?;
    Ok(())
}

/// Read a results JSON file.
pub fn read_results_json(path: &Path) -> Result<ResultsFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open results JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid results JSON: {e}")))
}
