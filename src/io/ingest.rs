//! Response-table CSV ingest.
//!
//! Expected layout: a header row, one energy column, and one numeric column per
//! detector channel (in the order they should be analyzed):
//!
//! ```text
//! incident_energy,boxcar1,boxcar2
//! 0.010,0.0,0.0
//! 0.011,0.0,0.0
//! ...
//! ```
//!
//! The energy column is found by name (case-insensitive); when no header matches,
//! the first column is used. Any malformed cell rejects the whole table; rows
//! are never skipped or repaired.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{info, warn};

use crate::data::ResponseTable;
use crate::error::{AppError, BowtieError};

/// Default name of the energy column.
pub const DEFAULT_ENERGY_COLUMN: &str = "incident_energy";

/// Load and validate a response table from a CSV file.
pub fn load_response_table(path: &Path, energy_column: &str) -> Result<ResponseTable, AppError> {
    validate_csv_path(path)?;
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open response CSV '{}': {e}", path.display())))?;

    let table = read_response_table(file, energy_column)?;
    info!(
        "loaded {} channel(s) x {} energies from {}",
        table.channel_count(),
        table.energy_grid().len(),
        path.display()
    );
    Ok(table)
}

/// Parse a response table from any CSV reader.
pub fn read_response_table<R: Read>(reader: R, energy_column: &str) -> Result<ResponseTable, BowtieError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| BowtieError::invalid_data(format!("failed to read CSV headers: {e}")))?
        .clone();
    let names = header_names(&headers)?;
    if names.len() < 2 {
        return Err(BowtieError::invalid_data(
            "response CSV needs an energy column and at least one channel column",
        ));
    }

    let energy_idx = match names.iter().position(|n| n.eq_ignore_ascii_case(energy_column)) {
        Some(idx) => idx,
        None => {
            warn!("no '{energy_column}' column found; using '{}' as the energy column", names[0]);
            0
        }
    };

    let mut energies = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| BowtieError::invalid_data(format!("CSV parse error at line {line}: {e}")))?;

        for (col, name) in names.iter().enumerate() {
            let value = parse_cell(&record, col, name, line)?;
            if col == energy_idx {
                energies.push(value);
            } else {
                columns[col].push(value);
            }
        }
    }

    let channels = names
        .into_iter()
        .zip(columns)
        .enumerate()
        .filter(|(col, _)| *col != energy_idx)
        .map(|(_, pair)| pair)
        .collect();

    ResponseTable::new(energies, channels)
}

/// Validate that `path` points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<(), AppError> {
    if !path.exists() {
        return Err(AppError::new(2, format!("Response CSV not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file, got: {}", path.display()),
        ));
    }
    Ok(())
}

fn header_names(headers: &StringRecord) -> Result<Vec<String>, BowtieError> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let name = normalize_header_name(name);
            if name.is_empty() {
                Err(BowtieError::invalid_data(format!("column {} has an empty header", idx + 1)))
            } else {
                Ok(name)
            }
        })
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

fn parse_cell(record: &StringRecord, col: usize, name: &str, line: usize) -> Result<f64, BowtieError> {
    let raw = record.get(col).unwrap_or("");
    raw.parse::<f64>().map_err(|_| {
        BowtieError::invalid_data(format!("line {line}, column '{name}': cannot parse '{raw}' as a number"))
    })
}
