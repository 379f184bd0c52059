//! The detector response table.
//!
//! One energy grid, one non-negative response column per channel. The table is
//! validated once at construction and is read-only afterwards; every spectrum
//! and folded curve derived from it shares its `EnergyGrid`.

use std::collections::HashSet;

use crate::domain::{EnergyGrid, EnergyRange};
use crate::error::BowtieError;
use crate::math::{interp_log_x, log_space};

/// Validated response table.
#[derive(Debug, Clone)]
pub struct ResponseTable {
    grid: EnergyGrid,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

/// One channel's response restricted to an energy window.
#[derive(Debug, Clone, Copy)]
pub struct ChannelView<'a> {
    pub name: &'a str,
    /// Index of `energies[0]` within the full grid.
    pub offset: usize,
    pub energies: &'a [f64],
    pub response: &'a [f64],
}

impl ChannelView<'_> {
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }
}

impl ResponseTable {
    /// Build a table from an energy column and `(name, response)` columns in order.
    pub fn new(energies: Vec<f64>, channels: Vec<(String, Vec<f64>)>) -> Result<Self, BowtieError> {
        let grid = EnergyGrid::new(energies)?;
        Self::with_grid(grid, channels)
    }

    fn with_grid(grid: EnergyGrid, channels: Vec<(String, Vec<f64>)>) -> Result<Self, BowtieError> {
        if channels.is_empty() {
            return Err(BowtieError::invalid_data("response table has no channel columns"));
        }

        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(channels.len());
        let mut columns = Vec::with_capacity(channels.len());

        for (name, column) in channels {
            if !seen.insert(name.clone()) {
                return Err(BowtieError::invalid_data(format!("duplicate channel column '{name}'")));
            }
            if column.len() != grid.len() {
                return Err(BowtieError::invalid_data(format!(
                    "channel '{name}' has {} values but the energy grid has {}",
                    column.len(),
                    grid.len()
                )));
            }
            if let Some((row, v)) = column
                .iter()
                .enumerate()
                .find(|&(_, v)| !(v.is_finite() && *v >= 0.0))
            {
                return Err(BowtieError::invalid_data(format!(
                    "channel '{name}' has invalid response {v} at row {row} (must be finite and >= 0)"
                )));
            }
            names.push(name);
            columns.push(column);
        }

        Ok(Self { grid, names, columns })
    }

    pub fn energy_grid(&self) -> &EnergyGrid {
        &self.grid
    }

    /// Channel names in column order.
    pub fn channel_names(&self) -> &[String] {
        &self.names
    }

    pub fn channel_count(&self) -> usize {
        self.names.len()
    }

    pub fn column(&self, name: &str) -> Result<&[f64], BowtieError> {
        let idx = self.channel_index(name)?;
        Ok(&self.columns[idx])
    }

    /// A channel's `(energy, response)` pairs inside `range`.
    ///
    /// Energies outside the window are dropped; nothing is extrapolated.
    pub fn channel(&self, name: &str, range: Option<EnergyRange>) -> Result<ChannelView<'_>, BowtieError> {
        let idx = self.channel_index(name)?;
        let (lo, hi) = self.grid.span(range);
        if lo == hi {
            let (energy_min, energy_max) = range.map(|r| (r.min, r.max)).unwrap_or((self.grid.first(), self.grid.last()));
            return Err(BowtieError::EmptyChannelData {
                channel: name.to_string(),
                energy_min,
                energy_max,
            });
        }
        Ok(ChannelView {
            name: &self.names[idx],
            offset: lo,
            energies: &self.grid[lo..hi],
            response: &self.columns[idx][lo..hi],
        })
    }

    /// Resample every column onto `points` log-spaced energies spanning the grid.
    ///
    /// Responses are interpolated linearly in `ln E`.
    pub fn resampled(&self, points: usize) -> Result<ResponseTable, BowtieError> {
        if points < 2 {
            return Err(BowtieError::invalid_range(format!(
                "resampling needs at least 2 points, got {points}"
            )));
        }
        let energies = log_space(self.grid.first(), self.grid.last(), points);
        let channels = self
            .names
            .iter()
            .zip(&self.columns)
            .map(|(name, column)| (name.clone(), interp_log_x(&self.grid, column, &energies)))
            .collect();
        ResponseTable::new(energies, channels)
    }

    fn channel_index(&self, name: &str) -> Result<usize, BowtieError> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| BowtieError::UnknownChannel {
                channel: name.to_string(),
            })
    }
}
