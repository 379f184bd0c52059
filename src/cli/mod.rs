//! Command-line parsing for the bowtie analysis tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! numerical code; `app` turns these structs into a `BowtieConfig`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::BowtieMode;
use crate::io::DEFAULT_ENERGY_COLUMN;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "bowtie",
    version,
    about = "Bowtie geometric-factor analysis for particle-detector channels"
)]
pub struct Cli {
    /// Log progress (equivalent to `RUST_LOG=bowtie_gf=info`).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Locate bowtie points for one or all channels of a response table.
    Analyze(AnalyzeArgs),
    /// Write a synthetic boxcar response table (four demo channels).
    Synth(SynthArgs),
    /// Print a previously exported results JSON.
    Show(ShowArgs),
}

/// Options for `bowtie analyze`.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Response table CSV (energy column + one column per channel).
    #[arg(short = 'f', long, value_name = "CSV")]
    pub responses: PathBuf,

    /// Name of the energy column (falls back to the first column).
    #[arg(long, default_value = DEFAULT_ENERGY_COLUMN)]
    pub energy_column: String,

    /// Lower edge of the analyzed energy window (inclusive).
    #[arg(long, default_value_t = 0.01)]
    pub energy_min: f64,

    /// Upper edge of the analyzed energy window (inclusive).
    #[arg(long, default_value_t = 50.0)]
    pub energy_max: f64,

    /// Steepest trial spectral index.
    #[arg(long, default_value_t = -3.5, allow_hyphen_values = true)]
    pub gamma_min: f64,

    /// Shallowest trial spectral index.
    #[arg(long, default_value_t = -1.5, allow_hyphen_values = true)]
    pub gamma_max: f64,

    /// Number of trial spectra.
    #[arg(long, default_value_t = 100)]
    pub gamma_steps: usize,

    /// Differential or integral (threshold) channel analysis.
    #[arg(long, value_enum, default_value_t = BowtieMode::Differential)]
    pub mode: BowtieMode,

    /// Resample the response table onto N log-spaced energies first.
    #[arg(long, value_name = "N")]
    pub resample: Option<usize>,

    /// Analyze only this channel.
    #[arg(short = 'c', long)]
    pub channel: Option<String>,

    /// Render an ASCII bowtie diagram per channel.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export per-channel results to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export results (with run settings) to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Write `<channel>_bowtie.svg` figures (next to `--export`, else the working directory).
    #[arg(long)]
    pub save_figures: bool,
}

/// Options for `bowtie synth`.
#[derive(Debug, Parser, Clone)]
pub struct SynthArgs {
    /// Output CSV path.
    #[arg(short, long, value_name = "CSV")]
    pub out: PathBuf,

    /// Number of log-spaced energies.
    #[arg(long, default_value_t = 1000)]
    pub points: usize,

    /// Lowest tabulated energy.
    #[arg(long, default_value_t = 0.01)]
    pub energy_min: f64,

    /// Highest tabulated energy.
    #[arg(long, default_value_t = 100.0)]
    pub energy_max: f64,

    /// Relative Gaussian noise on the response (0 disables).
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Name written for the energy column.
    #[arg(long, default_value = DEFAULT_ENERGY_COLUMN)]
    pub energy_column: String,
}

/// Options for `bowtie show`.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Results JSON produced by `bowtie analyze --export-json`.
    #[arg(long, value_name = "JSON")]
    pub results: PathBuf,
}
