//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the shared energy axis (`EnergyGrid`, `EnergyRange`)
//! - analysis options (`BowtieMode`, `BowtieConfig`)
//! - analysis outputs (`BowtieResult`, `GfErrors`, `BowtiePlot`, `ResultsFile`)

pub mod types;

pub use types::*;
