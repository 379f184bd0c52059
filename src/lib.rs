//! `bowtie-gf` library crate.
//!
//! The binary (`bowtie`) is a thin wrapper around this library so that:
//!
//! - the analysis is testable without spawning processes
//! - channel calibration can be scripted from other Rust tools
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod bowtie;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod spectra;
