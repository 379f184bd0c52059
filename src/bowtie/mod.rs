//! Bowtie analysis.
//!
//! Responsibilities:
//!
//! - locate the minimum-dispersion point of one channel's curve family (`engine`)
//! - run every channel of a table, in column order (`full_stack`)

pub mod engine;
pub mod full_stack;

pub use engine::*;
