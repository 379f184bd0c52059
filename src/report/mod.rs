//! Reporting utilities: formatted terminal output of bowtie runs.

pub mod format;

pub use format::*;
