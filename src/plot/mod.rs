//! Bowtie diagrams.
//!
//! - terminal rendering (`ascii`)
//! - per-channel SVG figures (`svg`)

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;
