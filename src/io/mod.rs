//! Input/output helpers.
//!
//! - response-table CSV ingest + validation (`ingest`)
//! - result and synthetic-table exports (CSV + SVG figures) (`export`)
//! - results JSON read/write (`results_json`)

pub mod export;
pub mod ingest;
pub mod results_json;

pub use export::*;
pub use ingest::*;
pub use results_json::*;
