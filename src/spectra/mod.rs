//! Trial spectra.
//!
//! Responsibilities:
//!
//! - build the spectral-index grid (`index_grid`)
//! - evaluate power-law spectra on the response grid and fold channels through them (`power_law`)

pub mod index_grid;
pub mod power_law;

pub use index_grid::*;
pub use power_law::*;
