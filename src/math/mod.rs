//! Numerical utilities: quadrature, interpolation and cross-spectrum statistics.

pub mod integrate;
pub mod interp;
pub mod stats;

pub use integrate::*;
pub use interp::*;
pub use stats::*;
