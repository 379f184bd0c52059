//! Response data: the validated response table and synthetic generators.

pub mod boxcar;
pub mod response;

pub use boxcar::*;
pub use response::*;
