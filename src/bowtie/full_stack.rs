//! Multi-channel bowtie analysis.
//!
//! Channels are independent: each one reads only its own response column plus
//! the shared grid and spectrum family, so they are evaluated in parallel.
//! Results come back in table column order, and any channel failure fails the
//! whole run.

use log::info;
use rayon::prelude::*;

use crate::bowtie::engine::Bowtie;
use crate::domain::BowtieResult;
use crate::error::BowtieError;
use crate::spectra::SpectraSource;

impl Bowtie {
    /// Run [`Bowtie::bowtie_analysis`] on every channel of the table.
    pub fn bowtie_analysis_full_stack<S>(&self, spectra: &S, plot: bool) -> Result<Vec<BowtieResult>, BowtieError>
    where
        S: SpectraSource + ?Sized,
    {
        let family = spectra.family()?;

        let outcomes: Vec<Result<BowtieResult, BowtieError>> = self
            .table()
            .channel_names()
            .par_iter()
            .map(|name| self.bowtie_analysis(name, family, plot))
            .collect();

        // Report the first failing channel in column order, not whichever thread lost.
        let results = outcomes.into_iter().collect::<Result<Vec<_>, _>>()?;
        info!("bowtie analysis complete for {} channel(s)", results.len());
        Ok(results)
    }
}
