//! Decay engine implementing the [`DecayCalculator`] trait.
//!
//! Elapsed time is `dt * step_seconds`, computed in integer arithmetic with an
//! overflow check before converting to floating point. Each nuclide in the
//! half-life table is scaled by its retention `2^(-t / T½)`; the rest pass
//! through unchanged.

use assay_core::constants::DEFAULT_STEP_SECONDS;
use assay_core::error::DecayError;
use assay_core::traits::DecayCalculator;
use assay_core::{CompMap, Nuclide};
use tracing::trace;

use crate::halflife::HalfLifeTable;

/// The production decay calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayEngine {
    table: HalfLifeTable,
    step_seconds: u64,
}

impl DecayEngine {
    /// Engine with the default half-life table and one-month steps.
    pub fn new() -> Self {
        Self {
            table: HalfLifeTable::defaults(),
            step_seconds: DEFAULT_STEP_SECONDS,
        }
    }

    /// Replace the half-life table.
    pub fn with_table(mut self, table: HalfLifeTable) -> Self {
        self.table = table;
        self
    }

    /// Set the length of one simulation step.
    pub fn with_step_seconds(mut self, step_seconds: u64) -> Self {
        self.step_seconds = step_seconds;
        self
    }

    /// Add or replace one half-life.
    pub fn with_half_life(mut self, nuclide: Nuclide, seconds: f64) -> Result<Self, DecayError> {
        self.table.insert(nuclide, seconds)?;
        Ok(self)
    }

    pub fn table(&self) -> &HalfLifeTable {
        &self.table
    }

    pub fn step_seconds(&self) -> u64 {
        self.step_seconds
    }

    /// Seconds covered by `dt` steps.
    fn elapsed_seconds(&self, dt: u64) -> Result<u64, DecayError> {
        dt.checked_mul(self.step_seconds)
            .ok_or(DecayError::ArithmeticOverflow)
    }

    /// Fraction of `nuclide` remaining after `dt` steps, in `[0, 1]`.
    pub fn retention(&self, nuclide: &Nuclide, dt: u64) -> Result<f64, DecayError> {
        let elapsed = self.elapsed_seconds(dt)? as f64;
        Ok(match self.table.get(nuclide) {
            Some(half_life) => (-elapsed / half_life).exp2(),
            None => 1.0,
        })
    }
}

impl Default for DecayEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DecayCalculator for DecayEngine {
    fn name(&self) -> &str {
        "exponential"
    }

    fn decay(&self, atoms: &CompMap, dt: u64) -> Result<CompMap, DecayError> {
        if dt == 0 {
            return Ok(atoms.clone());
        }
        let elapsed = self.elapsed_seconds(dt)? as f64;
        trace!(dt, elapsed, nuclides = atoms.len(), "decaying atom vector");

        Ok(atoms
            .iter()
            .map(|(nuc, n)| {
                let kept = match self.table.get(nuc) {
                    Some(half_life) => n * (-elapsed / half_life).exp2(),
                    None => *n,
                };
                (*nuc, kept)
            })
            .collect())
    }
}

/// A calculator under which nothing ever decays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDecay;

impl DecayCalculator for NoDecay {
    fn name(&self) -> &str {
        "none"
    }

    fn decay(&self, atoms: &CompMap, _dt: u64) -> Result<CompMap, DecayError> {
        Ok(atoms.clone())
    }
}
