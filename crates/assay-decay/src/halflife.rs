//! Half-life lookup table.
//!
//! Values are in seconds. The defaults cover the nuclides that dominate a
//! typical once-through fuel cycle; anything not listed is treated as stable.

use std::collections::BTreeMap;

use assay_core::constants::{AM241, CO60, CS137, H3, PU239, PU241, SECONDS_PER_YEAR, SR90, U235, U238};
use assay_core::error::DecayError;
use assay_core::Nuclide;

/// Default half-lives in years.
const DEFAULT_HALF_LIVES_YEARS: [(Nuclide, f64); 9] = [
    (H3, 12.32),
    (CO60, 5.2713),
    (SR90, 28.79),
    (CS137, 30.17),
    (U235, 7.04e8),
    (U238, 4.468e9),
    (PU239, 24_110.0),
    (PU241, 14.29),
    (AM241, 432.2),
];

/// Nuclide → half-life in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfLifeTable {
    entries: BTreeMap<Nuclide, f64>,
}

impl HalfLifeTable {
    /// A table with no radioactive nuclides.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The built-in table.
    pub fn defaults() -> Self {
        Self {
            entries: DEFAULT_HALF_LIVES_YEARS
                .iter()
                .map(|(nuc, years)| (*nuc, years * SECONDS_PER_YEAR))
                .collect(),
        }
    }

    /// Insert or replace a half-life.
    ///
    /// # Errors
    ///
    /// - [`DecayError::InvalidHalfLife`] unless `seconds` is finite and positive
    pub fn insert(&mut self, nuclide: Nuclide, seconds: f64) -> Result<(), DecayError> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(DecayError::InvalidHalfLife { nuclide, seconds });
        }
        self.entries.insert(nuclide, seconds);
        Ok(())
    }

    /// Half-life in seconds, or `None` for a stable nuclide.
    pub fn get(&self, nuclide: &Nuclide) -> Option<f64> {
        self.entries.get(nuclide).copied()
    }

    pub fn is_stable(&self, nuclide: &Nuclide) -> bool {
        !self.entries.contains_key(nuclide)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Nuclide, &f64)> + '_ {
        self.entries.iter()
    }
}

impl Default for HalfLifeTable {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay_core::constants::O16;

    #[test]
    fn defaults_cover_fuel_nuclides() {
        let t = HalfLifeTable::defaults();
        assert_eq!(t.len(), DEFAULT_HALF_LIVES_YEARS.len());
        assert!(t.get(&CS137).is_some());
        assert!(t.is_stable(&O16));
    }

    #[test]
    fn default_values_in_seconds() {
        let t = HalfLifeTable::default();
        let cs = t.get(&CS137).unwrap();
        assert_eq!(cs, 30.17 * SECONDS_PER_YEAR);
    }

    #[test]
    fn insert_replaces() {
        let mut t = HalfLifeTable::empty();
        t.insert(O16, 10.0).unwrap();
        t.insert(O16, 20.0).unwrap();
        assert_eq!(t.get(&O16), Some(20.0));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn insert_rejects_non_positive() {
        let mut t = HalfLifeTable::empty();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(t.insert(O16, bad).is_err(), "accepted {bad}");
        }
        assert!(t.is_empty());
    }
}
