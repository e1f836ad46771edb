//! Collaborator contracts.
//!
//! These traits define the boundary between the material model and the
//! pieces it consumes but does not own:
//! - [`DecayCalculator`] — nuclide evolution over elapsed steps (assay-decay implements)
//! - [`Recorder`] — persistence sink for compositions and resource versions

use crate::error::DecayError;
use crate::record::Datum;
use crate::types::CompMap;

/// Time evolution of an isotopic vector.
///
/// Implementations must be pure: the same input and `dt` always produce the
/// same output, since decayed compositions are cached and shared.
pub trait DecayCalculator: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Evolve an atom vector by `dt` simulation steps.
    ///
    /// The returned vector need not be normalized.
    fn decay(&self, atoms: &CompMap, dt: u64) -> Result<CompMap, DecayError>;
}

/// Sink for recorded datums. The model itself performs no I/O.
pub trait Recorder: Send + Sync {
    /// Accept one datum.
    fn record(&self, datum: Datum);

    /// Whether datums are kept at all.
    ///
    /// Callers may skip building datums when this returns `false`.
    /// Default implementation: `true`.
    fn is_enabled(&self) -> bool {
        true
    }
}
