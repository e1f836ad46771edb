//! Material error types.

use assay_core::error::{CompositionError, DecayError};
use assay_heritage::TrackerError;
use thiserror::Error;

/// Errors returned by material operations.
///
/// Every operation validates before mutating, so the receiver is unchanged
/// whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// Extraction would drive the quantity negative.
    #[error("overdraft: have {have} kg, need {need} kg")]
    Overdraft {
        /// Quantity held by the source.
        have: f64,
        /// Quantity requested.
        need: f64,
    },

    /// Invalid initial state for a new material.
    #[error("construction: {0}")]
    Construction(String),

    /// Requested quantity is negative or not finite.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(f64),

    /// The two materials belong to different simulation contexts.
    #[error("materials belong to different contexts")]
    ForeignContext,

    /// Composition arithmetic failed.
    #[error(transparent)]
    Composition(#[from] CompositionError),

    /// The decay collaborator failed.
    #[error(transparent)]
    Decay(#[from] DecayError),

    /// The lineage event was rejected.
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assay_core::ObjId;

    #[test]
    fn overdraft_message() {
        let err = MaterialError::Overdraft { have: 2.0, need: 3.5 };
        assert_eq!(err.to_string(), "overdraft: have 2 kg, need 3.5 kg");
    }

    #[test]
    fn foreign_context_message() {
        assert_eq!(
            MaterialError::ForeignContext.to_string(),
            "materials belong to different contexts"
        );
    }

    #[test]
    fn collaborator_errors_pass_through() {
        let err: MaterialError = TrackerError::RetiredLineage(ObjId(3)).into();
        assert_eq!(err.to_string(), "retired lineage: obj#3");
        let err: MaterialError = DecayError::ArithmeticOverflow.into();
        assert_eq!(err, MaterialError::Decay(DecayError::ArithmeticOverflow));
    }
}
