//! Error types raised by the composition and decay collaborators.
use thiserror::Error;

use crate::types::Nuclide;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompositionError {
    #[error("invalid component {nuclide}: {value}")] InvalidComponent { nuclide: Nuclide, value: f64 },
    #[error("negative threshold: {0}")] NegativeThreshold(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecayError {
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error("invalid half-life for {nuclide}: {seconds} s")] InvalidHalfLife { nuclide: Nuclide, seconds: f64 },
    #[error(transparent)] Composition(#[from] CompositionError),
}
