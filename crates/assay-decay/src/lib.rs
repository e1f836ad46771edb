//! # assay-decay — Nuclide decay engine.
//!
//! Reference implementation of the [`DecayCalculator`](assay_core::traits::DecayCalculator)
//! collaborator:
//! - **Exponential decay**: each radioactive nuclide evolves as
//!   `N(t) = N0 * 2^(-t / T½)` over `dt` steps of `step_seconds` each.
//! - **Half-life table**: built-in defaults for common fuel-cycle nuclides,
//!   extendable per engine.
//! - **No in-growth**: daughters are not produced; nuclides absent from the
//!   table are stable.

pub mod engine;
pub mod halflife;

pub use engine::{DecayEngine, NoDecay};
pub use halflife::HalfLifeTable;
