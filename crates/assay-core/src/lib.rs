//! # assay-core
//! Foundation types and collaborator contracts for the Assay material model.
//!
//! - [`composition::Composition`] — immutable, identity-bearing isotopic snapshot
//! - [`compmath`] — pure vector arithmetic over [`types::CompMap`]
//! - [`traits`] — contracts implemented by other crates (decay, recording)
//! - [`record`] — datums handed to the recording collaborator

pub mod compmath;
pub mod composition;
pub mod constants;
pub mod error;
pub mod record;
pub mod traits;
pub mod types;

pub use composition::Composition;
pub use types::{CompId, CompMap, NodeId, NodeKind, Nuclide, ObjId, SimTime};
