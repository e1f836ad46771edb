//! Tracker error types.

use assay_core::ObjId;
use thiserror::Error;

/// Errors returned when an event cannot be applied to the graph.
///
/// The graph is left unchanged whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// The entity was never created by this tracker.
    #[error("unknown lineage: {0}")]
    UnknownLineage(ObjId),

    /// The entity was absorbed into another and its history is closed.
    #[error("retired lineage: {0}")]
    RetiredLineage(ObjId),

    /// An entity cannot absorb itself.
    #[error("lineage cannot absorb itself: {0}")]
    SelfMerge(ObjId),
}
