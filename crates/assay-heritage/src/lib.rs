//! # assay-heritage — Material provenance tracking.
//!
//! The [`HeritageTracker`] owns a directed acyclic graph whose edges mean
//! "derived from". Resources never touch the graph directly; they submit
//! [`LineageEvent`]s and get back the ids of the nodes that were appended.
//!
//! Rules:
//! 1. Creation from nothing starts a new lineage entity with a root node.
//! 2. A split advances the source and starts a new entity; both new nodes
//!    have the source's previous node as their single parent.
//! 3. A merge advances the receiving entity with both previous heads as
//!    parents and retires the absorbed entity for good.
//! 4. An in-place modification advances the entity with a single parent.

pub mod error;
pub mod event;
pub mod tracker;

pub use error::TrackerError;
pub use event::{Applied, LineageEvent, Snapshot};
pub use tracker::{HeritageTracker, ProvenanceNode};
