//! Integration test suite for Assay.
//!
//! This crate holds tests that drive materials, the heritage tracker and the
//! registry together. Conservation and lineage invariants are checked under
//! long random sequences of splits, merges and decay sweeps.

pub mod helpers;
