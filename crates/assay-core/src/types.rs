//! Identifier and vector types shared by every Assay crate.
//!
//! Time is measured in whole simulation steps. Identity tokens are plain
//! integers so they compare cheaply and serialize into recorded datums.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{ZZAAAM_A, ZZAAAM_Z};

/// Simulation time in steps. Signed so a backward clock is representable.
pub type SimTime = i64;

/// Nuclide (or element, with mass number zero) in `ZZAAAM` form.
///
/// `922350000` is U-235, `942390000` is Pu-239.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct Nuclide(pub u32);

impl Nuclide {
    /// Ground-state nuclide with atomic number `z` and mass number `a`.
    pub const fn new(z: u32, a: u32) -> Self {
        Self(z * ZZAAAM_Z + a * ZZAAAM_A)
    }

    /// Nuclide in metastable state `m`.
    pub const fn with_state(z: u32, a: u32, m: u32) -> Self {
        Self(z * ZZAAAM_Z + a * ZZAAAM_A + m)
    }

    /// Raw `ZZAAAM` id.
    pub const fn id(&self) -> u32 {
        self.0
    }

    /// Atomic number.
    pub const fn z(&self) -> u32 {
        self.0 / ZZAAAM_Z
    }

    /// Mass number.
    pub const fn a(&self) -> u32 {
        (self.0 / ZZAAAM_A) % 1_000
    }

    /// Metastable state number.
    pub const fn state(&self) -> u32 {
        self.0 % ZZAAAM_A
    }

    /// Molar mass in g/mol, approximated by the mass number.
    ///
    /// Elemental ids (mass number zero) count as 1 g/mol so conversions
    /// between mass and atom bases never divide by zero.
    pub fn molar_mass(&self) -> f64 {
        self.a().max(1) as f64
    }
}

impl fmt::Display for Nuclide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Nuclide {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Nuclide → quantity vector. Ordered so arithmetic and iteration are deterministic.
pub type CompMap = BTreeMap<Nuclide, f64>;

/// Structural identity token of a composition snapshot.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct CompId(pub u64);

/// A lineage entity: one resource followed across all of its versions.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct ObjId(pub u64);

/// One version of a lineage entity in the provenance graph.
///
/// Node ids are assigned in increasing order, so a child always has a larger
/// id than any of its parents. The resource state id is the [`CompId`].
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct NodeId(pub u64);

macro_rules! display_id {
    ($ty:ident, $prefix:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

display_id!(CompId, "comp#");
display_id!(ObjId, "obj#");
display_id!(NodeId, "node#");

/// How a provenance node came to exist.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Root node: material manufactured from nothing.
    Created,
    /// The source of an extraction, after the quantity was removed.
    Split,
    /// The new material produced by an extraction.
    Extracted,
    /// A material after absorbing another.
    Merged,
    /// In-place transmutation, including decay.
    Modified,
}
