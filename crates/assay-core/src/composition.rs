//! Immutable isotopic composition snapshots.
//!
//! A [`Composition`] is a cheap-to-clone handle to a normalized mass/atom
//! vector pair. Every snapshot gets a fresh [`CompId`] when it is built, and
//! equality is defined on that token alone: two snapshots with numerically
//! identical vectors are still different compositions. Materials rely on this
//! to skip arithmetic when both sides already share one snapshot.
//!
//! Snapshots derived from one origin by decay share a *decay line*, a cache
//! keyed by total elapsed steps since the origin. Decaying the same snapshot
//! by the same amount twice (from two materials, or along two paths that add
//! up to the same age) yields the same identity. The line holds weak
//! references, so cached snapshots live only as long as someone uses them.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::compmath;
use crate::error::{CompositionError, DecayError};
use crate::record::Datum;
use crate::traits::{DecayCalculator, Recorder};
use crate::types::{CompId, CompMap};

static NEXT_COMP_ID: AtomicU64 = AtomicU64::new(1);

type DecayLine = Mutex<BTreeMap<u64, Weak<Snapshot>>>;

struct Snapshot {
    id: CompId,
    mass: CompMap,
    atom: CompMap,
    /// Steps of decay applied since the origin of `line`.
    decay_age: u64,
    line: Arc<DecayLine>,
    recorded: AtomicBool,
}

/// Shared handle to an immutable composition snapshot.
#[derive(Clone)]
pub struct Composition {
    snap: Arc<Snapshot>,
}

/// Reject negative and non-finite components, drop zeros, normalize to 1.
fn validated(v: CompMap) -> Result<CompMap, CompositionError> {
    if let Some((nuc, value)) = v.iter().find(|(_, x)| !x.is_finite() || **x < 0.0) {
        return Err(CompositionError::InvalidComponent {
            nuclide: *nuc,
            value: *value,
        });
    }
    let mut out: CompMap = v.into_iter().filter(|(_, x)| *x > 0.0).collect();
    compmath::normalize(&mut out, 1.0);
    Ok(out)
}

fn normalized(mut v: CompMap) -> CompMap {
    compmath::normalize(&mut v, 1.0);
    v
}

impl Composition {
    /// Build a snapshot from a mass vector (any scale).
    ///
    /// # Errors
    ///
    /// - [`CompositionError::InvalidComponent`] if any value is negative or not finite
    pub fn from_mass(v: CompMap) -> Result<Self, CompositionError> {
        let mass = validated(v)?;
        let atom = normalized(compmath::mass_to_atom(&mass));
        Ok(Self::build(mass, atom, 0, Arc::default()))
    }

    /// Build a snapshot from an atom vector (any scale).
    ///
    /// # Errors
    ///
    /// - [`CompositionError::InvalidComponent`] if any value is negative or not finite
    pub fn from_atom(v: CompMap) -> Result<Self, CompositionError> {
        let atom = validated(v)?;
        let mass = normalized(compmath::atom_to_mass(&atom));
        Ok(Self::build(mass, atom, 0, Arc::default()))
    }

    fn build(mass: CompMap, atom: CompMap, decay_age: u64, line: Arc<DecayLine>) -> Self {
        let id = CompId(NEXT_COMP_ID.fetch_add(1, Ordering::Relaxed));
        Self {
            snap: Arc::new(Snapshot {
                id,
                mass,
                atom,
                decay_age,
                line,
                recorded: AtomicBool::new(false),
            }),
        }
    }

    /// Identity token.
    pub fn id(&self) -> CompId {
        self.snap.id
    }

    /// Normalized mass fractions.
    pub fn mass(&self) -> &CompMap {
        &self.snap.mass
    }

    /// Normalized atom fractions.
    pub fn atom(&self) -> &CompMap {
        &self.snap.atom
    }

    /// Whether the snapshot holds no nuclides at all.
    pub fn is_empty(&self) -> bool {
        self.snap.mass.is_empty()
    }

    /// Steps of decay between the origin of this snapshot's decay line and itself.
    pub fn decay_age(&self) -> u64 {
        self.snap.decay_age
    }

    /// Snapshot after `dt` further steps of decay.
    ///
    /// `dt == 0` returns this snapshot. Results are shared through the decay
    /// line, so the calculator runs at most once per (line, age) while the
    /// result is alive.
    ///
    /// # Errors
    ///
    /// - [`DecayError::ArithmeticOverflow`] if the accumulated age overflows
    /// - any error surfaced by `calc`, unchanged
    pub fn decay(&self, dt: u64, calc: &dyn DecayCalculator) -> Result<Self, DecayError> {
        if dt == 0 {
            return Ok(self.clone());
        }
        let age = self
            .snap
            .decay_age
            .checked_add(dt)
            .ok_or(DecayError::ArithmeticOverflow)?;

        let mut line = self.snap.line.lock();
        if let Some(snap) = line.get(&age).and_then(Weak::upgrade) {
            return Ok(Self { snap });
        }

        let atom = validated(calc.decay(&self.snap.atom, dt)?)?;
        let mass = normalized(compmath::atom_to_mass(&atom));
        let decayed = Self::build(mass, atom, age, Arc::clone(&self.snap.line));
        line.retain(|_, w| w.strong_count() > 0);
        line.insert(age, Arc::downgrade(&decayed.snap));
        Ok(decayed)
    }

    /// Hand this snapshot to `recorder`, once per identity.
    pub fn record(&self, recorder: &dyn Recorder) {
        if !recorder.is_enabled() || self.snap.recorded.swap(true, Ordering::AcqRel) {
            return;
        }
        recorder.record(Datum::Composition {
            comp: self.snap.id,
            mass: self.snap.mass.iter().map(|(n, v)| (*n, *v)).collect(),
        });
    }
}

impl PartialEq for Composition {
    fn eq(&self, other: &Self) -> bool {
        self.snap.id == other.snap.id
    }
}

impl Eq for Composition {}

impl Hash for Composition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.snap.id.hash(state);
    }
}

impl fmt::Debug for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composition")
            .field("id", &self.snap.id)
            .field("mass", &self.snap.mass)
            .field("decay_age", &self.snap.decay_age)
            .finish()
    }
}
