//! Datums emitted to the recording collaborator and two stock sinks.

use parking_lot::Mutex;
use serde::Serialize;

use crate::traits::Recorder;
use crate::types::{CompId, NodeId, NodeKind, Nuclide, ObjId, SimTime};

/// One recorded row.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum Datum {
    /// A composition snapshot, recorded once per identity.
    Composition {
        comp: CompId,
        /// Normalized mass fractions.
        mass: Vec<(Nuclide, f64)>,
    },
    /// One version of a tracked resource.
    Resource {
        node: NodeId,
        obj: ObjId,
        kind: NodeKind,
        quantity: f64,
        comp: CompId,
        parents: Vec<NodeId>,
        time: SimTime,
    },
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecorder;

impl Recorder for NullRecorder {
    fn record(&self, _datum: Datum) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Keeps every datum in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    datums: Mutex<Vec<Datum>>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn datums(&self) -> Vec<Datum> {
        self.datums.lock().clone()
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Vec<Datum> {
        std::mem::take(&mut *self.datums.lock())
    }

    pub fn len(&self) -> usize {
        self.datums.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.datums.lock().is_empty()
    }

    /// Number of `Resource` rows recorded.
    pub fn resource_count(&self) -> usize {
        self.datums
            .lock()
            .iter()
            .filter(|d| matches!(d, Datum::Resource { .. }))
            .count()
    }

    /// Number of `Composition` rows recorded.
    pub fn composition_count(&self) -> usize {
        self.datums
            .lock()
            .iter()
            .filter(|d| matches!(d, Datum::Composition { .. }))
            .count()
    }
}

impl Recorder for MemoryRecorder {
    fn record(&self, datum: Datum) {
        self.datums.lock().push(datum);
    }
}
