//! Lineage events submitted by resources and the tracker's replies.

use assay_core::{CompId, NodeId, ObjId, SimTime};
use serde::Serialize;

/// State of a resource at the moment an event is emitted.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    /// Quantity in kilograms.
    pub quantity: f64,
    /// Composition identity (the resource state id).
    pub comp: CompId,
    pub time: SimTime,
}

/// A change to the provenance graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineageEvent {
    /// A resource was manufactured from nothing.
    Created { snapshot: Snapshot },
    /// `extracted` was split off `source`, leaving `remaining` behind.
    Split {
        source: ObjId,
        remaining: Snapshot,
        extracted: Snapshot,
    },
    /// `into` absorbed another resource. `absorbed` is `None` when the
    /// absorbed resource was not tracked.
    Merged {
        into: ObjId,
        absorbed: Option<ObjId>,
        snapshot: Snapshot,
    },
    /// `obj` changed in place.
    Modified { obj: ObjId, snapshot: Snapshot },
}

impl LineageEvent {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Split { .. } => "split",
            Self::Merged { .. } => "merged",
            Self::Modified { .. } => "modified",
        }
    }
}

/// Nodes appended by a successfully applied event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Created { obj: ObjId, node: NodeId },
    Split {
        source_node: NodeId,
        child: ObjId,
        child_node: NodeId,
    },
    Merged { node: NodeId },
    Modified { node: NodeId },
}

impl Applied {
    /// The new head of the entity that submitted the event.
    pub fn node(&self) -> NodeId {
        match self {
            Self::Created { node, .. } => *node,
            Self::Split { source_node, .. } => *source_node,
            Self::Merged { node } => *node,
            Self::Modified { node } => *node,
        }
    }

    /// The lineage entity started by this event, if any.
    pub fn new_obj(&self) -> Option<ObjId> {
        match self {
            Self::Created { obj, .. } => Some(*obj),
            Self::Split { child, .. } => Some(*child),
            Self::Merged { .. } | Self::Modified { .. } => None,
        }
    }
}
