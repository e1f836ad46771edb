//! The provenance graph and the service that owns it.
//!
//! Nodes are stored in creation order and never removed or edited, so the
//! graph is append-only history. Each lineage entity has at most one *head*
//! (its live node). Absorbed entities move from the head index to the retired
//! index and can never receive another event.
//!
//! Node ids are allocated sequentially from 1 and every parent is allocated
//! before its children, which keeps the graph acyclic by construction.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use assay_core::record::{Datum, NullRecorder};
use assay_core::traits::Recorder;
use assay_core::{NodeId, NodeKind, ObjId};
use tracing::debug;

use crate::error::TrackerError;
use crate::event::{Applied, LineageEvent, Snapshot};

/// One version of one lineage entity.
#[derive(Clone, Debug, PartialEq)]
pub struct ProvenanceNode {
    pub id: NodeId,
    pub obj: ObjId,
    pub kind: NodeKind,
    /// Zero parents for roots, one for splits and modifications, up to two for merges.
    pub parents: Vec<NodeId>,
    pub snapshot: Snapshot,
}

/// Owner of the provenance graph.
///
/// Not thread-safe — callers should wrap in a `Mutex` if concurrent access
/// is needed.
pub struct HeritageTracker {
    /// All nodes; `nodes[i]` has id `i + 1`.
    nodes: Vec<ProvenanceNode>,
    /// Live entity → its current node.
    heads: HashMap<ObjId, NodeId>,
    /// Absorbed entity → its final node.
    retired: HashMap<ObjId, NodeId>,
    next_obj: u64,
    events_applied: u64,
    recorder: Arc<dyn Recorder>,
}

impl HeritageTracker {
    /// Create an empty tracker that forwards every new node to `recorder`.
    pub fn new(recorder: Arc<dyn Recorder>) -> Self {
        Self {
            nodes: Vec::new(),
            heads: HashMap::new(),
            retired: HashMap::new(),
            next_obj: 1,
            events_applied: 0,
            recorder,
        }
    }

    /// Apply one event.
    ///
    /// All referenced entities are checked before anything is appended, so
    /// a returned error leaves the graph exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`TrackerError::UnknownLineage`] if an entity was never created here
    /// - [`TrackerError::RetiredLineage`] if an entity was already absorbed
    /// - [`TrackerError::SelfMerge`] if an entity is merged into itself
    pub fn apply(&mut self, event: LineageEvent) -> Result<Applied, TrackerError> {
        let applied = match event {
            LineageEvent::Created { snapshot } => {
                let obj = self.alloc_obj();
                let node = self.append(obj, NodeKind::Created, Vec::new(), snapshot);
                self.heads.insert(obj, node);
                Applied::Created { obj, node }
            }
            LineageEvent::Split {
                source,
                remaining,
                extracted,
            } => {
                let prev = self.live_head(source)?;
                let source_node = self.append(source, NodeKind::Split, vec![prev], remaining);
                let child = self.alloc_obj();
                let child_node = self.append(child, NodeKind::Extracted, vec![prev], extracted);
                self.heads.insert(source, source_node);
                self.heads.insert(child, child_node);
                Applied::Split {
                    source_node,
                    child,
                    child_node,
                }
            }
            LineageEvent::Merged {
                into,
                absorbed,
                snapshot,
            } => {
                if absorbed == Some(into) {
                    return Err(TrackerError::SelfMerge(into));
                }
                let prev = self.live_head(into)?;
                let absorbed_head = absorbed.map(|obj| self.live_head(obj)).transpose()?;

                let mut parents = vec![prev];
                parents.extend(absorbed_head);
                let node = self.append(into, NodeKind::Merged, parents, snapshot);
                self.heads.insert(into, node);
                if let (Some(obj), Some(last)) = (absorbed, absorbed_head) {
                    self.heads.remove(&obj);
                    self.retired.insert(obj, last);
                }
                Applied::Merged { node }
            }
            LineageEvent::Modified { obj, snapshot } => {
                let prev = self.live_head(obj)?;
                let node = self.append(obj, NodeKind::Modified, vec![prev], snapshot);
                self.heads.insert(obj, node);
                Applied::Modified { node }
            }
        };
        self.events_applied += 1;
        debug!(event = event.name(), node = %applied.node(), "lineage event applied");
        Ok(applied)
    }

    fn alloc_obj(&mut self) -> ObjId {
        let obj = ObjId(self.next_obj);
        self.next_obj += 1;
        obj
    }

    fn live_head(&self, obj: ObjId) -> Result<NodeId, TrackerError> {
        if let Some(node) = self.heads.get(&obj) {
            return Ok(*node);
        }
        if self.retired.contains_key(&obj) {
            Err(TrackerError::RetiredLineage(obj))
        } else {
            Err(TrackerError::UnknownLineage(obj))
        }
    }

    fn append(
        &mut self,
        obj: ObjId,
        kind: NodeKind,
        parents: Vec<NodeId>,
        snapshot: Snapshot,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u64 + 1);
        if self.recorder.is_enabled() {
            self.recorder.record(Datum::Resource {
                node: id,
                obj,
                kind,
                quantity: snapshot.quantity,
                comp: snapshot.comp,
                parents: parents.clone(),
                time: snapshot.time,
            });
        }
        self.nodes.push(ProvenanceNode {
            id,
            obj,
            kind,
            parents,
            snapshot,
        });
        id
    }

    // --- queries ---

    /// Current node of a live entity.
    pub fn head(&self, obj: ObjId) -> Option<NodeId> {
        self.heads.get(&obj).copied()
    }

    /// Final node of a retired entity.
    pub fn final_node(&self, obj: ObjId) -> Option<NodeId> {
        self.retired.get(&obj).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&ProvenanceNode> {
        let index = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.nodes.get(index)
    }

    /// Direct parents of a node. Empty for roots and unknown ids.
    pub fn parents(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.parents.as_slice()).unwrap_or(&[])
    }

    pub fn is_live(&self, obj: ObjId) -> bool {
        self.heads.contains_key(&obj)
    }

    pub fn is_retired(&self, obj: ObjId) -> bool {
        self.retired.contains_key(&obj)
    }

    /// Number of live entities.
    pub fn live_count(&self) -> usize {
        self.heads.len()
    }

    /// Number of retired entities.
    pub fn retired_count(&self) -> usize {
        self.retired.len()
    }

    /// Total nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn events_applied(&self) -> u64 {
        self.events_applied
    }

    /// Every version of `obj`, oldest first. Empty for unknown entities.
    ///
    /// Versions are chained through each node's first parent; the walk stops
    /// where the entity was created or split off another.
    pub fn history(&self, obj: ObjId) -> Vec<NodeId> {
        let Some(mut current) = self.head(obj).or_else(|| self.final_node(obj)) else {
            return Vec::new();
        };
        let mut versions = vec![current];
        while let Some(prev) = self.parents(current).first().copied() {
            match self.node(prev) {
                Some(node) if node.obj == obj => {
                    versions.push(prev);
                    current = prev;
                }
                _ => break,
            }
        }
        versions.reverse();
        versions
    }

    /// All transitive ancestors of `id`, excluding `id`, in ascending order.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<NodeId> = self.parents(id).to_vec();
        while let Some(next) = stack.pop() {
            if seen.insert(next) {
                stack.extend_from_slice(self.parents(next));
            }
        }
        seen.into_iter().collect()
    }

    /// The originally created batches that contributed to node `id`.
    ///
    /// Includes `id`'s own entity when `id` descends from its creation.
    pub fn origins(&self, id: NodeId) -> BTreeSet<ObjId> {
        self.ancestors(id)
            .into_iter()
            .chain(std::iter::once(id))
            .filter_map(|n| self.node(n))
            .filter(|n| n.kind == NodeKind::Created)
            .map(|n| n.obj)
            .collect()
    }

    /// Origins of the current head of a live entity.
    pub fn origins_of(&self, obj: ObjId) -> Result<BTreeSet<ObjId>, TrackerError> {
        self.live_head(obj).map(|head| self.origins(head))
    }
}

impl Default for HeritageTracker {
    fn default() -> Self {
        Self::new(Arc::new(NullRecorder))
    }
}

impl std::fmt::Debug for HeritageTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeritageTracker")
            .field("nodes", &self.nodes.len())
            .field("live", &self.heads.len())
            .field("retired", &self.retired.len())
            .finish()
    }
}
