use crate::signal::Signal;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A directed edge in the dependency multigraph, per §3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub source: Signal,
}

/// Immutable, copy-on-write directed multigraph of dependency edges.
///
/// Parallel edges between the same `(from, to)` pair are preserved
/// (it is a multigraph per §3), so storage is a flat `Vec` rather than a
/// set; lookups by endpoint are O(n) which is acceptable at the scale
/// this engine reasons over (hundreds, not millions, of nodes per task).
#[derive(Debug, Clone, Default)]
pub struct DependencyIndex {
    edges: Arc<Vec<DependencyEdge>>,
}

impl DependencyIndex {
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter()
    }

    #[must_use]
    pub fn edges_from(&self, node: &NodeId) -> Vec<&DependencyEdge> {
        self.edges.iter().filter(|e| &e.from == node).collect()
    }

    #[must_use]
    pub fn edges_to(&self, node: &NodeId) -> Vec<&DependencyEdge> {
        self.edges.iter().filter(|e| &e.to == node).collect()
    }

    #[must_use]
    pub fn with_added(&self, added: &[DependencyEdge]) -> Self {
        let mut next = (*self.edges).clone();
        next.extend(added.iter().cloned());
        Self {
            edges: Arc::new(next),
        }
    }

    /// `RemoveEdges` are accepted but never recorded by the trace recorder,
    /// per §4.6: "`RemoveEdges` are not recorded (trace shows additions only)".
    #[must_use]
    pub fn with_removed(&self, removed: &[DependencyEdge]) -> Self {
        let next: Vec<DependencyEdge> = self
            .edges
            .iter()
            .filter(|e| !removed.contains(e))
            .cloned()
            .collect();
        Self {
            edges: Arc::new(next),
        }
    }
}
