use crate::graph::Vec2;
use fleetgraph_core::NodeId;
use std::collections::HashMap;

/// Positions the user placed by hand, plus a global freeze switch.
///
/// Pinned nodes keep their recorded position through every layout pass until
/// [`PositionLocks::clear_all`]. The freeze switch is coarser: while set, no
/// drag is recorded at all.
#[derive(Debug, Clone, Default)]
pub struct PositionLocks {
    positions: HashMap<NodeId, Vec2>,
    frozen: bool,
}

impl PositionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the final position of a drag. Returns `false` and records
    /// nothing while positions are globally locked.
    pub fn record_drag(&mut self, id: NodeId, position: Vec2) -> bool {
        if self.frozen {
            tracing::debug!("Ignoring drag of {}: positions are locked", id);
            return false;
        }
        self.positions.insert(id, position);
        true
    }

    pub fn clear_all(&mut self) {
        self.positions.clear();
    }

    pub fn toggle_locked(&mut self, locked: bool) {
        self.frozen = locked;
    }

    /// Whether drag-originated moves are currently suppressed.
    pub fn is_locked(&self) -> bool {
        self.frozen
    }

    pub fn is_pinned(&self, id: &NodeId) -> bool {
        self.positions.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<Vec2> {
        self.positions.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Vec2)> {
        self.positions.iter()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
