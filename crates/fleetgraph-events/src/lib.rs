use crossbeam_channel::{Receiver, Sender, unbounded};
use fleetgraph_core::{LayoutDirection, NodeId, ResourceKind, ResourceSet, StatusBucket};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayoutAlgorithm {
    /// Columns by longest-path rank from reference edges.
    #[default]
    Rank,
    /// Layered drawing with crossing reduction.
    Layered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Data
    SnapshotReceived {
        resources: ResourceSet,
    },

    // Graph interaction
    NodeDragStop {
        id: NodeId,
        x: f32,
        y: f32,
    },
    ReLayoutRequested,
    /// Globally freeze or unfreeze drag-originated moves.
    SetPositionsLocked(bool),

    // Filtering
    FilterChanged {
        kinds: Vec<ResourceKind>,
        statuses: Vec<StatusBucket>,
        query: String,
    },

    // Layout controls
    SetLayoutMethod(LayoutAlgorithm),
    SetLayoutDirection(LayoutDirection),

    // Viewport
    ViewportChanged {
        x: f32,
        y: f32,
        zoom: f32,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    /// Dispatch all pending events to a listener, in publish order.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            listener.handle_event(&event);
        }
    }
}

/// Implemented by components that react to user actions routed through the bus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
